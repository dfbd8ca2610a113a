// Copyright (c) 2025 - Cowboy AI, Inc.
//! Application monitor (APM) templates applied to nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Swis;
use crate::domain::{Node, NodeRef};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::{default_true, PresenceState};

const APPLICATIONS: &str = "Orion.APM.Application";

/// Credential id meaning "inherit Windows credentials from the node"
pub const INHERIT_NODE_CREDENTIAL: i64 = -4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeApplicationParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    pub application_template_name: String,
    /// APM credential name; the node's credential is inherited when unset
    #[serde(default)]
    pub credential_name: Option<String>,
    #[serde(default = "default_true")]
    pub skip_duplicates: bool,
}

async fn add_application(
    swis: &dyn Swis,
    node: &Node,
    template_id: i64,
    credential_id: i64,
    skip_duplicates: bool,
) -> OrionResult<Value> {
    let application = swis
        .invoke(
            APPLICATIONS,
            "CreateApplication",
            vec![node.node_id.into(), template_id.into(), credential_id.into(), skip_duplicates.into()],
        )
        .await?;

    if !application.is_null() {
        swis.invoke(APPLICATIONS, "PollNow", vec![application.clone()]).await?;
    }
    Ok(application)
}

pub async fn run(swis: &dyn Swis, params: &NodeApplicationParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Option<i64>>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let template = &params.application_template_name;
    let mut application_id = lookups::application_id(swis, &node, template).await?;
    let mut reconciler = Reconciler::new(mode);

    match params.state {
        PresenceState::Present => {
            if application_id.is_none() {
                let template_id = lookups::application_template_id(swis, template)
                    .await?
                    .ok_or_else(|| OrionError::Precondition(format!("Application template {} not found", template)))?;

                let credential_id = match &params.credential_name {
                    Some(name) => lookups::apm_credential_id(swis, name)
                        .await?
                        .ok_or_else(|| OrionError::Precondition(format!("APM credential {} not found", name)))?,
                    None => INHERIT_NODE_CREDENTIAL,
                };

                let created = reconciler
                    .converge(true, "add application to node", || {
                        add_application(swis, &node, template_id, credential_id, params.skip_duplicates)
                    })
                    .await?;
                application_id = created.as_ref().and_then(Value::as_i64);
            }
        }
        PresenceState::Absent => {
            if let Some(id) = application_id {
                reconciler
                    .converge(true, "remove application from node", || {
                        swis.invoke(APPLICATIONS, "DeleteApplication", vec![id.into()])
                    })
                    .await?;
                if !mode.is_dry_run() {
                    application_id = None;
                }
            }
        }
    }

    Ok(reconciler.finish(Some(node), application_id))
}
