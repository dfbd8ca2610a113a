// Copyright (c) 2025 - Cowboy AI, Inc.
//! Universal Device Poller assignment

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{properties, Swis};
use crate::domain::NodeRef;
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::PresenceState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPollerParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    /// Unique name of the custom poller definition
    pub custom_poller: String,
}

pub async fn run(swis: &dyn Swis, params: &CustomPollerParams, mode: CheckMode) -> OrionResult<ModuleOutcome<()>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let mut reconciler = Reconciler::new(mode);
    match params.state {
        PresenceState::Present => {
            let poller_id = lookups::custom_poller_id(swis, &params.custom_poller)
                .await?
                .ok_or_else(|| OrionError::Precondition(format!("Custom poller {} not found.", params.custom_poller)))?;

            let assigned = lookups::custom_poller_uri(swis, &node, &params.custom_poller).await?;
            let assignment = properties([
                ("NodeID", Value::from(node.node_id)),
                ("CustomPollerID", Value::from(poller_id)),
            ]);
            reconciler
                .converge(assigned.is_none(), "create custom poller", || {
                    swis.create("Orion.NPM.CustomPollerAssignmentOnNode", &assignment)
                })
                .await?;
        }
        PresenceState::Absent => {
            if let Some(uri) = lookups::custom_poller_uri(swis, &node, &params.custom_poller).await? {
                reconciler
                    .converge(true, "remove custom poller", || swis.delete(&uri))
                    .await?;
            }
        }
    }

    Ok(reconciler.finish(Some(node), ()))
}
