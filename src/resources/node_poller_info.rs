// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node poller listing

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{NetObject, NodeRef, Poller};
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePollerInfoParams {
    #[serde(flatten)]
    pub node: NodeRef,
}

pub async fn run(swis: &dyn Swis, params: &NodePollerInfoParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Vec<Poller>>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let pollers = lookups::pollers(swis, &NetObject::node(node.node_id)).await?;
    Ok(Reconciler::new(mode).finish(Some(node), pollers))
}
