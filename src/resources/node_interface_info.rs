// Copyright (c) 2025 - Cowboy AI, Inc.
//! Monitored interface listing

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{Interface, NodeRef};
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInterfaceInfoParams {
    #[serde(flatten)]
    pub node: NodeRef,
}

pub async fn run(
    swis: &dyn Swis,
    params: &NodeInterfaceInfoParams,
    mode: CheckMode,
) -> OrionResult<ModuleOutcome<Vec<Interface>>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let interfaces = lookups::interfaces(swis, &node).await?;
    Ok(Reconciler::new(mode).finish(Some(node), interfaces))
}
