// Copyright (c) 2025 - Cowboy AI, Inc.
//! Volume lookup

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{NodeRef, Volume};
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRef {
    #[serde(alias = "caption")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfoParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub volume: VolumeRef,
}

pub async fn run(swis: &dyn Swis, params: &VolumeInfoParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Volume>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    match lookups::volume(swis, &node, &params.volume.name).await? {
        Some(volume) => Ok(Reconciler::new(mode).finish(Some(node), volume)),
        None => Ok(ModuleOutcome::skipped("Volume not found")),
    }
}
