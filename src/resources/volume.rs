// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node volumes (`Orion.Volumes`)
//!
//! A new volume takes the next free `VolumeIndex` on its node and gets the
//! three default volume pollers.

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::poller::DEFAULT_VOLUME_POLLERS;
use crate::domain::{NetObject, Node, NodeRef, Volume, VolumeSpec};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::node_poller::ensure_poller;
use super::PresenceState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    pub volume: VolumeSpec,
}

async fn add_volume(swis: &dyn Swis, node: &Node, spec: &VolumeSpec) -> OrionResult<Volume> {
    let index = lookups::next_volume_index(swis, node).await?;
    swis.create("Orion.Volumes", &spec.properties(node.node_id, index)).await?;

    let volume = lookups::volume(swis, node, &spec.name).await?.ok_or_else(|| {
        OrionError::Precondition(format!("Volume {} not found after creation", spec.name))
    })?;

    let net_object = NetObject::volume(volume.volume_id);
    for poller_type in DEFAULT_VOLUME_POLLERS {
        ensure_poller(swis, &net_object, poller_type, true).await?;
    }
    Ok(volume)
}

pub async fn run(swis: &dyn Swis, params: &VolumeParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Option<Volume>>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let mut volume = lookups::volume(swis, &node, &params.volume.name).await?;
    let mut reconciler = Reconciler::new(mode);

    match params.state {
        PresenceState::Present => {
            if let Some(created) = reconciler
                .converge(volume.is_none(), "add volume", || add_volume(swis, &node, &params.volume))
                .await?
            {
                volume = Some(created);
            }
        }
        PresenceState::Absent => {
            if let Some(existing) = &volume {
                reconciler
                    .converge(true, "remove volume", || swis.delete(&existing.uri))
                    .await?;
            }
        }
    }

    Ok(reconciler.finish(Some(node), volume))
}
