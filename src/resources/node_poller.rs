// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node poller attachment (`Orion.Pollers`)

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{NetObject, NodeRef, Poller};
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::{default_true, PresenceState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePollerParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    /// Poller type, e.g. `N.Cpu.SNMP.HrProcessorLoad`
    pub poller: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Create the poller, or update it when `Enabled` differs.
///
/// Returns whether a create or update was issued.
pub async fn ensure_poller(swis: &dyn Swis, net_object: &NetObject, poller_type: &str, enabled: bool) -> OrionResult<bool> {
    let properties = Poller::properties(net_object, poller_type, enabled);
    match lookups::poller(swis, net_object, poller_type).await? {
        None => {
            swis.create("Orion.Pollers", &properties).await?;
            Ok(true)
        }
        Some(Poller { enabled: current, uri: Some(uri), .. }) if current != enabled => {
            swis.update(&uri, &properties).await?;
            Ok(true)
        }
        Some(_) => Ok(false),
    }
}

pub async fn run(swis: &dyn Swis, params: &NodePollerParams, mode: CheckMode) -> OrionResult<ModuleOutcome<()>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let net_object = NetObject::node(node.node_id);
    let current = lookups::poller(swis, &net_object, &params.poller).await?;
    let mut reconciler = Reconciler::new(mode);

    match params.state {
        PresenceState::Present => {
            let needs_change = current.as_ref().map_or(true, |p| p.enabled != params.enabled);
            reconciler
                .converge(needs_change, "add poller", || {
                    ensure_poller(swis, &net_object, &params.poller, params.enabled)
                })
                .await?;
        }
        PresenceState::Absent => {
            if let Some(uri) = current.and_then(|p| p.uri) {
                reconciler
                    .converge(true, "remove poller", || swis.delete(&uri))
                    .await?;
            }
        }
    }

    Ok(reconciler.finish(Some(node), ()))
}
