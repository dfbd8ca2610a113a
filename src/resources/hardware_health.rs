// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware health monitoring

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{HardwarePollingMethod, NodeRef};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::PresenceState;

const HARDWARE_INFO: &str = "Orion.HardwareHealth.HardwareInfoBase";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareHealthParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    /// Required when enabling
    #[serde(default)]
    pub polling_method: Option<HardwarePollingMethod>,
}

pub async fn run(swis: &dyn Swis, params: &HardwareHealthParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Option<i64>>> {
    let method = match (params.state, params.polling_method) {
        (PresenceState::Present, None) => {
            return Err(OrionError::InvalidParameters(
                "state is present but all of the following are missing: polling_method".to_string(),
            ))
        }
        (_, method) => method,
    };

    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let current = lookups::hardware_health_method(swis, &node).await?;
    let mut reconciler = Reconciler::new(mode);
    let net_object = node.net_object_id.clone();

    let after = match (params.state, method) {
        (PresenceState::Present, Some(method)) => {
            let id = method.id();
            match current {
                Some(existing) if existing != id => {
                    return Err(OrionError::Precondition(
                        "HardwareHealth monitor exists, but does not match provided polling_method parameter."
                            .to_string(),
                    ));
                }
                Some(_) => {}
                None => {
                    reconciler
                        .converge(true, "enable hardware health", || {
                            swis.invoke(HARDWARE_INFO, "EnableHardwareHealth", vec![net_object.clone().into(), id.into()])
                        })
                        .await?;
                }
            }
            Some(id)
        }
        _ => {
            if current.is_some() {
                reconciler
                    .converge(true, "disable hardware health", || {
                        swis.invoke(HARDWARE_INFO, "DisableHardwareHealth", vec![net_object.clone().into()])
                    })
                    .await?;
            }
            None
        }
    };

    Ok(reconciler.finish(Some(node), after))
}
