// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node interface monitoring
//!
//! Interfaces are discovered on the node first. `present` adds the
//! discovered interfaces that match and are not yet monitored, in one
//! `AddInterfacesOnNode` call; `absent` deletes monitored interfaces by
//! name. Without an `interface` parameter every discovered interface is
//! targeted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::Swis;
use crate::domain::{DiscoveredInterface, InterfaceMatcher, Node, NodeRef};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::PresenceState;

const INTERFACES: &str = "Orion.NPM.Interfaces";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInterfaceParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    /// Interface caption, or a pattern when `regex` is set
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub regex: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceChanges {
    pub discovered: Vec<DiscoveredInterface>,
    /// Interfaces added or removed (or that would be, in check mode)
    pub interfaces: Vec<Value>,
}

/// Run interface discovery on a node
pub async fn discover(swis: &dyn Swis, node: &Node) -> OrionResult<Vec<DiscoveredInterface>> {
    let result = swis
        .invoke(INTERFACES, "DiscoverInterfacesOnNode", vec![node.node_id.into()])
        .await
        .map_err(|e| e.during("discover interfaces"))?;

    discovered_list(&result)?
        .iter()
        .map(DiscoveredInterface::from_value)
        .collect()
}

fn discovered_list(result: &Value) -> OrionResult<&Vec<Value>> {
    result
        .get("DiscoveredInterfaces")
        .and_then(Value::as_array)
        .ok_or_else(|| OrionError::Parse(format!("discovery result has no DiscoveredInterfaces: {}", result)))
}

async fn add_interfaces(swis: &dyn Swis, node: &Node, interfaces: &[DiscoveredInterface]) -> OrionResult<Vec<Value>> {
    let list: Vec<Value> = interfaces.iter().cloned().map(DiscoveredInterface::into_value).collect();
    let result = swis
        .invoke(
            INTERFACES,
            "AddInterfacesOnNode",
            vec![node.node_id.into(), Value::Array(list), "AddDefaultPollers".into()],
        )
        .await?;
    Ok(discovered_list(&result)?.clone())
}

pub async fn run(swis: &dyn Swis, params: &NodeInterfaceParams, mode: CheckMode) -> OrionResult<ModuleOutcome<InterfaceChanges>> {
    let matcher = params
        .interface
        .as_deref()
        .map(|name| InterfaceMatcher::new(name, params.regex))
        .transpose()?;

    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let discovered = discover(swis, &node).await?;
    let mut reconciler = Reconciler::new(mode);
    let mut affected = Vec::new();

    match (params.state, &params.interface) {
        (PresenceState::Present, None) => {
            let mut missing = Vec::new();
            for interface in &discovered {
                if lookups::interface_uri(swis, &node, &interface.caption()).await?.is_none() {
                    missing.push(interface.clone());
                }
            }
            debug!("{} of {} discovered interfaces are not monitored", missing.len(), discovered.len());

            affected = missing.iter().cloned().map(DiscoveredInterface::into_value).collect();
            if let Some(added) = reconciler
                .converge(!missing.is_empty(), "add interfaces", || add_interfaces(swis, &node, &missing))
                .await?
            {
                affected = added;
            }
        }
        (PresenceState::Present, Some(name)) => {
            if lookups::interface_uri(swis, &node, name).await?.is_none() {
                let candidates: Vec<DiscoveredInterface> = discovered
                    .iter()
                    .filter(|i| matcher.as_ref().map_or(false, |m| m.matches(&i.caption())))
                    .filter(|i| !i.is_monitored())
                    .cloned()
                    .collect();

                affected = candidates.iter().cloned().map(DiscoveredInterface::into_value).collect();
                if let Some(added) = reconciler
                    .converge(!candidates.is_empty(), "add interfaces", || {
                        add_interfaces(swis, &node, &candidates)
                    })
                    .await?
                {
                    affected = added;
                }
            }
        }
        (PresenceState::Absent, None) => {
            for interface in &discovered {
                if let Some(uri) = lookups::interface_uri(swis, &node, &interface.caption()).await? {
                    reconciler
                        .converge(true, "remove interface", || swis.delete(&uri))
                        .await?;
                    affected.push(interface.clone().into_value());
                }
            }
        }
        (PresenceState::Absent, Some(name)) => {
            if let Some(uri) = lookups::interface_uri(swis, &node, name).await? {
                reconciler
                    .converge(true, "remove interface", || swis.delete(&uri))
                    .await?;
                affected.push(Value::from(uri));
            }
        }
    }

    let changes = InterfaceChanges {
        discovered,
        interfaces: affected,
    };
    Ok(reconciler.finish(Some(node), changes))
}
