// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node lookup
//!
//! Returns the node's public attributes. For SNMP nodes whose last uptime
//! poll is missing or older than [`STALE_POLL_SECS`], a `PollNow` is requested
//! first and the node re-read, so the returned status is current. The node
//! itself is never modified and `changed` is always false.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::Swis;
use crate::domain::{Node, NodeRef};
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{refresh_node, resolve_node};

use super::default_true;

/// Age in seconds after which an SNMP node's poll data is refreshed
pub const STALE_POLL_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfoParams {
    #[serde(flatten)]
    pub node: NodeRef,
    #[serde(default = "default_true")]
    pub poll_if_stale: bool,
}

fn is_stale(node: &Node) -> bool {
    match node.last_system_uptime_poll {
        Some(last) => Utc::now() - last > Duration::seconds(STALE_POLL_SECS),
        None => true,
    }
}

pub async fn run(swis: &dyn Swis, params: &NodeInfoParams, mode: CheckMode) -> OrionResult<ModuleOutcome<()>> {
    let Some(mut node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    if params.poll_if_stale && !mode.is_dry_run() && node.is_snmp() && is_stale(&node) {
        info!("Polling {} before reporting", node.caption);
        swis.invoke("Orion.Nodes", "PollNow", vec![node.net_object_id.clone().into()])
            .await
            .map_err(|e| e.during("poll node"))?;
        if let Some(fresh) = refresh_node(swis, &node).await? {
            node = fresh;
        }
    }

    Ok(Reconciler::new(mode).finish(Some(node), ()))
}
