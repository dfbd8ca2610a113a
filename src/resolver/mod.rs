// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Resolution
//!
//! Resolves a [`NodeRef`] to zero or one `Orion.Nodes` record. Exactly one
//! query is issued, keyed by the first non-empty reference field in the
//! fixed priority order `node_id`, `ip_address`, `name`. A query failure is
//! returned as-is; there is no retry.
//!
//! Sub-resource lookups (pollers, volumes, interfaces, applications, NCM,
//! credentials) live in [`lookups`] and share the same rules: one
//! parameterized query, `None` when nothing matches.

pub mod lookups;

use tracing::debug;

use crate::client::Swis;
use crate::domain::{Node, NodeKey, NodeRef};
use crate::errors::OrionResult;
use crate::swql::Query;

/// Build the lookup query for a node key
pub fn node_query(key: &NodeKey) -> Query {
    let base = format!("SELECT {} FROM Orion.Nodes WHERE ", Node::FIELDS);
    match key {
        NodeKey::Id(id) => Query::new(format!("{}NodeID = @node_id", base)).param("node_id", *id),
        NodeKey::Address(address) => Query::new(format!("{}IPAddress = @ip_address", base))
            .param("ip_address", address.as_str()),
        NodeKey::Name(name) => {
            Query::new(format!("{}Caption = @caption", base)).param("caption", name.as_str())
        }
    }
}

/// Resolve a node reference to its record, or `None` when nothing matches
pub async fn resolve_node(swis: &dyn Swis, reference: &NodeRef) -> OrionResult<Option<Node>> {
    let key = reference.key()?;
    debug!("Resolving node by {}", key);

    match swis.query_one(&node_query(&key)).await? {
        Some(row) => {
            let node = Node::from_row(&row)?;
            debug!("Resolved {} to NodeID {}", key, node.node_id);
            Ok(Some(node))
        }
        None => {
            debug!("No node matches {}", key);
            Ok(None)
        }
    }
}

/// Re-read a node after a corrective call changed it
pub async fn refresh_node(swis: &dyn Swis, node: &Node) -> OrionResult<Option<Node>> {
    resolve_node(swis, &NodeRef::by_id(node.node_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_are_parameterized() {
        let q = node_query(&NodeKey::Name("core'; DROP".into()));
        assert!(q.text().ends_with("WHERE Caption = @caption"));
        assert!(!q.text().contains("DROP"));
        assert_eq!(q.parameters()["caption"], "core'; DROP");

        let q = node_query(&NodeKey::Id(7));
        assert!(q.text().ends_with("WHERE NodeID = @node_id"));
        assert_eq!(q.parameters()["node_id"], 7);

        let q = node_query(&NodeKey::Address("10.1.1.1".into()));
        assert!(q.text().ends_with("WHERE IPAddress = @ip_address"));
        assert_eq!(q.parameters()["ip_address"], "10.1.1.1");

        let q = node_query(&NodeKey::Address("2001:DB8:0:0:0:0:0:1".into()));
        assert_eq!(q.parameters()["ip_address"], "2001:DB8:0:0:0:0:0:1");
    }
}
