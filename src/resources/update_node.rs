// Copyright (c) 2025 - Cowboy AI, Inc.
//! Free-form node property update
//!
//! Partial patch: only the supplied properties are compared and only the
//! ones that differ from the current record are sent. Properties the
//! caller does not name are left untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{value_to_string, Row, RowExt, Swis};
use crate::domain::NodeRef;
use crate::errors::OrionResult;
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{refresh_node, resolve_node};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNodeParams {
    #[serde(flatten)]
    pub node: NodeRef,
    #[serde(default)]
    pub properties: Row,
}

/// Whether a current value already satisfies the desired one.
///
/// SWIS returns typed values while callers often supply strings, so scalars
/// are compared by their rendered form.
pub(crate) fn same_value(current: Option<&Value>, desired: &Value) -> bool {
    match (current, desired) {
        (None, Value::Null) => true,
        (None, _) => false,
        (Some(current), Value::Object(_) | Value::Array(_)) => current == desired,
        (Some(current), desired) => value_to_string(current) == value_to_string(desired),
    }
}

/// Desired properties whose values differ from `current`
pub(crate) fn changed_properties(current: &Row, desired: &Row) -> Row {
    desired
        .iter()
        .filter(|(name, value)| !same_value(current.opt_field(name), value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

pub async fn run(swis: &dyn Swis, params: &UpdateNodeParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Row>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let patch = if params.properties.is_empty() {
        Row::new()
    } else {
        let current = swis.read(&node.uri).await?;
        changed_properties(&current, &params.properties)
    };

    let mut reconciler = Reconciler::new(mode);
    let applied = reconciler
        .converge(!patch.is_empty(), "update node", || swis.update(&node.uri, &patch))
        .await?;

    let node = match applied {
        Some(()) => refresh_node(swis, &node).await?.unwrap_or(node),
        None => node,
    };
    Ok(reconciler.finish(Some(node), patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_properties_compares_rendered_scalars() {
        let current = json!({"Caption": "core-1", "PollInterval": 120, "Vendor": null});
        let desired = json!({"Caption": "core-1", "PollInterval": "60", "Vendor": null, "Location": "DC1"});
        let patch = changed_properties(current.as_object().unwrap(), desired.as_object().unwrap());

        assert_eq!(patch.len(), 2);
        assert_eq!(patch["PollInterval"], "60");
        assert_eq!(patch["Location"], "DC1");
    }
}
