// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node custom property values
//!
//! Writes go to `<node uri>/CustomProperties` and carry only the one
//! property being managed (partial patch).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{properties, value_to_string, Swis};
use crate::domain::NodeRef;
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};
use crate::swql::identifier;

use super::PresenceState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPropertyParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    pub property_name: String,
    #[serde(default)]
    pub property_value: Option<String>,
}

impl CustomPropertyParams {
    pub fn validate(&self) -> OrionResult<()> {
        identifier(&self.property_name)?;
        if self.state == PresenceState::Present && self.property_value.is_none() {
            return Err(OrionError::InvalidParameters(
                "state is present but all of the following are missing: property_value".to_string(),
            ));
        }
        Ok(())
    }
}

/// Current and resulting value of the managed property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPropertyChange {
    pub name: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

fn has_value(value: &Option<Value>) -> bool {
    value.as_ref().map_or(false, |v| !value_to_string(v).is_empty())
}

pub async fn run(
    swis: &dyn Swis,
    params: &CustomPropertyParams,
    mode: CheckMode,
) -> OrionResult<ModuleOutcome<CustomPropertyChange>> {
    params.validate()?;
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let before = lookups::custom_property_value(swis, &node, &params.property_name).await?;
    let desired = match params.state {
        PresenceState::Present => params.property_value.clone().map(Value::from),
        PresenceState::Absent => None,
    };

    let needs_change = match (&params.state, &desired) {
        (PresenceState::Present, Some(value)) => {
            before.as_ref().map(value_to_string) != Some(value_to_string(value))
        }
        _ => has_value(&before),
    };

    let uri = format!("{}/CustomProperties", node.uri);
    let patch = properties([(params.property_name.clone(), desired.clone().unwrap_or(Value::Null))]);
    let mut reconciler = Reconciler::new(mode);
    reconciler
        .converge(needs_change, "set custom property", || swis.update(&uri, &patch))
        .await?;

    let after = if needs_change { desired } else { before.clone() };
    let change = CustomPropertyChange {
        name: params.property_name.clone(),
        before,
        after,
    };
    Ok(reconciler.finish(Some(node), change))
}
