// Copyright (c) 2025 - Cowboy AI, Inc.
//! SNMPv3 credential update for a node
//!
//! `UpdateSNMPv3Credentials` replaces the whole credential, so this module
//! reads the node's current credential, overlays the supplied fields and
//! sends the FULL record. This differs from the partial patch used for node
//! properties and custom properties.

use serde::{Deserialize, Serialize};

use crate::client::Swis;
use crate::domain::{AuthMethod, NodeRef, PrivMethod, Secret, StoredSnmpv3Credential};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdateSnmpv3Params {
    #[serde(flatten)]
    pub node: NodeRef,
    #[serde(default)]
    pub snmpv3_username: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub snmpv3_auth_method: Option<AuthMethod>,
    #[serde(default)]
    pub snmpv3_auth_key: Option<Secret>,
    #[serde(default)]
    pub auth_key_is_password: Option<bool>,
    #[serde(default)]
    pub snmpv3_priv_method: Option<PrivMethod>,
    #[serde(default)]
    pub snmpv3_priv_key: Option<Secret>,
    #[serde(default)]
    pub priv_key_is_password: Option<bool>,
}

fn overlay<T: PartialEq>(changed: &mut Vec<&'static str>, field: &'static str, current: &mut T, desired: Option<T>) {
    if let Some(desired) = desired {
        if *current != desired {
            *current = desired;
            changed.push(field);
        }
    }
}

impl NodeUpdateSnmpv3Params {
    /// Overlay the supplied fields on `current`, returning the names of the
    /// fields that differ
    pub fn apply_to(&self, current: &mut StoredSnmpv3Credential) -> Vec<&'static str> {
        let mut changed = Vec::new();
        overlay(&mut changed, "username", &mut current.username, self.snmpv3_username.clone());
        overlay(&mut changed, "context", &mut current.context, self.context.clone());
        overlay(
            &mut changed,
            "auth_method",
            &mut current.auth_method,
            self.snmpv3_auth_method.map(|m| m.as_str().to_string()),
        );
        overlay(
            &mut changed,
            "auth_key",
            &mut current.auth_key,
            self.snmpv3_auth_key.as_ref().map(|k| k.expose().to_string()),
        );
        overlay(&mut changed, "auth_key_is_password", &mut current.auth_key_is_pwd, self.auth_key_is_password);
        overlay(
            &mut changed,
            "priv_method",
            &mut current.priv_method,
            self.snmpv3_priv_method.map(|m| m.as_str().to_string()),
        );
        overlay(
            &mut changed,
            "priv_key",
            &mut current.priv_key,
            self.snmpv3_priv_key.as_ref().map(|k| k.expose().to_string()),
        );
        overlay(&mut changed, "priv_key_is_password", &mut current.priv_key_is_pwd, self.priv_key_is_password);
        changed
    }
}

pub async fn run(
    swis: &dyn Swis,
    params: &NodeUpdateSnmpv3Params,
    mode: CheckMode,
) -> OrionResult<ModuleOutcome<Vec<&'static str>>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let mut credential = lookups::stored_snmpv3_credential(swis, &node)
        .await
        .map_err(|e| e.during("query SNMPv3 credentials"))?
        .ok_or_else(|| OrionError::Precondition("SNMPv3 credentials not found for this node".to_string()))?;

    let changed = params.apply_to(&mut credential);
    let mut reconciler = Reconciler::new(mode);
    reconciler
        .converge(!changed.is_empty(), "update SNMPv3 credentials", || {
            swis.invoke("Orion.Credential", "UpdateSNMPv3Credentials", credential.update_args())
        })
        .await?;

    Ok(reconciler.finish(Some(node), changed))
}
