// Copyright (c) 2025 - Cowboy AI, Inc.
//! Credential sets and their assignment to nodes
//!
//! `present` creates an SNMPv3 or Windows (WMI) credential set when no set
//! of that name exists. `assigned` points the node's credential setting at
//! the named set; SNMPv3 credentials are validated against the node first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{properties, Swis};
use crate::domain::{CredentialKind, CredentialSet, Node, NodeRef, Snmpv3Credentials, WmiCredentials};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::validate_snmpv3_credentials::{is_valid, validate_credentials};

const CREDENTIALS: &str = "Orion.Credential";

/// SNMP port used when validating against a node
pub const SNMP_PORT: u16 = 161;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSetState {
    Present,
    Assigned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSetParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: CredentialSetState,
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    pub credential_name: String,
    #[serde(default)]
    pub snmpv3: Option<Snmpv3Credentials>,
    #[serde(default)]
    pub wmi: Option<WmiCredentials>,
}

impl CredentialSetParams {
    pub fn validate(&self) -> OrionResult<()> {
        match self.kind {
            CredentialKind::Snmpv3 if self.snmpv3.is_none() => {
                return Err(OrionError::InvalidParameters(
                    "type is snmpv3 but all of the following are missing: snmpv3".to_string(),
                ))
            }
            CredentialKind::Wmi if self.wmi.is_none() => {
                return Err(OrionError::InvalidParameters(
                    "type is wmi but all of the following are missing: wmi".to_string(),
                ))
            }
            _ => {}
        }
        if self.state == CredentialSetState::Assigned && self.node.is_empty() {
            return Err(OrionError::InvalidParameters(
                "state is assigned but any of the following are missing: name, ip_address, node_id".to_string(),
            ));
        }
        Ok(())
    }

    fn create_call(&self) -> OrionResult<(&'static str, Vec<Value>)> {
        match (self.kind, &self.snmpv3, &self.wmi) {
            (CredentialKind::Snmpv3, Some(snmpv3), _) => {
                Ok(("CreateSNMPv3Credentials", snmpv3.create_args(&self.credential_name)))
            }
            (CredentialKind::Wmi, _, Some(wmi)) => {
                Ok(("CreateUsernamePasswordCredentials", wmi.create_args(&self.credential_name)))
            }
            _ => Err(OrionError::InvalidParameters(format!(
                "no credential material supplied for type {:?}",
                self.kind
            ))),
        }
    }
}

/// Point a node's credential setting at a credential set.
///
/// An existing setting is updated in place; otherwise one is created.
pub async fn assign_credential_set(
    swis: &dyn Swis,
    node: &Node,
    credential: &CredentialSet,
    kind: CredentialKind,
    existing_uri: Option<&str>,
) -> OrionResult<()> {
    let value = credential.id.to_string();
    match existing_uri {
        Some(uri) => swis.update(uri, &properties([("SettingValue", value)])).await,
        None => {
            let setting = properties([
                ("NodeID", Value::from(node.node_id)),
                ("SettingName", Value::from(kind.node_setting())),
                ("SettingValue", Value::from(value)),
            ]);
            swis.create("Orion.NodeSettings", &setting).await.map(|_| ())
        }
    }
}

async fn create_credential_set(swis: &dyn Swis, params: &CredentialSetParams) -> OrionResult<Option<CredentialSet>> {
    let (verb, args) = params.create_call()?;
    swis.invoke(CREDENTIALS, verb, args).await?;
    lookups::credential_set(swis, &params.credential_name).await
}

pub async fn run(
    swis: &dyn Swis,
    params: &CredentialSetParams,
    mode: CheckMode,
) -> OrionResult<ModuleOutcome<Option<CredentialSet>>> {
    params.validate()?;

    let mut credential = lookups::credential_set(swis, &params.credential_name).await?;
    let mut reconciler = Reconciler::new(mode);

    match params.state {
        CredentialSetState::Present => {
            if credential.is_none() {
                if let Some(created) = reconciler
                    .converge(true, "create credential set", || create_credential_set(swis, params))
                    .await?
                {
                    credential = created;
                }
            }
            Ok(reconciler.finish(None, credential))
        }
        CredentialSetState::Assigned => {
            let Some(node) = resolve_node(swis, &params.node).await? else {
                return Ok(ModuleOutcome::node_not_found());
            };
            let set = credential.clone().ok_or_else(|| {
                OrionError::Precondition(format!("Credential set {} not found", params.credential_name))
            })?;

            if let (CredentialKind::Snmpv3, Some(snmpv3)) = (params.kind, &params.snmpv3) {
                let result = validate_credentials(
                    swis,
                    &node.ip_address,
                    SNMP_PORT,
                    snmpv3.validation_details(),
                    node.engine_id,
                    None,
                )
                .await?;
                if !is_valid(&result) {
                    return Err(OrionError::Precondition("Failed to validate credentials on node.".to_string()));
                }
            }

            let current = lookups::node_setting(swis, &node, params.kind.node_setting()).await?;
            let needs_change = current.as_ref().map_or(true, |s| s.value != set.id.to_string());
            let existing_uri = current.as_ref().and_then(|s| s.uri.as_deref());
            reconciler
                .converge(needs_change, "assign credentials to node", || {
                    assign_credential_set(swis, &node, &set, params.kind, existing_uri)
                })
                .await?;

            Ok(reconciler.finish(Some(node), credential))
        }
    }
}
