// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node lifecycle
//!
//! # States
//!
//! - `present`: create the node when no node matches, assign its credential
//!   set and attach the default pollers for its polling method
//! - `absent`: delete the node
//! - `managed` / `unmanaged`: `Remanage` or `Unmanage` the node
//! - `muted` / `unmuted`: suppress or resume alerts for the node
//!
//! `present` and `absent` do not skip on a missing node: a missing node is
//! what `present` creates and what `absent` wants. The other states skip.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::client::{Row, Swis};
use crate::domain::poller::default_node_pollers;
use crate::domain::{AuthMethod, CredentialKind, NetObject, Node, NodeRef, PollingMethod, PrivMethod, Secret};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::credential_set::assign_credential_set;
use super::default_true;
use super::node_poller::ensure_poller;

const NODES: &str = "Orion.Nodes";
const ALERT_SUPPRESSION: &str = "Orion.AlertSuppression";

/// `SuppressionMode` of an entity whose alerts are not suppressed
pub const NOT_SUPPRESSED: i64 = 0;
/// `SuppressionMode` of an entity whose alerts are suppressed
pub const SUPPRESSED: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Present,
    Absent,
    Managed,
    Unmanaged,
    Muted,
    Unmuted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnmpVersion {
    #[serde(rename = "2", alias = "2c")]
    V2,
    #[serde(rename = "3")]
    V3,
}

impl SnmpVersion {
    pub fn number(&self) -> i64 {
        match self {
            SnmpVersion::V2 => 2,
            SnmpVersion::V3 => 3,
        }
    }
}

fn default_snmp_port() -> u16 {
    161
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: NodeState,
    /// Start of an unmanage or mute window, defaults to now
    #[serde(default)]
    pub unmanage_from: Option<DateTime<Utc>>,
    /// End of an unmanage or mute window, defaults to 24 hours after the start
    #[serde(default)]
    pub unmanage_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub polling_method: PollingMethod,
    #[serde(default)]
    pub ro_community_string: Option<Secret>,
    #[serde(default)]
    pub rw_community_string: Option<Secret>,
    #[serde(default)]
    pub snmp_version: Option<SnmpVersion>,
    #[serde(default)]
    pub snmpv3_credential_set: Option<String>,
    #[serde(default)]
    pub snmpv3_username: Option<String>,
    #[serde(default)]
    pub snmpv3_auth_method: Option<AuthMethod>,
    #[serde(default)]
    pub snmpv3_auth_key: Option<Secret>,
    #[serde(default)]
    pub snmpv3_auth_key_is_pwd: Option<bool>,
    #[serde(default)]
    pub snmpv3_priv_method: Option<PrivMethod>,
    #[serde(default)]
    pub snmpv3_priv_key: Option<Secret>,
    #[serde(default)]
    pub snmpv3_priv_key_is_pwd: Option<bool>,
    #[serde(default = "default_snmp_port")]
    pub snmp_port: u16,
    #[serde(default = "default_true")]
    pub snmp_allow_64: bool,
    #[serde(default)]
    pub wmi_credential_set: Option<String>,
    /// Polling engine id; the least used engine when unset
    #[serde(default)]
    pub polling_engine: Option<i64>,
}

fn missing(condition: &str, fields: &[&str]) -> OrionError {
    OrionError::InvalidParameters(format!(
        "{} but all of the following are missing: {}",
        condition,
        fields.join(", ")
    ))
}

impl NodeParams {
    pub fn new(node: NodeRef, state: NodeState) -> Self {
        Self {
            node,
            state,
            unmanage_from: None,
            unmanage_until: None,
            polling_method: PollingMethod::default(),
            ro_community_string: None,
            rw_community_string: None,
            snmp_version: None,
            snmpv3_credential_set: None,
            snmpv3_username: None,
            snmpv3_auth_method: None,
            snmpv3_auth_key: None,
            snmpv3_auth_key_is_pwd: None,
            snmpv3_priv_method: None,
            snmpv3_priv_key: None,
            snmpv3_priv_key_is_pwd: None,
            snmp_port: default_snmp_port(),
            snmp_allow_64: true,
            wmi_credential_set: None,
            polling_engine: None,
        }
    }

    /// Check required-if rules before any remote call
    pub fn validate(&self) -> OrionResult<()> {
        if self.node.is_empty() {
            return Err(OrionError::InvalidParameters(
                "one of the following is required: name, node_id, ip_address".to_string(),
            ));
        }
        if self.state == NodeState::Present {
            let mut absent = Vec::new();
            if self.node.name.as_deref().map_or(true, str::is_empty) {
                absent.push("name");
            }
            if self.node.ip_address.as_deref().map_or(true, str::is_empty) {
                absent.push("ip_address");
            }
            if !absent.is_empty() {
                return Err(missing("state is present", &absent));
            }
        }
        match self.snmp_version {
            Some(SnmpVersion::V2) if self.ro_community_string.is_none() => {
                return Err(missing("snmp_version is 2", &["ro_community_string"]));
            }
            Some(SnmpVersion::V3) => {
                let mut absent = Vec::new();
                if self.snmpv3_username.is_none() {
                    absent.push("snmpv3_username");
                }
                if self.snmpv3_auth_key.is_none() {
                    absent.push("snmpv3_auth_key");
                }
                if self.snmpv3_priv_key.is_none() {
                    absent.push("snmpv3_priv_key");
                }
                if !absent.is_empty() {
                    return Err(missing("snmp_version is 3", &absent));
                }
            }
            _ => {}
        }
        match self.polling_method {
            PollingMethod::Snmp if self.snmp_version.is_none() => {
                Err(missing("polling_method is SNMP", &["snmp_version"]))
            }
            PollingMethod::Wmi if self.wmi_credential_set.is_none() => {
                Err(missing("polling_method is WMI", &["wmi_credential_set"]))
            }
            _ => Ok(()),
        }
    }

    fn is_snmpv3(&self) -> bool {
        self.polling_method == PollingMethod::Snmp && self.snmp_version == Some(SnmpVersion::V3)
    }

    /// Property set for `Create/Orion.Nodes`
    pub fn create_properties(&self, engine_id: i64) -> Row {
        let mut props = Row::new();
        props.insert("IPAddress".into(), self.node.ip_address.clone().unwrap_or_default().into());
        props.insert("Caption".into(), self.node.name.clone().unwrap_or_default().into());
        props.insert("ObjectSubType".into(), self.polling_method.object_sub_type().into());
        props.insert("External".into(), self.polling_method.is_external().into());
        props.insert("EngineID".into(), engine_id.into());
        props.insert("AgentPort".into(), self.snmp_port.into());
        props.insert("Allow64BitCounters".into(), self.snmp_allow_64.into());

        if let Some(community) = &self.ro_community_string {
            props.insert("Community".into(), community.expose().into());
        }
        if let Some(community) = &self.rw_community_string {
            props.insert("RWCommunity".into(), community.expose().into());
        }
        if let Some(version) = self.snmp_version {
            props.insert("SNMPVersion".into(), version.number().into());
        }

        // Creation fails without all three SNMPv3 fields, even with a credential set
        if self.is_snmpv3() {
            if let Some(username) = &self.snmpv3_username {
                props.insert("SNMPV3Username".into(), username.clone().into());
            }
            if let Some(key) = &self.snmpv3_priv_key {
                props.insert("SNMPV3PrivKey".into(), key.expose().into());
            }
            if let Some(key) = &self.snmpv3_auth_key {
                props.insert("SNMPV3AuthKey".into(), key.expose().into());
            }
            let priv_method = self.snmpv3_priv_method.unwrap_or(PrivMethod::Aes128);
            let auth_method = self.snmpv3_auth_method.unwrap_or(AuthMethod::Sha1);
            props.insert("SNMPV3PrivMethod".into(), priv_method.as_str().into());
            props.insert("SNMPV3PrivKeyIsPwd".into(), self.snmpv3_priv_key_is_pwd.unwrap_or(true).into());
            props.insert("SNMPV3AuthMethod".into(), auth_method.as_str().into());
            props.insert("SNMPV3AuthKeyIsPwd".into(), self.snmpv3_auth_key_is_pwd.unwrap_or(true).into());
        }
        props
    }

    /// Credential set to assign after creation, with the setting it goes to
    fn credential_assignment(&self) -> Option<(&str, CredentialKind)> {
        match self.polling_method {
            PollingMethod::Snmp if self.is_snmpv3() => self
                .snmpv3_credential_set
                .as_deref()
                .map(|name| (name, CredentialKind::Snmpv3)),
            PollingMethod::Wmi => self.wmi_credential_set.as_deref().map(|name| (name, CredentialKind::Wmi)),
            _ => None,
        }
    }

    /// Unmanage or mute window, defaulting to the next 24 hours
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self.unmanage_from.unwrap_or(now);
        let until = self.unmanage_until.unwrap_or(from + Duration::days(1));
        (from, until)
    }
}

async fn add_node(swis: &dyn Swis, params: &NodeParams) -> OrionResult<Node> {
    let engine_id = match params.polling_engine {
        Some(engine) => engine,
        None => lookups::least_used_engine(swis).await?,
    };

    let uri = swis.create(NODES, &params.create_properties(engine_id)).await?;
    info!("Created node {}", uri);

    let node = resolve_node(swis, &params.node)
        .await?
        .ok_or_else(|| OrionError::Precondition(format!("Node {} not found after creation", uri)))?;

    if let Some((name, kind)) = params.credential_assignment() {
        let credential = lookups::credential_set(swis, name)
            .await?
            .ok_or_else(|| OrionError::Precondition(format!("Credential set {} not found", name)))?;
        assign_credential_set(swis, &node, &credential, kind, None).await?;
    }

    let net_object = NetObject::node(node.node_id);
    for (poller_type, enabled) in default_node_pollers(params.polling_method) {
        ensure_poller(swis, &net_object, poller_type, *enabled).await?;
    }
    Ok(node)
}

fn timestamp(value: DateTime<Utc>) -> Value {
    value.to_rfc3339().into()
}

pub async fn run(swis: &dyn Swis, params: &NodeParams, mode: CheckMode) -> OrionResult<ModuleOutcome<()>> {
    params.validate()?;

    let node = resolve_node(swis, &params.node).await?;
    let mut reconciler = Reconciler::new(mode);

    let node = match params.state {
        NodeState::Present => match node {
            Some(node) => Some(node),
            None => reconciler.converge(true, "create node", || add_node(swis, params)).await?,
        },
        NodeState::Absent => {
            if let Some(existing) = &node {
                reconciler
                    .converge(true, "remove node", || swis.delete(&existing.uri))
                    .await?;
            }
            node
        }
        state => {
            let Some(node) = node else {
                return Ok(ModuleOutcome::node_not_found());
            };
            let (from, until) = params.window(Utc::now());
            let net_object = Value::from(node.net_object_id.clone());
            let uris = Value::Array(vec![node.uri.clone().into()]);

            match state {
                NodeState::Managed => {
                    reconciler
                        .converge(node.unmanaged, "remanage node", || {
                            swis.invoke(NODES, "Remanage", vec![net_object.clone()])
                        })
                        .await?;
                }
                NodeState::Unmanaged => {
                    reconciler
                        .converge(!node.unmanaged, "unmanage node", || {
                            swis.invoke(
                                NODES,
                                "Unmanage",
                                vec![net_object.clone(), timestamp(from), timestamp(until), false.into()],
                            )
                        })
                        .await?;
                }
                NodeState::Muted | NodeState::Unmuted => {
                    let suppression = lookups::suppression_mode(swis, &node.uri).await?;
                    if state == NodeState::Muted {
                        reconciler
                            .converge(suppression == NOT_SUPPRESSED, "mute node", || {
                                swis.invoke(
                                    ALERT_SUPPRESSION,
                                    "SuppressAlerts",
                                    vec![uris.clone(), timestamp(from), timestamp(until)],
                                )
                            })
                            .await?;
                    } else {
                        reconciler
                            .converge(suppression == SUPPRESSED, "unmute node", || {
                                swis.invoke(ALERT_SUPPRESSION, "ResumeAlerts", vec![uris.clone()])
                            })
                            .await?;
                    }
                }
                NodeState::Present | NodeState::Absent => {}
            }
            Some(node)
        }
    };

    Ok(reconciler.finish(node, ()))
}
