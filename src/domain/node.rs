// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Reference and Node Record
//!
//! A [`NodeRef`] carries the alternative keys a caller may use to locate a
//! node; [`Node`] is the typed view of the matching `Orion.Nodes` row.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::network::parse_address;
use crate::client::{Row, RowExt};
use crate::errors::{OrionError, OrionResult};

/// Alternative identifying keys for one node
///
/// Exactly one non-empty key is expected. When several are supplied the
/// resolver uses the first in priority order: `node_id`, `ip_address`,
/// `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Orion NodeID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Polling IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Display name (Caption)
    #[serde(default, alias = "caption", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The key selected from a [`NodeRef`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey {
    Id(i64),
    /// Validated address, kept as written so Orion compares its own text form
    Address(String),
    Name(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Id(id) => write!(f, "node_id={}", id),
            NodeKey::Address(addr) => write!(f, "ip_address={}", addr),
            NodeKey::Name(name) => write!(f, "name={}", name),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl NodeRef {
    /// Reference a node by id
    pub fn by_id(id: impl ToString) -> Self {
        Self {
            node_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// Reference a node by polling address
    pub fn by_address(address: impl Into<String>) -> Self {
        Self {
            ip_address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Reference a node by caption
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Whether any key is present
    pub fn is_empty(&self) -> bool {
        non_empty(&self.node_id).is_none()
            && non_empty(&self.ip_address).is_none()
            && non_empty(&self.name).is_none()
    }

    /// Select the key to resolve by, in fixed priority order
    pub fn key(&self) -> OrionResult<NodeKey> {
        if let Some(id) = non_empty(&self.node_id) {
            let id = id.parse::<i64>().map_err(|_| {
                OrionError::InvalidParameters(format!("node_id must be numeric: {}", id))
            })?;
            return Ok(NodeKey::Id(id));
        }
        if let Some(address) = non_empty(&self.ip_address) {
            parse_address(address)?;
            return Ok(NodeKey::Address(address.to_string()));
        }
        if let Some(name) = non_empty(&self.name) {
            return Ok(NodeKey::Name(name.to_string()));
        }
        Err(OrionError::InvalidParameters(
            "one of the following is required: name, node_id, ip_address".to_string(),
        ))
    }
}

/// Public attributes of an `Orion.Nodes` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "nodeid")]
    pub node_id: i64,
    pub caption: String,
    #[serde(rename = "netobjectid")]
    pub net_object_id: String,
    pub unmanaged: bool,
    #[serde(rename = "unmanagefrom")]
    pub unmanage_from: Option<DateTime<Utc>>,
    #[serde(rename = "unmanageuntil")]
    pub unmanage_until: Option<DateTime<Utc>>,
    pub uri: String,
    #[serde(rename = "objectsubtype")]
    pub object_sub_type: String,
    #[serde(rename = "ipaddress")]
    pub ip_address: String,
    pub status: i64,
    #[serde(rename = "statusdescription")]
    pub status_description: String,
    #[serde(rename = "lastsystemuptimepollutc")]
    pub last_system_uptime_poll: Option<DateTime<Utc>>,
    #[serde(rename = "engineid")]
    pub engine_id: i64,
}

impl Node {
    /// Columns selected from `Orion.Nodes` to build a [`Node`]
    pub const FIELDS: &'static str = "NodeID, Caption, Unmanaged, UnManageFrom, UnManageUntil, Uri, \
        ObjectSubType, IP_Address, Status, StatusDescription, LastSystemUpTimePollUtc, EngineID";

    /// Build from a query row selecting [`Node::FIELDS`]
    pub fn from_row(row: &Row) -> OrionResult<Self> {
        let node_id = row.int("NodeID")?;
        Ok(Self {
            node_id,
            caption: row.string("Caption")?,
            net_object_id: format!("N:{}", node_id),
            unmanaged: row.bool("Unmanaged")?,
            unmanage_from: row.opt_string("UnManageFrom").and_then(|s| parse_timestamp(&s)),
            unmanage_until: row.opt_string("UnManageUntil").and_then(|s| parse_timestamp(&s)),
            uri: row.string("Uri")?,
            object_sub_type: row.string("ObjectSubType")?,
            ip_address: row.string("IP_Address")?,
            status: row.opt_int("Status").unwrap_or_default(),
            status_description: row.opt_string("StatusDescription").unwrap_or_default(),
            last_system_uptime_poll: row
                .opt_string("LastSystemUpTimePollUtc")
                .and_then(|s| parse_timestamp(&s)),
            engine_id: row.opt_int("EngineID").unwrap_or(1),
        })
    }

    /// Whether the node is polled over SNMP
    pub fn is_snmp(&self) -> bool {
        self.object_sub_type.eq_ignore_ascii_case("SNMP")
    }
}

/// Parse a SWIS timestamp.
///
/// SWIS emits both RFC 3339 values and zone-less values with up to seven
/// fractional digits; zone-less values are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// How Orion polls a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollingMethod {
    #[serde(alias = "external", alias = "EXTERNAL")]
    External,
    #[default]
    #[serde(rename = "ICMP", alias = "icmp")]
    Icmp,
    #[serde(rename = "SNMP", alias = "snmp")]
    Snmp,
    #[serde(rename = "WMI", alias = "wmi")]
    Wmi,
    #[serde(alias = "agent", alias = "AGENT")]
    Agent,
}

impl PollingMethod {
    /// Value of `ObjectSubType` for a node polled this way
    pub fn object_sub_type(&self) -> &'static str {
        match self {
            PollingMethod::External | PollingMethod::Icmp => "ICMP",
            PollingMethod::Snmp => "SNMP",
            PollingMethod::Wmi => "WMI",
            PollingMethod::Agent => "AGENT",
        }
    }

    /// External nodes are created as ICMP nodes with `External = true`
    pub fn is_external(&self) -> bool {
        matches!(self, PollingMethod::External)
    }
}
