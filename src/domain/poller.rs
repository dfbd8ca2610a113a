// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pollers and Net Objects
//!
//! Orion attaches pollers to "net objects", addressed as `<type>:<id>`
//! (`N:12` for node 12, `V:40` for volume 40, `I:7` for interface 7).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::PollingMethod;
use crate::client::{Row, RowExt};
use crate::errors::OrionResult;

/// Kind of object a poller is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetObjectType {
    #[serde(rename = "N")]
    Node,
    #[serde(rename = "V")]
    Volume,
    #[serde(rename = "I")]
    Interface,
}

impl NetObjectType {
    /// One-letter prefix used by Orion
    pub fn prefix(&self) -> &'static str {
        match self {
            NetObjectType::Node => "N",
            NetObjectType::Volume => "V",
            NetObjectType::Interface => "I",
        }
    }
}

/// A pollable object reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetObject {
    pub kind: NetObjectType,
    pub id: i64,
}

impl NetObject {
    pub fn node(id: i64) -> Self {
        Self {
            kind: NetObjectType::Node,
            id,
        }
    }

    pub fn volume(id: i64) -> Self {
        Self {
            kind: NetObjectType::Volume,
            id,
        }
    }
}

impl fmt::Display for NetObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.id)
    }
}

/// An `Orion.Pollers` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poller {
    #[serde(rename = "PollerType")]
    pub poller_type: String,
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    #[serde(rename = "Uri", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Poller {
    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            poller_type: row.string("PollerType")?,
            enabled: row.bool("Enabled")?,
            uri: row.opt_string("Uri"),
        })
    }

    /// Property set for `Create Orion.Pollers` / `Update <uri>`
    pub fn properties(net_object: &NetObject, poller_type: &str, enabled: bool) -> Row {
        crate::client::properties([
            ("PollerType", serde_json::Value::from(poller_type)),
            ("NetObject", net_object.to_string().into()),
            ("NetObjectType", net_object.kind.prefix().into()),
            ("NetObjectID", net_object.id.into()),
            ("Enabled", enabled.into()),
        ])
    }
}

/// Pollers Orion enables by default on a new node, with their enabled flag
pub fn default_node_pollers(method: PollingMethod) -> &'static [(&'static str, bool)] {
    match method {
        PollingMethod::Icmp => &[
            ("N.Status.ICMP.Native", true),
            ("N.ResponseTime.ICMP.Native", true),
            ("N.IPAddress.ICMP.Generic", true),
        ],
        PollingMethod::Snmp => &[
            ("N.Status.ICMP.Native", true),
            ("N.Status.SNMP.Native", false),
            ("N.ResponseTime.ICMP.Native", true),
            ("N.ResponseTime.SNMP.Native", false),
            ("N.Details.SNMP.Generic", true),
            ("N.Uptime.SNMP.Generic", true),
            ("N.Routing.SNMP.Ipv4CidrRoutingTable", false),
            ("N.Topology_Layer3.SNMP.ipNetToMedia", false),
        ],
        PollingMethod::External | PollingMethod::Wmi | PollingMethod::Agent => &[],
    }
}

/// Pollers added to every newly created volume
pub const DEFAULT_VOLUME_POLLERS: [&str; 3] = [
    "V.Status.SNMP.Generic",
    "V.Details.SNMP.Generic",
    "V.Statistics.SNMP.Generic",
];
