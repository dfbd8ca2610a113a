// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Interfaces
//!
//! Interfaces are added through discovery: `DiscoverInterfacesOnNode`
//! returns candidate records (with `InterfaceID == 0` for interfaces not yet
//! monitored), and `AddInterfacesOnNode` takes a subset of those records back.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Row, RowExt};
use crate::errors::{OrionError, OrionResult};

/// A record returned by `DiscoverInterfacesOnNode`
///
/// The raw record is kept because `AddInterfacesOnNode` expects the
/// discovered objects verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveredInterface(Row);

impl DiscoveredInterface {
    pub fn from_value(value: &Value) -> OrionResult<Self> {
        let row = value
            .as_object()
            .cloned()
            .ok_or_else(|| OrionError::Parse(format!("discovered interface is not an object: {}", value)))?;
        row.field("Caption")?;
        Ok(Self(row))
    }

    pub fn caption(&self) -> String {
        self.0.opt_string("Caption").unwrap_or_default()
    }

    /// Zero until the interface is monitored
    pub fn interface_id(&self) -> i64 {
        self.0.opt_int("InterfaceID").unwrap_or_default()
    }

    pub fn is_monitored(&self) -> bool {
        self.interface_id() != 0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// How a requested interface name is compared against discovered captions
#[derive(Debug, Clone)]
pub enum InterfaceMatcher {
    Exact(String),
    Pattern(Regex),
}

impl InterfaceMatcher {
    pub fn new(name: &str, regex: bool) -> OrionResult<Self> {
        if regex {
            Regex::new(name)
                .map(InterfaceMatcher::Pattern)
                .map_err(|e| OrionError::InvalidParameters(format!("invalid interface regex: {}", e)))
        } else {
            Ok(InterfaceMatcher::Exact(name.to_string()))
        }
    }

    /// Regex patterns match anywhere in the caption
    pub fn matches(&self, caption: &str) -> bool {
        match self {
            InterfaceMatcher::Exact(name) => name == caption,
            InterfaceMatcher::Pattern(re) => re.is_match(caption),
        }
    }
}

/// A row of `Orion.NPM.Interfaces`, as reported by the info module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(rename = "Caption")]
    pub caption: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "InterfaceID")]
    pub interface_id: i64,
    #[serde(rename = "AdminStatus")]
    pub admin_status: i64,
    #[serde(rename = "OperStatus")]
    pub oper_status: i64,
    #[serde(rename = "Speed")]
    pub speed: f64,
    #[serde(rename = "Type")]
    pub interface_type: i64,
    #[serde(rename = "Status")]
    pub status: i64,
    #[serde(rename = "StatusDescription")]
    pub status_description: String,
}

impl Interface {
    pub const FIELDS: &'static str =
        "Caption, Name, InterfaceID, AdminStatus, OperStatus, Speed, Type, Status, StatusDescription";

    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            caption: row.string("Caption")?,
            name: row.opt_string("Name").unwrap_or_default(),
            interface_id: row.int("InterfaceID")?,
            admin_status: row.opt_int("AdminStatus").unwrap_or_default(),
            oper_status: row.opt_int("OperStatus").unwrap_or_default(),
            speed: row.opt_field("Speed").and_then(Value::as_f64).unwrap_or_default(),
            interface_type: row.opt_int("Type").unwrap_or_default(),
            status: row.opt_int("Status").unwrap_or_default(),
            status_description: row.opt_string("StatusDescription").unwrap_or_default(),
        })
    }
}
