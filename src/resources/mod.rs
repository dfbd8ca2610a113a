// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Modules
//!
//! One module per managed Orion object. Each exposes a `Params` type that
//! deserializes from the caller's parameter map and an async `run` that
//! reconciles it through [`crate::reconcile::Reconciler`].
//!
//! | Module | Manages |
//! |--------|---------|
//! | [`node`] | node lifecycle, management and alert suppression |
//! | [`node_info`] | node attributes, with a poll when SNMP data is stale |
//! | [`update_node`] | arbitrary node properties |
//! | [`custom_property`] | node custom property values |
//! | [`custom_poller`] | Universal Device Poller assignments |
//! | [`node_poller`] / [`node_poller_info`] | node pollers |
//! | [`volume`] / [`volume_info`] | volumes |
//! | [`node_interface`] / [`node_interface_info`] | interfaces |
//! | [`node_application`] | SAM applications |
//! | [`node_ncm`] / [`ncm_config`] | NCM membership and configs |
//! | [`hardware_health`] | hardware health monitoring |
//! | [`credential_set`] / [`node_update_snmpv3`] | credentials |
//! | [`validate_snmpv3_credentials`] | SNMPv3 credential tests |
//! | [`query`] | raw SWQL queries |

pub mod credential_set;
pub mod custom_poller;
pub mod custom_property;
pub mod hardware_health;
pub mod ncm_config;
pub mod node;
pub mod node_application;
pub mod node_info;
pub mod node_interface;
pub mod node_interface_info;
pub mod node_ncm;
pub mod node_poller;
pub mod node_poller_info;
pub mod node_update_snmpv3;
pub mod query;
pub mod update_node;
pub mod validate_snmpv3_credentials;
pub mod volume;
pub mod volume_info;

use serde::{Deserialize, Serialize};

/// Desired presence of a sub-resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    #[default]
    Present,
    Absent,
}

pub(crate) fn default_true() -> bool {
    true
}
