// Copyright (c) 2025 - Cowboy AI, Inc.
//! Orion Domain Models
//!
//! Typed records for the objects this crate reconciles. Rows arrive from
//! SWIS as loosely-typed JSON maps; each record validates its row once at
//! the boundary (`from_row`) and converts back to a wire property set only
//! when a remote call needs one.
//!
//! # Records
//!
//! - [`NodeRef`] / [`Node`] - node lookup keys and the `Orion.Nodes` record
//! - [`NetObject`] / [`Poller`] - poller attachments
//! - [`VolumeSpec`] / [`Volume`] - desired and actual volumes
//! - [`DiscoveredInterface`] / [`Interface`] - interface discovery and listing
//! - [`Snmpv3Credentials`] / [`WmiCredentials`] / [`CredentialSet`] - credentials
//! - [`HardwarePollingMethod`] - hardware health sources
//! - [`ProfileIndex`] / [`ConfigMethod`] - NCM
//! - [`Secret`] - redacted caller-supplied secrets

pub mod credential;
pub mod hardware;
pub mod interface;
pub mod ncm;
pub mod network;
pub mod node;
pub mod poller;
pub mod secret;
pub mod volume;

pub use credential::{
    AuthMethod, CredentialKind, CredentialSet, PrivMethod, Snmpv3Credentials,
    StoredSnmpv3Credential, WmiCredentials,
};
pub use hardware::HardwarePollingMethod;
pub use interface::{DiscoveredInterface, Interface, InterfaceMatcher};
pub use ncm::{ArchivedConfig, ConfigMethod, ConnectionProfile, ProfileIndex};
pub use network::{parse_address, parse_port, NetworkError};
pub use node::{Node, NodeKey, NodeRef, PollingMethod};
pub use poller::{NetObject, NetObjectType, Poller};
pub use secret::Secret;
pub use volume::{Volume, VolumeSpec, VolumeType};
