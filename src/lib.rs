// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative management of SolarWinds Orion monitoring objects
//!
//! Each resource module compares the desired state of one Orion object
//! (node, poller, volume, interface, credential, custom property, NCM
//! config...) against what the SolarWinds Information Service reports and
//! issues the calls needed to converge. A dry run predicts the change
//! without issuing them. The [`inventory`] module builds a dynamic host
//! inventory from `Orion.Nodes`.

pub mod client;
pub mod domain;
pub mod errors;
pub mod inventory;
pub mod reconcile;
pub mod resolver;
pub mod resources;
pub mod swql;

// Re-export commonly used types
pub use client::{Row, RowExt, Swis, SwisClient, SwisConfig};
pub use errors::{OrionError, OrionResult};
pub use reconcile::{CheckMode, ModuleOutcome, Reconciler, Report};
pub use resolver::resolve_node;
