// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reconcile Template
//!
//! Every resource module follows the same steps:
//!
//! 1. Resolve the node (a missing node short-circuits to
//!    [`ModuleOutcome::Skipped`]).
//! 2. Fetch the current value of the managed sub-resource or attribute.
//! 3. Compute `needs_change` by comparing against the desired state.
//! 4. If a change is needed and the run is not a dry run, issue the
//!    corrective call. Its failure is fatal and returned verbatim.
//! 5. Report `changed = needs_change` in both modes.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut reconciler = Reconciler::new(mode);
//! reconciler
//!     .converge(current != desired, "update node", || swis.update(&node.uri, &props))
//!     .await?;
//! Ok(reconciler.finish(Some(node), ()))
//! ```
//!
//! # Invariants
//!
//! - In [`CheckMode::DryRun`] the corrective closure is never called
//! - `changed` is the disjunction of every `needs_change` passed in

use serde::Serialize;
use std::future::Future;
use tracing::{debug, info};

use crate::domain::Node;
use crate::errors::OrionResult;

/// Whether corrective calls are applied or only predicted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    #[default]
    Apply,
    DryRun,
}

impl CheckMode {
    pub fn from_flag(check_mode: bool) -> Self {
        if check_mode {
            CheckMode::DryRun
        } else {
            CheckMode::Apply
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, CheckMode::DryRun)
    }
}

/// Tracks the `changed` flag across the steps of one module run
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    mode: CheckMode,
    changed: bool,
}

impl Reconciler {
    pub fn new(mode: CheckMode) -> Self {
        Self { mode, changed: false }
    }

    pub fn mode(&self) -> CheckMode {
        self.mode
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Run `action` when `needs_change` holds and the run applies changes.
    ///
    /// Returns `Some` with the action's result when it ran, `None` when no
    /// change was needed or the run is a dry run.
    pub async fn converge<T, F, Fut>(&mut self, needs_change: bool, step: &str, action: F) -> OrionResult<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = OrionResult<T>>,
    {
        if !needs_change {
            debug!("{}: already in desired state", step);
            return Ok(None);
        }

        self.changed = true;
        if self.mode.is_dry_run() {
            info!("{}: change needed, skipped in check mode", step);
            return Ok(None);
        }

        info!("{}: applying change", step);
        action().await.map(Some).map_err(|e| e.during(step))
    }

    /// Finish a run that resolved its node
    pub fn finish<T>(self, node: Option<Node>, payload: T) -> ModuleOutcome<T> {
        let report = Report { node, payload };
        if self.changed {
            ModuleOutcome::Changed(report)
        } else {
            ModuleOutcome::Unchanged(report)
        }
    }
}

/// Node attributes and module payload returned by a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    pub node: Option<Node>,
    pub payload: T,
}

/// Result of one module run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModuleOutcome<T> {
    Changed(Report<T>),
    Unchanged(Report<T>),
    /// The node (or another required object) was not found
    Skipped { reason: String },
}

impl<T> ModuleOutcome<T> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        ModuleOutcome::Skipped { reason: reason.into() }
    }

    /// Skip result for a node lookup that matched nothing
    pub fn node_not_found() -> Self {
        Self::skipped("Node not found")
    }

    pub fn changed(&self) -> bool {
        matches!(self, ModuleOutcome::Changed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ModuleOutcome::Skipped { .. })
    }

    pub fn report(&self) -> Option<&Report<T>> {
        match self {
            ModuleOutcome::Changed(report) | ModuleOutcome::Unchanged(report) => Some(report),
            ModuleOutcome::Skipped { .. } => None,
        }
    }

    pub fn node(&self) -> Option<&Node> {
        self.report().and_then(|r| r.node.as_ref())
    }

    pub fn payload(&self) -> Option<&T> {
        self.report().map(|r| &r.payload)
    }
}
