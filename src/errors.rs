// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for Orion operations
//!
//! "Not found" is deliberately absent from this enum: a missing node or
//! sub-resource is an expected outcome and is reported through
//! [`crate::reconcile::ModuleOutcome::Skipped`] instead.

use thiserror::Error;

/// Errors that can occur while talking to or reconciling against Orion
#[derive(Debug, Error)]
pub enum OrionError {
    /// Transport or authentication failure against the SWIS endpoint
    #[error("Failed to query Orion. Check Hostname, Username, and/or Password: {0}")]
    Connection(String),

    /// A remote verb (query, create, update, delete, invoke) failed
    #[error("Failed to {operation}: {message}")]
    Remote { operation: String, message: String },

    /// A remote object the operation depends on does not exist
    #[error("{0}")]
    Precondition(String),

    /// Caller-supplied parameters are inconsistent
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A returned row is missing a field or has an unexpected type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Inventory cache error
    #[error("Cache error: {0}")]
    Cache(String),
}

impl OrionError {
    /// Wrap a remote failure with the name of the step that issued it
    pub fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        OrionError::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Re-label a remote failure with the module-level step it belongs to.
    ///
    /// Other variants pass through unchanged.
    pub fn during(self, operation: &str) -> Self {
        match self {
            OrionError::Remote { message, .. } => OrionError::Remote {
                operation: operation.to_string(),
                message,
            },
            other => other,
        }
    }
}

/// Result type for Orion operations
pub type OrionResult<T> = Result<T, OrionError>;

impl From<serde_json::Error> for OrionError {
    fn from(err: serde_json::Error) -> Self {
        OrionError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for OrionError {
    fn from(err: serde_yaml::Error) -> Self {
        OrionError::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for OrionError {
    fn from(err: std::io::Error) -> Self {
        OrionError::Cache(err.to_string())
    }
}
