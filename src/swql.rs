// Copyright (c) 2025 - Cowboy AI, Inc.
//! SWQL Query Construction
//!
//! SWQL is the read-only, SQL-like query dialect of the SolarWinds
//! Information Service. Values always travel as named `@parameters`;
//! only column and table names are spliced into the query text, and those
//! must pass [`identifier`] first.
//!
//! # Example
//!
//! ```rust
//! use orion_infrastructure::swql::Query;
//!
//! let query = Query::new("SELECT Uri FROM Orion.Nodes WHERE Caption = @caption")
//!     .param("caption", "router1");
//! assert_eq!(query.parameters()["caption"], "router1");
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::errors::OrionError;

/// SWQL identifier validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwqlError {
    #[error("SWQL identifier is empty")]
    Empty,

    #[error("Invalid SWQL identifier: {0}")]
    InvalidIdentifier(String),
}

impl From<SwqlError> for OrionError {
    fn from(err: SwqlError) -> Self {
        OrionError::InvalidParameters(err.to_string())
    }
}

/// A parameterized SWQL query, serialized as the body of `POST Query`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    #[serde(rename = "query")]
    text: String,
    parameters: Map<String, Value>,
}

impl Query {
    /// Create a query with no parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Map::new(),
        }
    }

    /// Bind a named parameter (referenced as `@name` in the text)
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    /// Query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound parameters
    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::new(text)
    }
}

/// Validate a column or alias name before splicing it into query text
pub fn identifier(name: &str) -> Result<&str, SwqlError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(SwqlError::Empty)?;

    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(SwqlError::InvalidIdentifier(name.to_string()));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SwqlError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}
