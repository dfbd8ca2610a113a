// Copyright (c) 2025 - Cowboy AI, Inc.
//! SolarWinds Information Service (SWIS) client abstraction
//!
//! The [`Swis`] trait is the only seam between the reconcile logic and the
//! remote object store. It mirrors the fixed verb set SWIS exposes:
//!
//! ```text
//! query   POST   Query                 {query, parameters}  -> {results: [...]}
//! create  POST   Create/<entity>       {properties}         -> "swis://..."
//! read    GET    <uri>                                      -> {properties}
//! update  POST   <uri>                 {properties}
//! delete  DELETE <uri>
//! invoke  POST   Invoke/<entity>/<verb> [args...]            -> value
//! ```
//!
//! A client is constructed once per invocation and passed by reference to
//! every operation; there is no process-wide handle.

pub mod config;
pub mod http;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::{OrionError, OrionResult};
use crate::swql::Query;

pub use config::SwisConfig;
pub use http::SwisClient;

/// One record as returned by SWIS, or a property set sent to it
pub type Row = Map<String, Value>;

/// Query used to verify connectivity and credentials
pub const PROBE_QUERY: &str = "SELECT Uri FROM Orion.Environment";

/// Remote object store operations
#[async_trait]
pub trait Swis: Send + Sync {
    /// Run a read-only SWQL query
    async fn query(&self, query: &Query) -> OrionResult<Vec<Row>>;

    /// Create an entity instance and return its URI
    async fn create(&self, entity: &str, properties: &Row) -> OrionResult<String>;

    /// Read all properties of the entity at `uri`
    async fn read(&self, uri: &str) -> OrionResult<Row>;

    /// Update the given properties of the entity at `uri`
    async fn update(&self, uri: &str, properties: &Row) -> OrionResult<()>;

    /// Delete the entity at `uri`
    async fn delete(&self, uri: &str) -> OrionResult<()>;

    /// Invoke a verb on an entity type with positional arguments
    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> OrionResult<Value>;

    /// First row of a query, if any
    async fn query_one(&self, query: &Query) -> OrionResult<Option<Row>> {
        Ok(self.query(query).await?.into_iter().next())
    }

    /// Verify the endpoint answers queries with the configured credentials
    async fn probe(&self) -> OrionResult<()> {
        self.query(&Query::new(PROBE_QUERY))
            .await
            .map(|_| ())
            .map_err(|e| match e {
                OrionError::Remote { message, .. } => OrionError::Connection(message),
                other => other,
            })
    }
}

/// Typed field access on SWIS rows.
///
/// SWIS echoes column names with the casing used in the query, so lookups
/// fall back to a case-insensitive match.
pub trait RowExt {
    /// Raw field value; a missing field is a parse error
    fn field(&self, name: &str) -> OrionResult<&Value>;

    /// Field value, `None` when absent or null
    fn opt_field(&self, name: &str) -> Option<&Value>;

    /// Field rendered as a string (numbers are formatted, null is empty)
    fn string(&self, name: &str) -> OrionResult<String> {
        Ok(value_to_string(self.field(name)?))
    }

    /// Optional string field
    fn opt_string(&self, name: &str) -> Option<String> {
        self.opt_field(name).map(value_to_string)
    }

    /// Integer field (accepts numeric strings)
    fn int(&self, name: &str) -> OrionResult<i64> {
        let value = self.field(name)?;
        value_to_int(value)
            .ok_or_else(|| OrionError::Parse(format!("field '{}' is not an integer: {}", name, value)))
    }

    /// Optional integer field
    fn opt_int(&self, name: &str) -> Option<i64> {
        self.opt_field(name).and_then(value_to_int)
    }

    /// Boolean field (accepts 0/1 and "true"/"false")
    fn bool(&self, name: &str) -> OrionResult<bool> {
        let value = self.field(name)?;
        value_to_bool(value)
            .ok_or_else(|| OrionError::Parse(format!("field '{}' is not a boolean: {}", name, value)))
    }
}

impl RowExt for Row {
    fn field(&self, name: &str) -> OrionResult<&Value> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .ok_or_else(|| OrionError::Parse(format!("field '{}' missing from result row", name)))
    }

    fn opt_field(&self, name: &str) -> Option<&Value> {
        self.field(name).ok().filter(|v| !v.is_null())
    }
}

/// Render a scalar value the way SWIS would print it
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "y" | "yes" => Some(true),
            "false" | "0" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Build a property row from `(name, value)` pairs
pub fn properties<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let r = row(json!({"volumeid": 7, "Caption": "C:\\"}));
        assert_eq!(r.int("VolumeID").unwrap(), 7);
        assert_eq!(r.string("caption").unwrap(), "C:\\");
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let r = row(json!({"NodeID": 1}));
        let err = r.field("DNS").unwrap_err();
        assert!(matches!(err, OrionError::Parse(_)));
        assert!(err.to_string().contains("DNS"));
    }

    #[test]
    fn test_scalar_coercions() {
        let r = row(json!({"a": "12", "b": 1, "c": "true", "d": null, "e": 3.0}));
        assert_eq!(r.int("a").unwrap(), 12);
        assert!(r.bool("b").unwrap());
        assert!(r.bool("c").unwrap());
        assert_eq!(r.opt_field("d"), None);
        assert_eq!(r.string("d").unwrap(), "");
        assert_eq!(r.int("e").unwrap(), 3);
    }
}
