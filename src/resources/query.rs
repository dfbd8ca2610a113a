// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ad-hoc read query, optionally exported as CSV

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::{value_to_string, Row, Swis};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::swql::Query;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub query: String,
    /// Named `@parameters` for the query
    #[serde(default)]
    pub parameters: Row,
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
}

/// Write rows as CSV with a header taken from the first row's columns
pub fn write_csv(rows: &[Row], path: &Path) -> OrionResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| OrionError::Serialization(e.to_string()))?;
    let headers: Vec<&String> = rows.first().map(|row| row.keys().collect()).unwrap_or_default();

    if !headers.is_empty() {
        writer
            .write_record(&headers)
            .map_err(|e| OrionError::Serialization(e.to_string()))?;
    }
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(value_to_string).unwrap_or_default())
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| OrionError::Serialization(e.to_string()))?;
    }
    writer.flush().map_err(|e| OrionError::Serialization(e.to_string()))?;
    Ok(())
}

pub async fn run(swis: &dyn Swis, params: &QueryParams, mode: CheckMode) -> OrionResult<ModuleOutcome<Vec<Row>>> {
    if params.query.trim().is_empty() {
        return Err(OrionError::InvalidParameters("query must not be empty".to_string()));
    }

    let query = params
        .parameters
        .iter()
        .fold(Query::new(params.query.as_str()), |q, (name, value): (&String, &Value)| {
            q.param(name, value.clone())
        });
    let rows = swis.query(&query).await?;

    if let Some(path) = &params.csv_path {
        write_csv(&rows, path)?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(Reconciler::new(mode).finish(None, rows))
}
