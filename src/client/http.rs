// Copyright (c) 2025 - Cowboy AI, Inc.

//! SWIS REST transport
//!
//! Implements [`Swis`] over the JSON endpoint of the SolarWinds Information
//! Service using `reqwest` with HTTP basic authentication.
//!
//! # Example
//!
//! ```rust,no_run
//! use orion_infrastructure::client::{Swis, SwisClient, SwisConfig};
//! use orion_infrastructure::swql::Query;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SwisConfig::new("orion.example.com", "admin", "secret");
//!     let swis = SwisClient::connect(config).await?;
//!
//!     let rows = swis.query(&Query::new("SELECT TOP 5 Caption FROM Orion.Nodes")).await?;
//!     println!("{} nodes", rows.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{Row, Swis, SwisConfig};
use crate::errors::{OrionError, OrionResult};
use crate::swql::Query;

/// HTTP client for one SWIS endpoint
#[derive(Clone)]
pub struct SwisClient {
    config: SwisConfig,
    client: Client,
    base_url: String,
}

impl SwisClient {
    /// Build a client without contacting the server
    pub fn new(config: SwisConfig) -> OrionResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify)
            .build()
            .map_err(|e| OrionError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url();
        Ok(Self {
            config,
            client,
            base_url,
        })
    }

    /// Build a client and verify connectivity with the probe query
    pub async fn connect(config: SwisConfig) -> OrionResult<Self> {
        info!(
            "Connecting to SWIS at {}:{} as {}",
            config.hostname, config.port, config.username
        );
        let swis = Self::new(config)?;
        swis.probe().await?;
        info!("SWIS connection verified");
        Ok(swis)
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &SwisConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> OrionResult<Response> {
        let url = self.url(path);
        debug!("SWIS {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(self.config.effective_username(), Some(&self.config.password));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OrionError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(OrionError::Connection(message))
        } else {
            Err(OrionError::remote(operation, message))
        }
    }

    async fn json(&self, operation: &str, response: Response) -> OrionResult<Value> {
        let text = response
            .text()
            .await
            .map_err(|e| OrionError::remote(operation, e))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| OrionError::Parse(format!("{}: {}", operation, e)))
    }
}

/// Extract the vendor's `Message` from an error body, falling back to the
/// HTTP status line
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("Message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, body.trim())
            }
        })
}

#[async_trait]
impl Swis for SwisClient {
    async fn query(&self, query: &Query) -> OrionResult<Vec<Row>> {
        let operation = "query";
        debug!("SWQL: {}", query);
        let response = self.send(operation, Method::POST, "Query", Some(query)).await?;
        let body = self.json(operation, response).await?;

        match body.get("results") {
            Some(Value::Array(rows)) => rows
                .iter()
                .map(|r| {
                    r.as_object()
                        .cloned()
                        .ok_or_else(|| OrionError::Parse(format!("query row is not an object: {}", r)))
                })
                .collect(),
            _ => Err(OrionError::Parse(format!(
                "query response has no 'results' array: {}",
                body
            ))),
        }
    }

    async fn create(&self, entity: &str, properties: &Row) -> OrionResult<String> {
        let operation = format!("create {}", entity);
        let path = format!("Create/{}", urlencoding::encode(entity));
        let response = self.send(&operation, Method::POST, &path, Some(properties)).await?;
        match self.json(&operation, response).await? {
            Value::String(uri) => Ok(uri),
            other => Ok(other.to_string()),
        }
    }

    async fn read(&self, uri: &str) -> OrionResult<Row> {
        let operation = format!("read {}", uri);
        let response = self.send::<Value>(&operation, Method::GET, uri, None).await?;
        match self.json(&operation, response).await? {
            Value::Object(row) => Ok(row),
            other => Err(OrionError::Parse(format!("{}: expected object, got {}", operation, other))),
        }
    }

    async fn update(&self, uri: &str, properties: &Row) -> OrionResult<()> {
        let operation = format!("update {}", uri);
        self.send(&operation, Method::POST, uri, Some(properties)).await?;
        Ok(())
    }

    async fn delete(&self, uri: &str) -> OrionResult<()> {
        let operation = format!("delete {}", uri);
        self.send::<Value>(&operation, Method::DELETE, uri, None).await?;
        Ok(())
    }

    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> OrionResult<Value> {
        let operation = format!("invoke {}.{}", entity, verb);
        let path = format!(
            "Invoke/{}/{}",
            urlencoding::encode(entity),
            urlencoding::encode(verb)
        );
        let response = self.send(&operation, Method::POST, &path, Some(&args)).await?;
        self.json(&operation, response).await
    }
}
