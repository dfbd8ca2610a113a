// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dynamic Inventory
//!
//! Builds a host inventory from `Orion.Nodes`. One query selects the host
//! name column, the configured node fields and (through a left join on
//! `Orion.NodesCustomProperties`) the configured custom properties. Each row
//! becomes one host whose variables are the selected columns, named
//! `<hostvar_prefix><column>`.
//!
//! ```yaml
//! plugin: solarwinds.orion.orion_nodes_inventory
//! cache: true
//! orion_hostname: orion.example.com
//! orion_username: automation
//! orion_password: changeme
//! filter: "WHERE ObjectSubType = 'SNMP' AND DNS != ''"
//! hostname_field: DNS
//! hostvar_fields: [IP_Address, Caption]
//! hostvar_custom_properties: [Server_Environment]
//! ```
//!
//! # Errors
//!
//! A row missing any configured column fails the whole population. A single
//! variable whose name is not a valid identifier is skipped with a warning.

pub mod cache;

pub use cache::{cache_key, CachedHosts, InventoryCache, JsonFileCache};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::client::{value_to_string, Row, RowExt, Swis, SwisConfig};
use crate::domain::{parse_port, Secret};
use crate::errors::{OrionError, OrionResult};
use crate::swql::{identifier, Query};

/// File name suffixes accepted as inventory sources
pub const SOURCE_SUFFIXES: [&str; 4] = ["orion.yaml", "orion.yml", "solarwinds.yaml", "solarwinds.yml"];

/// Whether `path` looks like an inventory source for this plugin
pub fn verify_file(path: &Path) -> bool {
    let name = path.to_string_lossy();
    let valid = SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix));
    if !valid {
        debug!("Inventory source doesn't match 'solarwinds' or 'orion', skipping...");
    }
    valid
}

/// Column used as the inventory host name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostnameField {
    #[serde(rename = "IP_Address")]
    IpAddress,
    #[serde(rename = "DNS")]
    Dns,
    Caption,
}

impl HostnameField {
    pub fn column(&self) -> &'static str {
        match self {
            HostnameField::IpAddress => "IP_Address",
            HostnameField::Dns => "DNS",
            HostnameField::Caption => "Caption",
        }
    }
}

fn default_port() -> u16 {
    crate::client::config::DEFAULT_PORT
}

fn default_prefix() -> String {
    "orion_".to_string()
}

fn default_cache_timeout() -> u64 {
    3600
}

/// Ports arrive as YAML strings (`'17774'`) or integers
fn port_from_text_or_int<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Int(u16),
        Text(String),
    }

    match RawPort::deserialize(deserializer)? {
        RawPort::Int(port) => Ok(port),
        RawPort::Text(text) => parse_port(&text).map_err(serde::de::Error::custom),
    }
}

/// Inventory source file
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Plugin name; informational
    #[serde(default)]
    pub plugin: Option<String>,
    pub orion_hostname: String,
    pub orion_username: String,
    pub orion_password: Secret,
    #[serde(default = "default_port", deserialize_with = "port_from_text_or_int")]
    pub orion_port: u16,
    #[serde(default)]
    pub verify: bool,
    /// SWQL appended verbatim after the `FROM`/`JOIN` clauses
    #[serde(default)]
    pub filter: Option<String>,
    pub hostname_field: HostnameField,
    #[serde(default = "default_prefix")]
    pub hostvar_prefix: String,
    #[serde(default)]
    pub hostvar_fields: Vec<String>,
    #[serde(default)]
    pub hostvar_custom_properties: Vec<String>,
    #[serde(default)]
    pub cache: bool,
    /// Directory for the JSON file cache
    #[serde(default)]
    pub cache_connection: Option<PathBuf>,
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout: u64,
}

impl InventoryConfig {
    pub fn from_yaml(raw: &str) -> OrionResult<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| OrionError::Configuration(format!("Failed to consume options: {}", e)))
    }

    pub fn load(path: &Path) -> OrionResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrionError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    /// SWIS connection settings for this source
    pub fn swis_config(&self) -> SwisConfig {
        SwisConfig::new(
            self.orion_hostname.clone(),
            self.orion_username.clone(),
            self.orion_password.expose(),
        )
        .with_port(self.orion_port)
        .with_verify(self.verify)
    }

    /// File cache under `cache_connection`, or the system temp directory
    pub fn file_cache(&self) -> Option<JsonFileCache> {
        if !self.cache {
            return None;
        }
        let dir = self
            .cache_connection
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("orion-inventory"));
        Some(JsonFileCache::new(dir, self.cache_timeout))
    }

    /// The node query for this source
    pub fn query(&self) -> OrionResult<Query> {
        let mut select = format!("SELECT NodeID, node.{}", self.hostname_field.column());
        for field in &self.hostvar_fields {
            select.push_str(&format!(", node.{}", identifier(field)?));
        }
        for property in &self.hostvar_custom_properties {
            let property = identifier(property)?;
            select.push_str(&format!(", custom.{0} AS {0}", property));
        }

        let mut text = format!("{} FROM Orion.Nodes AS node", select);
        if !self.hostvar_custom_properties.is_empty() {
            text.push_str(" LEFT JOIN Orion.NodesCustomProperties AS custom ON node.NodeID = custom.NodeID");
        }
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            text.push(' ');
            text.push_str(filter);
        }
        Ok(Query::new(text))
    }

    /// Columns copied from each row into host variables
    fn hostvar_columns(&self) -> impl Iterator<Item = &String> {
        self.hostvar_fields.iter().chain(self.hostvar_custom_properties.iter())
    }

    /// Map query rows to hosts. Any missing column fails the population;
    /// rows with an empty host name are skipped.
    pub fn hosts_from_rows(&self, rows: &[Row]) -> OrionResult<CachedHosts> {
        let mut hosts = CachedHosts::new();
        for row in rows {
            let hostname = row
                .field(self.hostname_field.column())
                .map(value_to_string)
                .map_err(iteration_error)?;
            if hostname.trim().is_empty() {
                warn!(
                    "Node {} has no {}, skipping",
                    row.opt_field("NodeID").map(value_to_string).unwrap_or_default(),
                    self.hostname_field.column()
                );
                continue;
            }
            let mut vars = Row::new();
            for column in self.hostvar_columns() {
                let value = row.field(column).map_err(iteration_error)?;
                vars.insert(column.clone(), value.clone());
            }
            hosts.insert(hostname, vars);
        }
        Ok(hosts)
    }
}

fn iteration_error(err: OrionError) -> OrionError {
    OrionError::Parse(format!("Error iterating over query results: {}", err))
}

/// Hosts and their variables, in the inventory JSON shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    hosts: BTreeMap<String, Row>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a host, prefixing every variable name.
    ///
    /// A variable whose prefixed name is not a valid identifier is skipped.
    pub fn add_host(&mut self, hostname: &str, vars: &Row, prefix: &str) {
        let host = self.hosts.entry(hostname.to_string()).or_default();
        for (name, value) in vars {
            let var_name = format!("{}{}", prefix, name);
            if identifier(&var_name).is_err() {
                warn!(
                    "Could not set hostvar {} to {} for the {} host, skipping: invalid variable name",
                    var_name,
                    value_to_string(value),
                    hostname
                );
                continue;
            }
            host.insert(var_name, value.clone());
        }
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    pub fn host_vars(&self, hostname: &str) -> Option<&Row> {
        self.hosts.get(hostname)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "_meta": { "hostvars": self.hosts },
            "all": { "hosts": self.hosts.keys().collect::<Vec<_>>() },
        })
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// An inventory source file with its optional cache
pub struct InventorySource {
    config: InventoryConfig,
    cache_key: String,
    cache: Option<Box<dyn InventoryCache>>,
}

impl InventorySource {
    pub fn new(path: &Path, config: InventoryConfig) -> Self {
        let cache = config
            .file_cache()
            .map(|cache| Box::new(cache) as Box<dyn InventoryCache>);
        Self {
            config,
            cache_key: cache_key(path),
            cache,
        }
    }

    /// Replace the cache backend
    pub fn with_cache(mut self, cache: Box<dyn InventoryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Build the inventory.
    ///
    /// With `use_cache` and a cache hit, Orion is not contacted. Otherwise the
    /// nodes are queried and, when a cache is configured, stored for next time.
    pub async fn parse(&self, swis: &dyn Swis, use_cache: bool) -> OrionResult<Inventory> {
        if use_cache {
            if let Some(cache) = &self.cache {
                if let Some(hosts) = cache.get(&self.cache_key).await? {
                    info!("Populating {} hosts from cache", hosts.len());
                    return Ok(self.inventory(&hosts));
                }
                debug!("Cache needs updating");
            }
        }

        let hosts = self.fetch(swis).await?;
        if let Some(cache) = &self.cache {
            cache.set(&self.cache_key, &hosts).await?;
        }
        Ok(self.inventory(&hosts))
    }

    async fn fetch(&self, swis: &dyn Swis) -> OrionResult<CachedHosts> {
        swis.probe().await.map_err(|e| match e {
            OrionError::Connection(message) => {
                OrionError::Connection(format!("Failed to connect to Orion database: {}", message))
            }
            other => other,
        })?;

        let query = self.config.query()?;
        debug!("Using query \"{}\"", query);
        let rows = swis.query(&query).await?;
        info!("Building inventory from {} nodes", rows.len());
        self.config.hosts_from_rows(&rows)
    }

    fn inventory(&self, hosts: &CachedHosts) -> Inventory {
        let mut inventory = Inventory::new();
        for (hostname, vars) in hosts {
            inventory.add_host(hostname, vars, &self.config.hostvar_prefix);
        }
        inventory
    }
}
