// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Configuration Manager (NCM) types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::client::{Row, RowExt};
use crate::errors::{OrionError, OrionResult};

/// Profile name meaning "no connection profile"
pub const NO_PROFILE: &str = "-1";

/// Connection profile id meaning "no connection profile"
pub const NO_PROFILE_ID: i64 = -1;

/// An NCM connection profile as returned by `GetAllConnectionProfiles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Connection profiles indexed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileIndex(BTreeMap<String, i64>);

impl ProfileIndex {
    pub fn from_value(value: &Value) -> OrionResult<Self> {
        let list = value.as_array().ok_or_else(|| {
            OrionError::Parse(format!("connection profile list is not an array: {}", value))
        })?;

        let mut index = BTreeMap::new();
        for entry in list {
            let row = entry
                .as_object()
                .ok_or_else(|| OrionError::Parse(format!("connection profile is not an object: {}", entry)))?;
            index.insert(row.string("Name")?, row.int("ID")?);
        }
        Ok(Self(index))
    }

    /// Profile id for a requested name; `-1` always resolves to "no profile"
    pub fn resolve(&self, name: &str) -> OrionResult<i64> {
        if name == NO_PROFILE {
            return Ok(NO_PROFILE_ID);
        }
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| OrionError::InvalidParameters(format!("Did not recognize profile name: {}", name)))
    }
}

/// Normalize an NCM node id into canonical GUID form
pub fn normalize_ncm_node_id(raw: &str) -> OrionResult<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| OrionError::Parse(format!("Invalid NCM NodeID format: {}", raw)))
}

/// What to do with a device configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMethod {
    /// Store supplied content in the NCM archive
    #[default]
    Import,
    /// Push supplied content to the device
    Upload,
    /// Pull the device's current configuration into the archive
    Download,
}

impl ConfigMethod {
    /// `Cirrus.ConfigArchive` verb
    pub fn verb(&self) -> &'static str {
        match self {
            ConfigMethod::Import => "ImportConfig",
            ConfigMethod::Upload => "UploadConfig",
            ConfigMethod::Download => "DownloadConfig",
        }
    }

    pub fn requires_content(&self) -> bool {
        matches!(self, ConfigMethod::Import | ConfigMethod::Upload)
    }
}

/// One entry of `Cirrus.ConfigArchive`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedConfig {
    #[serde(rename = "ConfigID")]
    pub config_id: String,
    #[serde(rename = "ConfigTitle")]
    pub title: String,
    #[serde(rename = "ConfigType")]
    pub config_type: String,
    #[serde(rename = "DownloadTime")]
    pub download_time: String,
}

impl ArchivedConfig {
    pub const FIELDS: &'static str = "ConfigID, ConfigTitle, ConfigType, DownloadTime";

    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            config_id: row.string("ConfigID")?,
            title: row.opt_string("ConfigTitle").unwrap_or_default(),
            config_type: row.opt_string("ConfigType").unwrap_or_default(),
            download_time: row.opt_string("DownloadTime").unwrap_or_default(),
        })
    }
}
