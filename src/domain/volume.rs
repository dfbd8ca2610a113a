// Copyright (c) 2025 - Cowboy AI, Inc.
//! Volumes

use serde::{Deserialize, Serialize};

use crate::client::{properties, Row, RowExt};
use crate::errors::OrionResult;

/// Volume type as known to Orion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeType {
    Other,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "Virtual Memory")]
    VirtualMemory,
    #[default]
    #[serde(rename = "Fixed Disk")]
    FixedDisk,
}

impl VolumeType {
    /// `VolumeTypeID` column value
    pub fn type_id(&self) -> i64 {
        match self {
            VolumeType::Other => 1,
            VolumeType::Ram => 2,
            VolumeType::VirtualMemory => 3,
            VolumeType::FixedDisk => 4,
        }
    }

    /// `VolumeType` column value
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Other => "Other",
            VolumeType::Ram => "RAM",
            VolumeType::VirtualMemory => "Virtual Memory",
            VolumeType::FixedDisk => "Fixed Disk",
        }
    }
}

/// Desired volume on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    /// Volume caption, e.g. `/var` or `C:\ Label:OS 1a2b3c4d`
    #[serde(alias = "caption")]
    pub name: String,

    #[serde(default, alias = "volumeType")]
    pub volume_type: VolumeType,

    #[serde(default = "default_icon", alias = "volumeIcon")]
    pub volume_icon: String,

    /// Defaults to the caption
    #[serde(default, alias = "volumeDescription")]
    pub volume_description: Option<String>,

    #[serde(default = "default_poll_interval", alias = "pollInterval")]
    pub poll_interval: i64,

    #[serde(default = "default_stat_collection", alias = "statCollection")]
    pub stat_collection: i64,

    #[serde(default = "default_rediscovery_interval", alias = "rediscoveryInterval")]
    pub rediscovery_interval: i64,
}

fn default_icon() -> String {
    "FixedDisk.gif".to_string()
}

fn default_poll_interval() -> i64 {
    420
}

fn default_stat_collection() -> i64 {
    15
}

fn default_rediscovery_interval() -> i64 {
    60
}

impl VolumeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume_type: VolumeType::default(),
            volume_icon: default_icon(),
            volume_description: None,
            poll_interval: default_poll_interval(),
            stat_collection: default_stat_collection(),
            rediscovery_interval: default_rediscovery_interval(),
        }
    }

    /// Property set for `Create Orion.Volumes` at the given index
    pub fn properties(&self, node_id: i64, index: i64) -> Row {
        let description = self
            .volume_description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.name.clone());

        properties([
            ("NodeID", serde_json::Value::from(node_id)),
            ("VolumeType", self.volume_type.as_str().into()),
            ("VolumeTypeID", self.volume_type.type_id().into()),
            ("Icon", self.volume_icon.clone().into()),
            ("VolumeIndex", index.into()),
            ("Caption", self.name.clone().into()),
            ("VolumeDescription", description.into()),
            ("PollInterval", self.poll_interval.into()),
            ("StatCollection", self.stat_collection.into()),
            ("RediscoveryInterval", self.rediscovery_interval.into()),
            ("VolumeResponding", "Y".into()),
        ])
    }
}

/// An `Orion.Volumes` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(rename = "volumeid")]
    pub volume_id: i64,
    #[serde(rename = "displayname")]
    pub display_name: String,
    #[serde(rename = "volumeindex")]
    pub volume_index: i64,
    pub status: i64,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub caption: String,
    #[serde(rename = "pollinterval")]
    pub poll_interval: i64,
    #[serde(rename = "statcollection")]
    pub stat_collection: i64,
    #[serde(rename = "rediscoveryinterval")]
    pub rediscovery_interval: i64,
    #[serde(rename = "volumedescription")]
    pub volume_description: String,
    pub icon: String,
    pub uri: String,
}

impl Volume {
    pub const FIELDS: &'static str = "VolumeID, DisplayName, VolumeIndex, Status, Type, Caption, \
        PollInterval, StatCollection, RediscoveryInterval, VolumeDescription, Icon, Uri";

    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            volume_id: row.int("VolumeID")?,
            display_name: row.opt_string("DisplayName").unwrap_or_default(),
            volume_index: row.opt_int("VolumeIndex").unwrap_or_default(),
            status: row.opt_int("Status").unwrap_or_default(),
            volume_type: row.opt_string("Type").unwrap_or_default(),
            caption: row.string("Caption")?,
            poll_interval: row.opt_int("PollInterval").unwrap_or_default(),
            stat_collection: row.opt_int("StatCollection").unwrap_or_default(),
            rediscovery_interval: row.opt_int("RediscoveryInterval").unwrap_or_default(),
            volume_description: row.opt_string("VolumeDescription").unwrap_or_default(),
            icon: row.opt_string("Icon").unwrap_or_default(),
            uri: row.string("Uri")?,
        })
    }
}
