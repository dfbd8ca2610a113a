// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory cache
//!
//! Cached data is the host -> unprefixed variables mapping built from one
//! query, so a cache hit rebuilds the inventory without contacting Orion.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::client::Row;
use crate::errors::{OrionError, OrionResult};

/// Host name -> host variables, before the variable prefix is applied
pub type CachedHosts = BTreeMap<String, Row>;

/// Prefix of every inventory cache key
pub const CACHE_KEY_PREFIX: &str = "orion_nodes_inventory";

/// Cache key for an inventory source file
pub fn cache_key(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}_{}", CACHE_KEY_PREFIX, &digest[..16])
}

/// Key/value store for inventory results
#[async_trait]
pub trait InventoryCache: Send + Sync {
    /// Cached hosts for `key`; `None` on a miss or an expired entry
    async fn get(&self, key: &str) -> OrionResult<Option<CachedHosts>>;

    /// Store hosts under `key`
    async fn set(&self, key: &str, hosts: &CachedHosts) -> OrionResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    hosts: CachedHosts,
}

/// One JSON file per key in a directory
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
    timeout: Option<Duration>,
}

impl JsonFileCache {
    /// A timeout of zero seconds keeps entries forever, as does one too
    /// large to represent
    pub fn new(dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        let timeout = if timeout_secs == 0 {
            None
        } else {
            let timeout = i64::try_from(timeout_secs).ok().and_then(Duration::try_seconds);
            if timeout.is_none() {
                warn!("Cache timeout of {}s is out of range, keeping entries forever", timeout_secs);
            }
            timeout
        };
        Self { dir: dir.into(), timeout }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn is_expired(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.timeout.is_some_and(|timeout| now - stored_at > timeout)
    }
}

#[async_trait]
impl InventoryCache for JsonFileCache {
    async fn get(&self, key: &str) -> OrionResult<Option<CachedHosts>> {
        let path = self.path_for(key);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache entry at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // An unreadable entry is treated as a miss and rewritten
        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Discarding unreadable cache entry {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        if self.is_expired(entry.stored_at, Utc::now()) {
            debug!("Cache entry {} expired", key);
            return Ok(None);
        }
        Ok(Some(entry.hosts))
    }

    async fn set(&self, key: &str, hosts: &CachedHosts) -> OrionResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let entry = CacheEntry {
            stored_at: Utc::now(),
            hosts: hosts.clone(),
        };
        let raw = serde_json::to_vec_pretty(&entry)
            .map_err(|e| OrionError::Cache(format!("failed to encode cache entry: {}", e)))?;
        tokio::fs::write(self.path_for(key), raw).await?;
        debug!("Stored {} hosts under {}", hosts.len(), key);
        Ok(())
    }
}
