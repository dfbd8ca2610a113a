// Copyright (c) 2025 - Cowboy AI, Inc.

//! SWIS connection configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::errors::{OrionError, OrionResult};

/// Port of the SWIS REST API on Orion 2024.1 and later
pub const DEFAULT_PORT: u16 = 17774;

/// Port of the legacy SWIS REST API
pub const LEGACY_PORT: u16 = 17778;

/// Environment variable holding the Orion server host name
pub const ENV_SERVER: &str = "SOLARWINDS_SERVER";
/// Environment variable holding the Orion user name
pub const ENV_USERNAME: &str = "SOLARWINDS_USERNAME";
/// Environment variable holding the Orion password
pub const ENV_PASSWORD: &str = "SOLARWINDS_PASSWORD";
/// Environment variable overriding the SWIS port
pub const ENV_PORT: &str = "SOLARWINDS_PORT";
/// Environment variable toggling certificate verification
pub const ENV_VERIFY: &str = "SOLARWINDS_VERIFY";

/// Connection parameters for the SolarWinds Information Service
#[derive(Clone, Serialize, Deserialize)]
pub struct SwisConfig {
    /// Name of the Orion host running the SWIS service
    #[serde(default)]
    pub hostname: String,

    /// Orion user; Active Directory users use `DOMAIN\username`
    #[serde(default)]
    pub username: String,

    /// Password for the Orion user
    #[serde(default)]
    pub password: String,

    /// SWIS REST port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Verify the server's TLS certificate
    #[serde(default)]
    pub verify: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    30
}

impl SwisConfig {
    /// Create a configuration with default port, verification and timeout
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            port: DEFAULT_PORT,
            verify: false,
            timeout_secs: default_timeout(),
        }
    }

    /// Set the SWIS port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable certificate verification
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Load configuration from the `SOLARWINDS_*` environment variables
    pub fn from_env() -> OrionResult<Self> {
        Self::default().with_env_fallback().validated()
    }

    /// Fill blank fields from the `SOLARWINDS_*` environment variables
    pub fn with_env_fallback(mut self) -> Self {
        if self.hostname.is_empty() {
            self.hostname = std::env::var(ENV_SERVER).unwrap_or_default();
        }
        if self.username.is_empty() {
            self.username = std::env::var(ENV_USERNAME).unwrap_or_default();
        }
        if self.password.is_empty() {
            self.password = std::env::var(ENV_PASSWORD).unwrap_or_default();
        }
        if let Some(port) = std::env::var(ENV_PORT).ok().and_then(|p| p.parse().ok()) {
            if self.port == DEFAULT_PORT {
                self.port = port;
            }
        }
        if let Ok(verify) = std::env::var(ENV_VERIFY) {
            self.verify = self.verify || matches!(verify.as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Check that host, user and password are all present
    pub fn validated(self) -> OrionResult<Self> {
        let missing: Vec<&str> = [
            ("hostname", self.hostname.is_empty()),
            ("username", self.username.is_empty()),
            ("password", self.password.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if missing.is_empty() {
            Ok(self)
        } else {
            Err(OrionError::Configuration(format!(
                "missing connection parameters: {}",
                missing.join(", ")
            )))
        }
    }

    /// User name as sent to SWIS.
    ///
    /// A doubled backslash (`DOMAIN\\user`, as produced by escaped YAML) is
    /// collapsed into the single separator Orion expects.
    pub fn effective_username(&self) -> String {
        self.username.replacen("\\\\", "\\", 1)
    }

    /// Base URL of the JSON endpoint
    pub fn base_url(&self) -> String {
        format!(
            "https://{}:{}/SolarWinds/InformationService/v3/Json/",
            self.hostname, self.port
        )
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SwisConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl fmt::Debug for SwisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwisConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("verify", &self.verify)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
