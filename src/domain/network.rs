// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

use crate::errors::OrionError;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

impl From<NetworkError> for OrionError {
    fn from(err: NetworkError) -> Self {
        OrionError::InvalidParameters(err.to_string())
    }
}

/// Parse a dotted (IPv4) or colon (IPv6) node address
///
/// # Examples
///
/// ```rust
/// use orion_infrastructure::domain::parse_address;
///
/// assert!(parse_address("10.0.0.1").is_ok());
/// assert!(parse_address("fe80::1").is_ok());
/// assert!(parse_address("10.0.0.256").is_err());
/// ```
pub fn parse_address(raw: &str) -> Result<IpAddr, NetworkError> {
    IpAddr::from_str(raw.trim()).map_err(|_| NetworkError::InvalidIpAddress(raw.to_string()))
}

/// Parse a UDP/TCP port given as text (SNMP ports arrive as strings)
pub fn parse_port(raw: &str) -> Result<u16, NetworkError> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(NetworkError::InvalidPort(raw.to_string())),
        Ok(port) => Ok(port),
    }
}
