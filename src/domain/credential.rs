// Copyright (c) 2025 - Cowboy AI, Inc.
//! Credential Sets
//!
//! SNMPv3 and Windows (WMI) credentials are stored once in `Orion.Credential`
//! and referenced from nodes through `Orion.NodeSettings`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::client::{Row, RowExt};
use crate::errors::OrionResult;

/// Credential type name Orion uses for SNMPv3 credentials
pub const SNMPV3_CREDENTIAL_TYPE: &str = "SolarWinds.Orion.Core.Models.Credentials.SnmpCredentialsV3";

/// Default owner of new credential sets
pub const DEFAULT_OWNER: &str = "Orion";

/// SNMPv3 authentication algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthMethod {
    Md5,
    #[default]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Md5 => "MD5",
            AuthMethod::Sha1 => "SHA1",
            AuthMethod::Sha224 => "SHA224",
            AuthMethod::Sha256 => "SHA256",
            AuthMethod::Sha384 => "SHA384",
            AuthMethod::Sha512 => "SHA512",
        }
    }
}

/// SNMPv3 privacy algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivMethod {
    Des,
    #[default]
    Des56,
    Aes128,
    Aes192,
    Aes256,
}

impl PrivMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivMethod::Des => "DES",
            PrivMethod::Des56 => "DES56",
            PrivMethod::Aes128 => "AES128",
            PrivMethod::Aes192 => "AES192",
            PrivMethod::Aes256 => "AES256",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

/// SNMPv3 credential material
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snmpv3Credentials {
    pub username: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub auth_method: AuthMethod,
    pub auth_key: String,
    /// `true` corresponds to the web UI checkbox being unchecked
    #[serde(default = "default_true")]
    pub auth_key_is_pwd: bool,
    #[serde(default)]
    pub priv_method: PrivMethod,
    pub priv_key: String,
    #[serde(default = "default_true")]
    pub priv_key_is_pwd: bool,
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl fmt::Debug for Snmpv3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snmpv3Credentials")
            .field("username", &self.username)
            .field("context", &self.context)
            .field("auth_method", &self.auth_method)
            .field("auth_key", &"<redacted>")
            .field("priv_method", &self.priv_method)
            .field("priv_key", &"<redacted>")
            .field("owner", &self.owner)
            .finish()
    }
}

impl Snmpv3Credentials {
    /// Positional arguments of `Orion.Credential.CreateSNMPv3Credentials`
    pub fn create_args(&self, name: &str) -> Vec<Value> {
        vec![
            name.into(),
            self.username.clone().into(),
            self.context.clone().into(),
            self.auth_method.as_str().into(),
            self.auth_key.clone().into(),
            self.auth_key_is_pwd.into(),
            self.priv_method.as_str().into(),
            self.priv_key.clone().into(),
            self.priv_key_is_pwd.into(),
            self.owner.clone().into(),
        ]
    }

    /// Credential object for `Orion.Discovery.ValidateCredentials`
    pub fn validation_details(&self) -> Value {
        json!({
            "Name": self.username,
            "Context": self.context,
            "AuthenticationMethod": self.auth_method.as_str(),
            "AuthenticationKey": self.auth_key,
            "AuthenticationKeyIsPassword": self.auth_key_is_pwd,
            "PrivacyMethod": self.priv_method.as_str(),
            "PrivacyKey": self.priv_key,
            "PrivacyKeyIsPassword": self.priv_key_is_pwd,
        })
    }
}

/// Windows username/password credential material
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WmiCredentials {
    pub username: String,
    pub password: String,
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl fmt::Debug for WmiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WmiCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("owner", &self.owner)
            .finish()
    }
}

impl WmiCredentials {
    /// Positional arguments of `Orion.Credential.CreateUsernamePasswordCredentials`
    pub fn create_args(&self, name: &str) -> Vec<Value> {
        vec![
            name.into(),
            self.username.clone().into(),
            self.password.clone().into(),
            self.owner.clone().into(),
        ]
    }
}

/// Kind of credential set, and the node setting that references it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Snmpv3,
    Wmi,
}

impl CredentialKind {
    /// `SettingName` in `Orion.NodeSettings`
    pub fn node_setting(&self) -> &'static str {
        match self {
            CredentialKind::Snmpv3 => "ROSNMPCredentialID",
            CredentialKind::Wmi => "WMICredential",
        }
    }
}

/// An `Orion.Credential` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CredentialType")]
    pub credential_type: String,
}

impl CredentialSet {
    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            id: row.int("ID")?,
            name: row.string("Name")?,
            credential_type: row.opt_string("CredentialType").unwrap_or_default(),
        })
    }
}

/// SNMPv3 credential currently bound to a node, joined with its set
#[derive(Clone, PartialEq, Eq)]
pub struct StoredSnmpv3Credential {
    pub credential_id: i64,
    pub name: String,
    pub username: String,
    pub context: String,
    pub auth_method: String,
    pub auth_key: String,
    pub auth_key_is_pwd: bool,
    pub priv_method: String,
    pub priv_key: String,
    pub priv_key_is_pwd: bool,
}

impl fmt::Debug for StoredSnmpv3Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSnmpv3Credential")
            .field("credential_id", &self.credential_id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("auth_method", &self.auth_method)
            .field("priv_method", &self.priv_method)
            .finish_non_exhaustive()
    }
}

impl StoredSnmpv3Credential {
    pub fn from_row(row: &Row) -> OrionResult<Self> {
        Ok(Self {
            credential_id: row.int("CredentialID")?,
            name: row.string("CredentialName")?,
            username: row.string("Username")?,
            context: row.opt_string("Context").unwrap_or_default(),
            auth_method: row.string("AuthenticationMethod")?,
            auth_key: row.opt_string("AuthenticationKey").unwrap_or_default(),
            auth_key_is_pwd: row.bool("AuthenticationKeyIsPassword")?,
            priv_method: row.string("PrivacyMethod")?,
            priv_key: row.opt_string("PrivacyKey").unwrap_or_default(),
            priv_key_is_pwd: row.bool("PrivacyKeyIsPassword")?,
        })
    }

    /// Credential object for `Orion.Discovery.ValidateCredentials`
    pub fn validation_details(&self) -> Value {
        json!({
            "Name": self.username,
            "Context": self.context,
            "AuthenticationMethod": self.auth_method,
            "AuthenticationKey": self.auth_key,
            "AuthenticationKeyIsPassword": self.auth_key_is_pwd,
            "PrivacyMethod": self.priv_method,
            "PrivacyKey": self.priv_key,
            "PrivacyKeyIsPassword": self.priv_key_is_pwd,
        })
    }

    /// Positional arguments of `Orion.Credential.UpdateSNMPv3Credentials`.
    ///
    /// The verb replaces the whole credential, so every field is sent.
    pub fn update_args(&self) -> Vec<Value> {
        vec![
            self.credential_id.into(),
            self.name.clone().into(),
            self.username.clone().into(),
            self.context.clone().into(),
            self.auth_method.clone().into(),
            self.auth_key.clone().into(),
            self.auth_key_is_pwd.into(),
            self.priv_method.clone().into(),
            self.priv_key.clone().into(),
            self.priv_key_is_pwd.into(),
        ]
    }
}
