// Copyright (c) 2025 - Cowboy AI, Inc.
//! SNMPv3 credential validation against a target device
//!
//! Credentials come either from a stored credential set (by name) or from
//! parameters. Validation never changes anything; in check mode the call is
//! not made and only the prediction is returned. Keys are never echoed back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::client::{value_to_string, Swis};
use crate::domain::credential::SNMPV3_CREDENTIAL_TYPE;
use crate::domain::network::parse_address;
use crate::domain::{AuthMethod, PrivMethod, Secret};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::lookups;

use super::default_true;

/// Version Orion tries first during validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PreferredSnmp {
    Snmp1,
    Snmp2,
    #[default]
    Snmp3,
}

fn default_snmp_port() -> u16 {
    161
}

fn default_engine_id() -> i64 {
    lookups::PRIMARY_ENGINE_ID
}

fn default_priv_method() -> PrivMethod {
    PrivMethod::Aes128
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateSnmpv3Params {
    pub target_ip: String,
    #[serde(default = "default_snmp_port")]
    pub snmp_port: u16,
    /// Stored SNMPv3 credential set; excludes the inline fields below
    #[serde(default)]
    pub credential_name: Option<String>,
    #[serde(default)]
    pub snmpv3_username: Option<String>,
    #[serde(default)]
    pub snmpv3_context: String,
    #[serde(default)]
    pub snmpv3_auth_method: AuthMethod,
    #[serde(default)]
    pub snmpv3_auth_key: Option<Secret>,
    #[serde(default = "default_true")]
    pub auth_key_is_password: bool,
    #[serde(default = "default_priv_method")]
    pub snmpv3_priv_method: PrivMethod,
    #[serde(default)]
    pub snmpv3_priv_key: Option<Secret>,
    #[serde(default = "default_true")]
    pub priv_key_is_password: bool,
    #[serde(default = "default_engine_id")]
    pub engine_id: i64,
    #[serde(default)]
    pub preferred_snmp: PreferredSnmp,
}

impl ValidateSnmpv3Params {
    pub fn validate(&self) -> OrionResult<()> {
        parse_address(&self.target_ip)?;
        match (&self.credential_name, &self.snmpv3_username) {
            (Some(_), Some(_)) => Err(OrionError::InvalidParameters(
                "parameters are mutually exclusive: credential_name|snmpv3_username".to_string(),
            )),
            (None, None) => Err(OrionError::InvalidParameters(
                "one of the following is required: credential_name, snmpv3_username".to_string(),
            )),
            (None, Some(_)) if self.snmpv3_auth_key.is_none() => Err(OrionError::InvalidParameters(
                "snmpv3_auth_key is required when credential_name is not set".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn inline_details(&self) -> Value {
        serde_json::json!({
            "Name": self.snmpv3_username.clone().unwrap_or_default(),
            "Context": self.snmpv3_context,
            "AuthenticationMethod": self.snmpv3_auth_method.as_str(),
            "AuthenticationKey": self.snmpv3_auth_key.as_ref().map(Secret::expose).unwrap_or_default(),
            "AuthenticationKeyIsPassword": self.auth_key_is_password,
            "PrivacyMethod": self.snmpv3_priv_method.as_str(),
            "PrivacyKey": self.snmpv3_priv_key.as_ref().map(Secret::expose).unwrap_or_default(),
            "PrivacyKeyIsPassword": self.priv_key_is_password,
        })
    }
}

/// Validation outcome with secrets removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub validation_result: Option<Value>,
    pub message: String,
    pub username: String,
    pub context: String,
    pub auth_method: String,
    pub priv_method: String,
    pub target_ip: String,
    pub snmp_port: u16,
}

/// Invoke `Orion.Discovery.ValidateCredentials` for SNMPv3 details
pub async fn validate_credentials(
    swis: &dyn Swis,
    target_ip: &str,
    port: u16,
    details: Value,
    engine_id: i64,
    preferred: Option<PreferredSnmp>,
) -> OrionResult<Value> {
    let mut args = vec![
        target_ip.into(),
        port.into(),
        SNMPV3_CREDENTIAL_TYPE.into(),
        details,
        engine_id.into(),
    ];
    if let Some(preferred) = preferred {
        args.push(serde_json::to_value(preferred)?);
    }

    swis.invoke("Orion.Discovery", "ValidateCredentials", args)
        .await
        .map_err(|e| e.during("validate credentials"))
}

/// Whether a `ValidateCredentials` result means success
pub fn is_valid(result: &Value) -> bool {
    match result {
        Value::Bool(ok) => *ok,
        Value::Null => false,
        Value::Number(n) => n.as_i64().map_or(false, |n| n != 0),
        Value::String(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        _ => true,
    }
}

pub async fn run(swis: &dyn Swis, params: &ValidateSnmpv3Params, mode: CheckMode) -> OrionResult<ModuleOutcome<ValidationReport>> {
    params.validate()?;

    let details = match &params.credential_name {
        Some(name) => lookups::snmpv3_credential_by_name(swis, name)
            .await?
            .ok_or_else(|| OrionError::Precondition(format!("Credential '{}' not found in SolarWinds Orion", name)))?
            .validation_details(),
        None => params.inline_details(),
    };

    let field = |name: &str| details.get(name).map(value_to_string).unwrap_or_default();
    let mut report = ValidationReport {
        validation_result: None,
        message: format!("Check mode: would validate SNMPv3 credentials for {}", params.target_ip),
        username: field("Name"),
        context: field("Context"),
        auth_method: field("AuthenticationMethod"),
        priv_method: field("PrivacyMethod"),
        target_ip: params.target_ip.clone(),
        snmp_port: params.snmp_port,
    };

    if !mode.is_dry_run() {
        let result = validate_credentials(
            swis,
            &params.target_ip,
            params.snmp_port,
            details,
            params.engine_id,
            Some(params.preferred_snmp),
        )
        .await?;

        report.message = if is_valid(&result) {
            format!("SNMPv3 credentials validated successfully for {}", params.target_ip)
        } else {
            format!("SNMPv3 credentials validation failed for {}", params.target_ip)
        };
        info!("{}", report.message);
        report.validation_result = Some(result);
    }

    Ok(Reconciler::new(mode).finish(None, report))
}
