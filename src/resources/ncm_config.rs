// Copyright (c) 2025 - Cowboy AI, Inc.
//! NCM configuration import, upload and download
//!
//! Every invocation of this module performs its operation, so outside
//! check mode it always reports a change. In check mode the predicted
//! operation is returned instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Swis;
use crate::domain::ncm::normalize_ncm_node_id;
use crate::domain::{ArchivedConfig, ConfigMethod, NodeRef};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

const CONFIG_ARCHIVE: &str = "Cirrus.ConfigArchive";

/// Title given to imported configurations
pub const IMPORT_TITLE: &str = "manual-import";

/// Number of archive entries returned after import or download
pub const HISTORY_LIMIT: usize = 5;

fn default_config_type() -> String {
    "Manual".to_string()
}

fn default_comments() -> String {
    "Imported via orion-infrastructure".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcmConfigParams {
    #[serde(flatten)]
    pub node: NodeRef,
    #[serde(default)]
    pub method: ConfigMethod,
    #[serde(default)]
    pub config_content: Option<String>,
    #[serde(default = "default_config_type")]
    pub config_type: String,
    #[serde(default = "default_comments")]
    pub comments: String,
}

impl NcmConfigParams {
    pub fn validate(&self) -> OrionResult<()> {
        let has_content = self.config_content.as_deref().map_or(false, |c| !c.is_empty());
        if self.method.requires_content() && !has_content {
            return Err(OrionError::InvalidParameters(format!(
                "config_content is required when method is '{}'",
                serde_json::to_value(self.method)?.as_str().unwrap_or_default()
            )));
        }
        Ok(())
    }

    fn content(&self) -> &str {
        self.config_content.as_deref().unwrap_or_default()
    }

    fn args(&self, ncm_node_id: &str) -> Vec<Value> {
        match self.method {
            ConfigMethod::Import => vec![
                ncm_node_id.into(),
                self.config_type.clone().into(),
                self.content().into(),
                IMPORT_TITLE.into(),
                self.comments.clone().into(),
            ],
            ConfigMethod::Upload => vec![
                Value::Array(vec![ncm_node_id.into()]),
                self.config_type.clone().into(),
                self.content().into(),
                true.into(),
            ],
            ConfigMethod::Download => vec![Value::Array(vec![ncm_node_id.into()]), self.config_type.clone().into()],
        }
    }
}

/// What was done (or would be done) with the configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NcmConfigResult {
    /// `Cirrus.ConfigArchive` verb
    pub method: &'static str,
    pub ncm_node_id: String,
    pub config_type: String,
    pub config_length: usize,
    pub operation: String,
    pub result: Option<Value>,
    pub history: Vec<ArchivedConfig>,
}

fn operation_text(method: ConfigMethod, mode: CheckMode, caption: &str) -> String {
    let tense = if mode.is_dry_run() { "would be " } else { "" };
    match method {
        ConfigMethod::Download => format!("Configuration {}downloaded from device {}", tense, caption),
        ConfigMethod::Import | ConfigMethod::Upload => format!("Configuration {}processed for device {}", tense, caption),
    }
}

pub async fn run(swis: &dyn Swis, params: &NcmConfigParams, mode: CheckMode) -> OrionResult<ModuleOutcome<NcmConfigResult>> {
    params.validate()?;
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let ncm_node_id = lookups::ncm_node_id(swis, &node).await?.ok_or_else(|| {
        OrionError::Precondition(
            "Node is not managed by NCM. Please add the node to NCM first using the node_ncm module.".to_string(),
        )
    })?;
    let ncm_node_id = normalize_ncm_node_id(&ncm_node_id)?;

    let operation = operation_text(params.method, mode, &node.caption);

    let verb = params.method.verb();
    let mut reconciler = Reconciler::new(mode);
    let result = reconciler
        .converge(true, &format!("{} for {}", verb, node.caption), || {
            swis.invoke(CONFIG_ARCHIVE, verb, params.args(&ncm_node_id))
        })
        .await?;

    let history = match (params.method, &result) {
        (ConfigMethod::Import | ConfigMethod::Download, Some(_)) => {
            lookups::config_history(swis, &ncm_node_id, HISTORY_LIMIT).await?
        }
        _ => Vec::new(),
    };

    let outcome = NcmConfigResult {
        method: verb,
        ncm_node_id,
        config_type: params.config_type.clone(),
        config_length: params.content().len(),
        operation,
        result,
        history,
    };
    Ok(reconciler.finish(Some(node), outcome))
}
