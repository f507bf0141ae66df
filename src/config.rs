//! Intake configuration helpers.
//!
//! This module loads, validates, and applies the operator-owned config file.
//! Command-line flags override whatever the file says.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::intake::{Intake, DEFAULT_CASE_ID};
use crate::narrative::{load_narratives, LayeredNarratives, SampleNarratives};
use crate::store::normalize_case_id;
use crate::transitions::TransitionPolicy;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

fn default_case_id() -> String {
    DEFAULT_CASE_ID.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    pub schema_version: u32,
    #[serde(default = "default_case_id")]
    pub default_case_id: String,
    /// Reject out-of-order operations instead of just recording the state.
    #[serde(default)]
    pub strict_transitions: bool,
    /// JSON narratives consulted before the built-in samples. Relative paths
    /// resolve against the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narratives_path: Option<PathBuf>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        default_config()
    }
}

pub fn default_config() -> IntakeConfig {
    IntakeConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        default_case_id: default_case_id(),
        strict_transitions: false,
        narratives_path: None,
    }
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Load a config file and resolve its relative paths.
pub fn load_config(path: &Path) -> Result<IntakeConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: IntakeConfig =
        serde_json::from_slice(&bytes).context("parse intake config JSON")?;
    validate_config(&config)?;
    if let Some(narratives) = config.narratives_path.take() {
        let resolved = if narratives.is_absolute() {
            narratives
        } else {
            path.parent()
                .map(|dir| dir.join(&narratives))
                .unwrap_or(narratives)
        };
        config.narratives_path = Some(resolved);
    }
    Ok(config)
}

pub fn validate_config(config: &IntakeConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported intake config schema_version {}",
            config.schema_version
        ));
    }
    if normalize_case_id(&config.default_case_id).is_empty() {
        return Err(anyhow!("default_case_id must be non-empty"));
    }
    Ok(())
}

/// Build an intake wired to the configured narrative sources and policy.
pub fn build_intake(config: &IntakeConfig) -> Result<Intake> {
    let mut narratives = LayeredNarratives::new();
    if let Some(path) = &config.narratives_path {
        narratives = narratives.with_layer(load_narratives(path)?);
    }
    let narratives = narratives.with_layer(SampleNarratives);
    let policy = TransitionPolicy::from_strict(config.strict_transitions);
    tracing::info!(
        policy = ?policy,
        default_case_id = %config.default_case_id,
        "intake configured"
    );
    Ok(Intake::new(narratives)
        .with_policy(policy)
        .with_default_case_id(&config.default_case_id))
}
