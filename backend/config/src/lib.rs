//! `narrator-config`: runtime configuration for the narrator backend.
//!
//! Provides:
//! - Typed config schema (server, vision API, speech API, logging)
//! - Optional YAML config file
//! - `${ENV_VAR}` substitution and well-known env var overrides
//! - Default value application
//! - Validation and redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides_with, collect_referenced_vars, resolve_env_vars_with, MissingEnvVar,
};
pub use io::{config_dir, config_file_path, load_raw_config};
pub use redact::redact;
pub use schema::{LoggingConfig, NarratorConfig, ServerConfig, SpeechConfig, VisionConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<NarratorConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// [`load_and_prepare`] against an explicit environment map.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<NarratorConfig> {
    let raw = load_raw_config(path).await?;

    let (value, missing) = resolve_env_vars_with(&raw, env);
    for var in &missing {
        tracing::warn!(var = %var.var_name, path = %var.config_path, "Config references unset env var");
    }

    let config: NarratorConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn env_only_config() {
        let dir = tempfile::tempdir().unwrap();
        let env: HashMap<String, String> = [
            ("GEMINI_API_KEY".to_string(), "g-key".to_string()),
            ("AZURE_SPEECH_KEY".to_string(), "a-key".to_string()),
        ]
        .into();
        let cfg = load_and_prepare_with(&dir.path().join("absent.yaml"), &env)
            .await
            .unwrap();
        assert_eq!(cfg.vision.api_key(), Some("g-key"));
        assert_eq!(cfg.speech.region(), "eastus");
    }

    #[tokio::test]
    async fn file_reference_to_unset_var_leaves_key_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "vision:\n  apiKey: ${MY_GEMINI}\n").unwrap();
        let cfg = load_and_prepare_with(&path, &HashMap::new()).await.unwrap();
        assert!(cfg.vision.api_key().is_none());
    }

    #[tokio::test]
    async fn invalid_config_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 0\n").unwrap();
        assert!(load_and_prepare_with(&path, &HashMap::new()).await.is_err());
    }
}
