//! Config file discovery and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the narrator config directory.
/// Priority: `NARRATOR_CONFIG_DIR` env > `~/.narrator/` > `./.narrator`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NARRATOR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".narrator"),
        None => PathBuf::from(".narrator"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as a raw JSON value tree, before env substitution.
///
/// Returns an empty object if the file doesn't exist; the service runs on
/// environment variables alone.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using environment only");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file parses as YAML null.
    let value: Value = serde_yaml::from_str::<Option<Value>>(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?
        .unwrap_or_else(|| Value::Object(Default::default()));

    info!(path = %path.display(), "Loaded config file");
    Ok(value)
}
