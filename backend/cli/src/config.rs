use std::path::PathBuf;

use anyhow::Result;

use narrator_config::{config_dir, config_file_path, load_and_prepare, NarratorConfig};
use narrator_logging::LoggerOptions;

/// `--config` when given, otherwise `~/.narrator/config.yaml`.
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Load the runtime configuration. A missing file means environment only.
pub async fn load(explicit: Option<PathBuf>) -> Result<(PathBuf, NarratorConfig)> {
    let path = resolve_path(explicit);
    let config = load_and_prepare(&path).await?;
    Ok((path, config))
}

pub fn logger_options(config: &NarratorConfig) -> LoggerOptions {
    LoggerOptions {
        level: config.logging.level().to_string(),
        json: config.logging.json.unwrap_or(false),
        log_dir: config.logging.dir.as_ref().map(PathBuf::from),
    }
}
