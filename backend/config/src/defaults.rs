//! Config defaults: applies sensible default values to parsed config.

use crate::schema::NarratorConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// 10 MiB; a 1080p JPEG is well under this once base64-encoded.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_VISION_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_SPEECH_REGION: &str = "eastus";

/// Mono 24 kHz, 160 kbit/s MP3.
pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-24khz-160kbitrate-mono-mp3";
pub const DEFAULT_USER_AGENT: &str = "NarratorApp";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: NarratorConfig) -> NarratorConfig {
    let config = apply_server_defaults(config);
    let config = apply_vision_defaults(config);
    let config = apply_speech_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: NarratorConfig) -> NarratorConfig {
    let server = &mut config.server;
    server.host.get_or_insert_with(|| DEFAULT_HOST.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    server
        .static_dir
        .get_or_insert_with(|| DEFAULT_STATIC_DIR.to_string());
    server.max_body_bytes.get_or_insert(DEFAULT_MAX_BODY_BYTES);
    config
}

fn apply_vision_defaults(mut config: NarratorConfig) -> NarratorConfig {
    let vision = &mut config.vision;
    vision
        .model
        .get_or_insert_with(|| DEFAULT_VISION_MODEL.to_string());
    vision
        .base_url
        .get_or_insert_with(|| DEFAULT_VISION_BASE_URL.to_string());
    config
}

/// The region falls back to a fixed value when unset or blank.
fn apply_speech_defaults(mut config: NarratorConfig) -> NarratorConfig {
    let speech = &mut config.speech;
    if speech.region.as_deref().map(str::trim).unwrap_or("").is_empty() {
        speech.region = Some(DEFAULT_SPEECH_REGION.to_string());
    }
    speech
        .output_format
        .get_or_insert_with(|| DEFAULT_OUTPUT_FORMAT.to_string());
    speech
        .user_agent
        .get_or_insert_with(|| DEFAULT_USER_AGENT.to_string());
    config
}

fn apply_logging_defaults(mut config: NarratorConfig) -> NarratorConfig {
    let logging = &mut config.logging;
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
