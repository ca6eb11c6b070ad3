//! Narrator runtime configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills in
//! the gaps and the accessor methods read the effective values.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BODY_BYTES, DEFAULT_OUTPUT_FORMAT, DEFAULT_PORT,
    DEFAULT_SPEECH_REGION, DEFAULT_STATIC_DIR, DEFAULT_USER_AGENT, DEFAULT_VISION_BASE_URL,
    DEFAULT_VISION_MODEL,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorConfig {
    /// HTTP listener and static pages
    #[serde(default)]
    pub server: ServerConfig,

    /// Vision / generation API (Gemini)
    #[serde(default)]
    pub vision: VisionConfig,

    /// Speech synthesis API (Azure)
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Directory holding the pre-built pages and assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
    /// Largest accepted request body; camera frames arrive base64-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
}

impl ServerConfig {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }

    pub fn static_dir(&self) -> &str {
        self.static_dir.as_deref().unwrap_or(DEFAULT_STATIC_DIR)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl VisionConfig {
    /// The API key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_VISION_BASE_URL)
            .trim_end_matches('/')
    }
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Full synthesis URL; overrides the one derived from `region`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl SpeechConfig {
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    pub fn region(&self) -> &str {
        non_empty(self.region.as_deref()).unwrap_or(DEFAULT_SPEECH_REGION)
    }

    pub fn endpoint(&self) -> String {
        match non_empty(self.endpoint.as_deref()) {
            Some(url) => url.to_string(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region()
            ),
        }
    }

    pub fn output_format(&self) -> &str {
        self.output_format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit JSON on the console instead of the human-readable format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
