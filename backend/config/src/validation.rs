//! Config validation: checks with user-friendly messages.
//!
//! Missing API keys are warnings, not errors: the server still starts and
//! answers the affected routes with a configuration error.

use crate::schema::NarratorConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &NarratorConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_vision(config, &mut report);
    validate_speech(config, &mut report);
    report
}

fn validate_server(config: &NarratorConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port() == 0 {
        report.error("server.port", "port must be > 0");
    } else if server.port() < 1024 {
        report.warn(
            "server.port",
            format!(
                "Port {} requires elevated privileges; consider using a port >= 1024",
                server.port()
            ),
        );
    }
    if server.max_body_bytes() == 0 {
        report.error("server.maxBodyBytes", "maxBodyBytes must be > 0");
    }
}

fn validate_vision(config: &NarratorConfig, report: &mut ValidationReport) {
    let vision = &config.vision;
    if vision.api_key().is_none() {
        report.warn(
            "vision.apiKey",
            "No vision API key (GEMINI_API_KEY); every route will answer with a configuration error",
        );
    }
    if vision.model().trim().is_empty() {
        report.error("vision.model", "Model name cannot be empty");
    }
    if !is_http_url(vision.base_url()) {
        report.error("vision.baseUrl", "baseUrl must be an http(s) URL");
    }
}

fn validate_speech(config: &NarratorConfig, report: &mut ValidationReport) {
    let speech = &config.speech;
    if speech.api_key().is_none() {
        report.warn(
            "speech.apiKey",
            "No speech API key (AZURE_SPEECH_KEY); /narrate will answer with a configuration error",
        );
    }
    let region = speech.region();
    if !region.chars().all(|c| c.is_ascii_alphanumeric()) {
        report.error(
            "speech.region",
            format!("Region '{region}' must be alphanumeric, e.g. 'eastus'"),
        );
    }
    if !is_http_url(&speech.endpoint()) {
        report.error("speech.endpoint", "endpoint must be an http(s) URL");
    }
    if !speech.output_format().ends_with("-mp3") {
        report.warn(
            "speech.outputFormat",
            "Responses are labelled audio/mpeg; a non-MP3 output format will be mislabelled",
        );
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;

    fn configured() -> NarratorConfig {
        let mut cfg = apply_all_defaults(NarratorConfig::default());
        cfg.vision.api_key = Some("g".into());
        cfg.speech.api_key = Some("a".into());
        cfg
    }

    #[test]
    fn configured_defaults_are_clean() {
        let report = validate(&configured());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn missing_keys_only_warn() {
        let report = validate(&apply_all_defaults(NarratorConfig::default()));
        assert!(report.is_valid());
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"vision.apiKey"));
        assert!(paths.contains(&"speech.apiKey"));
    }

    #[test]
    fn bad_region_is_error() {
        let mut cfg = configured();
        cfg.speech.region = Some("east us/../".into());
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "speech.region");
    }

    #[test]
    fn zero_port_is_error() {
        let mut cfg = configured();
        cfg.server.port = Some(0);
        assert!(!validate(&cfg).is_valid());
    }
}
