use std::fmt;

use thiserror::Error;

/// The outbound service an upstream failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Vision,
    Speech,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vision => write!(f, "vision"),
            Self::Speech => write!(f, "speech"),
        }
    }
}

/// Top-level error type for the narrator request handler.
#[derive(Debug, Error)]
pub enum NarratorError {
    /// Missing credentials or other server-side setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Missing or malformed caller input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An outbound API call failed at the transport level, returned a
    /// non-success status, or replied with an unexpected shape.
    #[error("{service} upstream error: {detail}")]
    Upstream {
        service: UpstreamService,
        detail: String,
    },
}

impl NarratorError {
    pub fn upstream(service: UpstreamService, err: &anyhow::Error) -> Self {
        Self::Upstream {
            service,
            detail: format!("{err:#}"),
        }
    }

    /// Message safe to hand back to the caller. Upstream details stay server-side.
    pub fn public_message(&self) -> String {
        match self {
            Self::Configuration(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Upstream {
                service: UpstreamService::Vision,
                ..
            } => "Failed to get AI response".to_string(),
            Self::Upstream {
                service: UpstreamService::Speech,
                ..
            } => "Failed to generate audio from Azure".to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_detail_is_not_public() {
        let err = NarratorError::upstream(
            UpstreamService::Vision,
            &anyhow::anyhow!("403 Forbidden: key=abc"),
        );
        assert_eq!(err.public_message(), "Failed to get AI response");
        assert!(err.to_string().contains("403 Forbidden"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn configuration_message_is_public() {
        let err = NarratorError::Configuration("Set GEMINI_API_KEY".into());
        assert_eq!(err.public_message(), "Set GEMINI_API_KEY");
    }
}
