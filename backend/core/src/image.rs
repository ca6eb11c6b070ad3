//! Data-URL image payloads sent by the camera client.

use crate::error::NarratorError;

const DEFAULT_MIME: &str = "image/jpeg";

/// A base64 image split out of a `data:<mime>;base64,<payload>` URL.
///
/// The payload is never decoded; it is forwarded verbatim to the vision API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Split a data URL on its first comma.
    pub fn from_data_url(url: &str) -> Result<Self, NarratorError> {
        let (header, data) = url
            .split_once(',')
            .ok_or_else(|| NarratorError::BadRequest("Malformed image data URL".to_string()))?;

        if data.is_empty() {
            return Err(NarratorError::BadRequest("Image data is empty".to_string()));
        }

        Ok(Self {
            mime_type: mime_from_header(header),
            data: data.to_string(),
        })
    }
}

/// `data:image/png;base64` -> `image/png`; anything unparsable falls back to JPEG.
fn mime_from_header(header: &str) -> String {
    header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .map(str::trim)
        .filter(|mime| mime.contains('/'))
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}
