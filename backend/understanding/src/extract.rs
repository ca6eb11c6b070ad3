//! Best-effort JSON recovery from free-text model replies.
//!
//! Models wrap JSON in prose or code fences often enough that strict parsing
//! is not useful. The span from the first `{` to the last `}` is tried; on
//! any failure the caller gets its deterministic fallback instead.

use serde::de::DeserializeOwned;
use tracing::debug;

/// A parsed value, or the fallback that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub fallback: bool,
}

/// The span between the first `{` and the last `}`, inclusive.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parse the embedded object, or build the fallback from the raw reply.
pub fn parse_lenient<T, F>(raw: &str, fallback: F) -> Lenient<T>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    let parsed = extract_json_object(raw).and_then(|span| {
        serde_json::from_str(span)
            .map_err(|e| debug!(error = %e, "Model reply did not parse as JSON"))
            .ok()
    });

    match parsed {
        Some(value) => Lenient {
            value,
            fallback: false,
        },
        None => Lenient {
            value: fallback(raw),
            fallback: true,
        },
    }
}
