//! Log Redaction Layer
//!
//! Scrubs API keys and tokens from strings prior to logging. Upstream error
//! messages embed request URLs, and the vision API takes its key as a query
//! parameter.

use regex::Regex;
use std::sync::LazyLock;

static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&](?:key|api_key|apikey)=)[^&\s]+").unwrap());
static HEADER_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(ocp-apim-subscription-key[:=]\s*)[A-Za-z0-9]+").unwrap()
});
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(AIza[0-9A-Za-z\-_]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = QUERY_KEY_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = HEADER_KEY_RE.replace_all(&redacted, "${1}[REDACTED]");
    API_KEY_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
