//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "subscriptionKey",
    "subscription_key",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, replacing sensitive fields with a short hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    // Preserve a length hint: first 4 chars + ***
    let hint = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
