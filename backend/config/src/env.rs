//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside YAML string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched and `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Well-known variables (`GEMINI_API_KEY`, `AZURE_SPEECH_KEY`, ...) that
//!   override whatever the file says.
//!
//! Unset references never fail the load. They resolve to an empty string and
//! are reported back, so a missing API key shows up as a configuration error
//! on the request that needs it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::NarratorConfig;

/// `$${NAME}` (escaped) or `${NAME}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// A `${VAR}` reference with no value in the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("env var \"{var_name}\" referenced at {config_path} is not set")]
pub struct MissingEnvVar {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references from `env`.
pub fn resolve_env_vars_with(
    value: &Value,
    env: &HashMap<String, String>,
) -> (Value, Vec<MissingEnvVar>) {
    let mut missing = Vec::new();
    let resolved = substitute_value(value, env, "", &mut missing);
    (resolved, missing)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
    missing: &mut Vec<MissingEnvVar>,
) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_string(s, env, path, missing)),
        Value::Array(arr) => Value::Array(
            arr.iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]"), missing))
                .collect(),
        ),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path, missing));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
    missing: &mut Vec<MissingEnvVar>,
) -> String {
    if !s.contains('$') {
        return s.to_string();
    }

    ENV_VAR_PATTERN
        .replace_all(s, |caps: &Captures| {
            let var_name = &caps[1];
            if caps[0].starts_with("$$") {
                return format!("${{{var_name}}}");
            }
            match env.get(var_name).filter(|v| !v.is_empty()) {
                Some(val) => val.clone(),
                None => {
                    missing.push(MissingEnvVar {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Apply the well-known variables from `env`. Empty values are ignored.
pub fn apply_env_overrides_with(
    mut config: NarratorConfig,
    env: &HashMap<String, String>,
) -> NarratorConfig {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(key) = get("GEMINI_API_KEY") {
        config.vision.api_key = Some(key);
    }
    if let Some(model) = get("GEMINI_MODEL") {
        config.vision.model = Some(model);
    }
    if let Some(key) = get("AZURE_SPEECH_KEY") {
        config.speech.api_key = Some(key);
    }
    if let Some(region) = get("AZURE_SPEECH_REGION") {
        config.speech.region = Some(region);
    }
    if let Some(host) = get("NARRATOR_HOST") {
        config.server.host = Some(host);
    }
    if let Some(port) = get("NARRATOR_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = Some(port),
            Err(_) => tracing::warn!(value = %port, "Ignoring unparsable NARRATOR_PORT"),
        }
    }
    if let Some(dir) = get("NARRATOR_STATIC_DIR") {
        config.server.static_dir = Some(dir);
    }
    if let Some(level) = get("NARRATOR_LOG_LEVEL") {
        config.logging.level = Some(level);
    }
    if let Some(dir) = get("NARRATOR_LOG_DIR") {
        config.logging.dir = Some(dir);
    }

    config
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    out.push(caps[1].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}
