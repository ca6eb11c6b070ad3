//! CLI Doctor Command
//!
//! Reports which API keys are configured and prints the effective, redacted
//! configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use narrator_config::{collect_referenced_vars, load_raw_config, redact, validate, NarratorConfig};

use crate::terminal_output::{note_error, note_info, note_success, note_warn, render_table, Column};

/// One line of the doctor report.
#[derive(Debug, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Executes the full doctor diagnosis.
pub async fn run(explicit: Option<PathBuf>) -> Result<()> {
    println!("\n🔍 Running Narrator Doctor...\n");

    let (path, config) = match crate::config::load(explicit).await {
        Ok(loaded) => loaded,
        Err(e) => {
            note_error(&format!("Configuration is invalid: {e:#}"));
            return Err(e);
        }
    };
    note_info(&format!("Config file: {}", describe_path(&path)));

    let checks = run_checks(&config);
    let rows: Vec<Vec<String>> = checks
        .iter()
        .map(|c| {
            vec![
                c.name.to_string(),
                if c.ok { "ok" } else { "missing" }.to_string(),
                c.detail.clone(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(
            &[Column::left("Check"), Column::left("Status"), Column::left("Detail")],
            &rows
        )
    );

    let raw = load_raw_config(&path).await?;
    let env: HashMap<String, String> = std::env::vars().collect();
    for (var, set) in referenced_vars(&raw, &env) {
        if set {
            note_success(&format!("${{{var}}} is set"));
        } else {
            note_warn(&format!("${{{var}}} is referenced by the config file but not set"));
        }
    }

    for warning in validate(&config).warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }

    println!("\nEffective configuration:");
    println!(
        "{}",
        serde_json::to_string_pretty(&redact(&serde_json::to_value(&config)?))?
    );

    println!();
    if checks.iter().all(|c| c.ok) {
        note_success("All checks passed! Narrator is ready.");
    } else {
        note_warn("Some checks failed. Affected endpoints will answer with HTTP 500.");
    }
    Ok(())
}

/// Keys and files the server needs at request time.
pub fn run_checks(config: &NarratorConfig) -> Vec<Check> {
    let static_dir = Path::new(config.server.static_dir());
    let index = static_dir.join("index.html");

    vec![
        Check {
            name: "GEMINI_API_KEY",
            ok: config.vision.api_key().is_some(),
            detail: format!("model {}", config.vision.model()),
        },
        Check {
            name: "AZURE_SPEECH_KEY",
            ok: config.speech.api_key().is_some(),
            detail: format!("region {}", config.speech.region()),
        },
        Check {
            name: "static pages",
            ok: index.is_file(),
            detail: index.display().to_string(),
        },
    ]
}

/// `${VAR}` references in the raw config file and whether each has a value.
pub fn referenced_vars(raw: &Value, env: &HashMap<String, String>) -> Vec<(String, bool)> {
    collect_referenced_vars(raw)
        .into_iter()
        .map(|var| {
            let set = env.get(&var).is_some_and(|v| !v.is_empty());
            (var, set)
        })
        .collect()
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using environment only)", path.display())
    }
}
