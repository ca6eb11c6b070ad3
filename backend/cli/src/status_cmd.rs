//! CLI Status Command
//!
//! Probes a running server's health endpoint.

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{note_error, note_success, note_warn};

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://127.0.0.1:{port}/api/health");
    let response = match reqwest::Client::new().get(&url).send().await {
        Ok(resp) => resp,
        Err(_) => {
            note_error(&format!("Narrator is not running on port {port}"));
            return Ok(());
        }
    };

    let body: Value = response.json().await?;
    note_success(&format!(
        "Narrator {} is up on port {port}",
        body["version"].as_str().unwrap_or("?")
    ));
    for (field, label) in [
        ("visionConfigured", "Vision API key"),
        ("speechConfigured", "Speech API key"),
    ] {
        if body[field].as_bool().unwrap_or(false) {
            note_success(&format!("{label} configured"));
        } else {
            note_warn(&format!("{label} missing"));
        }
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
