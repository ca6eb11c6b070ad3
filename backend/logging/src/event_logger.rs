//! Request Event Logger
//!
//! One structured record per finished request, emitted through `tracing`
//! under the `narrator_events` target so it lands in the NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    Narration {
        persona: String,
        text_chars: usize,
        audio_bytes: usize,
    },
    FoodAnalysis {
        suggestions: usize,
        fallback: bool,
    },
    Recipe {
        title: String,
        fallback: bool,
    },
    Failure {
        operation: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: RequestEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Log a request event, scrubbing secrets from free-text fields first.
    pub fn log_event(request_id: &str, mut event: RequestEvent) {
        let failed = if let RequestEvent::Failure { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
            true
        } else {
            false
        };

        let entry = EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        };
        let json = serde_json::to_string(&entry).unwrap_or_default();

        if failed {
            warn!(target: "narrator_events", event = %json, "Request failed");
        } else {
            info!(target: "narrator_events", event = %json, "Request completed");
        }
    }
}
