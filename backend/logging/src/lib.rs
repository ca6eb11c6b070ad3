//! Structured logging for the narrator backend.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON file),
//! secret redaction, and per-request event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, RequestEvent};
pub use logger::{init_logger, LoggerOptions};
pub use redact::redact_sensitive_data;
