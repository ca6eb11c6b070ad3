//! Structured Logger
//!
//! Wraps `tracing` to provide console output, an optional daily-rolling NDJSON
//! file, and environment-based level control.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// How the global subscriber should be built.
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON on the console.
    pub json: bool,
    /// Also write `narrator.log.YYYY-MM-DD` files here.
    pub log_dir: Option<PathBuf>,
}

/// Initialize the global structured logger.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(options: &LoggerOptions) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let console_layer = if options.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    let file_layer = options.log_dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "narrator.log");
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
            .boxed()
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
