mod config;
mod doctor_cmd;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use narrator_config::{defaults::DEFAULT_PORT, redact, validate, NarratorConfig};
use narrator_gateway::{build_router, start_server, GatewayState};
use narrator_handler::RequestHandler;

#[derive(Parser)]
#[command(name = "narrator")]
#[command(about = "Narrator: camera-to-voice narration backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Probe a running server's health endpoint
    Status {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Check API keys, static pages and the effective configuration
    Doctor {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let (path, mut config) = config::load(config).await?;
            if let Some(port) = port {
                config.server.port = Some(port);
            }
            narrator_logging::init_logger(&config::logger_options(&config));
            run_server(path, config).await?;
        }
        Commands::Status { port } => status_cmd::run(port).await?,
        Commands::Doctor { config } => doctor_cmd::run(config).await?,
    }

    Ok(())
}

async fn run_server(path: PathBuf, config: NarratorConfig) -> Result<()> {
    let redacted = redact(&serde_json::to_value(&config)?);
    info!(
        config_path = %path.display(),
        config = %redacted,
        "Starting narrator"
    );
    for warning in validate(&config).warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }

    let handler = RequestHandler::from_config(&config);
    if !handler.vision_configured() {
        warn!("GEMINI_API_KEY is not set; every API route will answer 500");
    } else if !handler.speech_configured() {
        warn!("AZURE_SPEECH_KEY is not set; narration routes will answer 500");
    }

    let static_dir = PathBuf::from(config.server.static_dir());
    if !static_dir.join("index.html").is_file() {
        warn!(dir = %static_dir.display(), "index.html not found in static directory");
    }

    let app = build_router(
        GatewayState::new(handler),
        &static_dir,
        config.server.max_body_bytes(),
    );
    start_server(&config.server.bind_addr(), app).await
}
