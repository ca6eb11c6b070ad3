//! Main HTTP Gateway Server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use narrator_handler::RequestHandler;

use crate::{control_ui, health_api, routes};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub handler: Arc<RequestHandler>,
}

impl GatewayState {
    pub fn new(handler: RequestHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

/// Build the full router: API endpoints, static pages and middleware.
pub fn build_router(state: GatewayState, static_dir: &Path, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/narrate", post(routes::narrate).head(routes::narrate_head))
        .route("/narrate/audio", post(routes::narrate_audio))
        .route("/analyze_food", post(routes::analyze_food))
        .route("/get_recipe", post(routes::get_recipe))
        .route("/api/health", get(health_api::get_health))
        .merge(control_ui::ui_router(static_dir))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn start_server(addr: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %addr, "Narrator gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Narrator gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Could not install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
