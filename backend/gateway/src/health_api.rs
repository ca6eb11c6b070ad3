//! Gateway Health API
//!
//! Reports process liveness and which upstream keys are configured.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub vision_configured: bool,
    pub speech_configured: bool,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "narrator",
        version: env!("CARGO_PKG_VERSION"),
        vision_configured: state.handler.vision_configured(),
        speech_configured: state.handler.speech_configured(),
    })
}
