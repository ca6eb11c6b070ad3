//! Narrator HTTP Gateway
//!
//! Serves the camera pages and the JSON/audio endpoints on one axum router.

pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
