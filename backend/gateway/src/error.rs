//! Error → HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use narrator_core::NarratorError;

#[derive(Debug)]
pub enum ApiError {
    /// `{ "error": "<message>" }` with 400 for caller mistakes, 500 otherwise.
    Narrator(NarratorError),
    /// A body axum refused to read at all, e.g. over the size limit.
    Body(JsonRejection),
}

impl From<NarratorError> for ApiError {
    fn from(err: NarratorError) -> Self {
        Self::Narrator(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Narrator(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, Json(json!({ "error": err.public_message() }))).into_response()
            }
            Self::Body(rejection) => {
                let status = rejection.status();
                (status, Json(json!({ "error": rejection.body_text() }))).into_response()
            }
        }
    }
}
