//! Narration, food-analysis and recipe endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use narrator_core::{NarrationRequest, NarrationResult};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Carries the narration text (base64 of UTF-8) alongside a raw audio body.
pub const NARRATION_TEXT_HEADER: &str = "x-narration-text";

#[derive(Debug, Default, Deserialize)]
pub struct FoodRequest {
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    pub suggestion: Option<String>,
    pub description: Option<String>,
}

/// Handler for `POST /narrate`. JSON unless the caller accepts `audio/mpeg`.
pub async fn narrate(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Json<NarrationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_or_default(body)?;
    let result = state.handler.narrate(req).await?;

    if wants_audio(&headers) {
        Ok(audio_response(result))
    } else {
        Ok(Json(json!({
            "text": result.text,
            "audio": BASE64.encode(&result.audio),
        }))
        .into_response())
    }
}

/// Handler for `POST /narrate/audio`. Always a raw audio body.
pub async fn narrate_audio(
    State(state): State<GatewayState>,
    body: Result<Json<NarrationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_or_default(body)?;
    let result = state.handler.narrate(req).await?;
    Ok(audio_response(result))
}

/// Handler for `HEAD /narrate`.
pub async fn narrate_head() -> StatusCode {
    StatusCode::OK
}

/// Handler for `POST /analyze_food`.
pub async fn analyze_food(
    State(state): State<GatewayState>,
    body: Result<Json<FoodRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_or_default(body)?;
    let analysis = state.handler.analyze_food(req.image.as_deref()).await?;
    Ok(Json(analysis.value).into_response())
}

/// Handler for `POST /get_recipe`.
pub async fn get_recipe(
    State(state): State<GatewayState>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_or_default(body)?;
    let recipe = state
        .handler
        .get_recipe(req.suggestion.as_deref(), req.description.as_deref())
        .await?;
    Ok(Json(recipe.value).into_response())
}

/// An unreadable or non-JSON body is treated as an empty request, so the
/// handler reports the missing field. Oversized bodies are still rejected.
fn json_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(rejection.into())
        }
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Ignoring unparsable request body");
            Ok(T::default())
        }
    }
}

fn wants_audio(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| {
            accept
                .split(',')
                .any(|part| part.trim().starts_with("audio/mpeg"))
        })
}

fn audio_response(result: NarrationResult) -> Response {
    let text = BASE64.encode(result.text.as_bytes());
    (
        [
            (header::CONTENT_TYPE, result.mime_type.to_string()),
            (HeaderName::from_static(NARRATION_TEXT_HEADER), text),
        ],
        result.audio,
    )
        .into_response()
}
