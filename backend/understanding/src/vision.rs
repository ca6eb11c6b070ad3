//! Gemini `generateContent` client.
//!
//! Sends one user turn holding the prompt text and, when present, the image
//! as inline base64 data. The reply text is the first part of the first
//! candidate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use narrator_core::{VisionModel, VisionRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

pub struct GeminiVision {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl VisionModel for GeminiVision {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &VisionRequest) -> Result<String> {
        let mut parts = vec![Part::Text {
            text: &request.prompt,
        }];
        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: &image.mime_type,
                    data: &image.data,
                },
            });
        }
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        debug!(
            model = %self.model,
            with_image = request.image.is_some(),
            "Sending request to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {}: {}", status, error_body);
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        reply
            .first_text()
            .context("Gemini response has no candidates[0].content.parts[0].text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrator_core::ImagePayload;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> VisionRequest {
        VisionRequest::with_image(
            "Describe this.",
            ImagePayload {
                mime_type: "image/jpeg".into(),
                data: "/9j/AAA".into(),
            },
        )
    }

    #[tokio::test]
    async fn sends_prompt_and_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(query_param("key", "k-123"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [
                    { "text": "Describe this." },
                    { "inline_data": { "mime_type": "image/jpeg", "data": "/9j/AAA" } }
                ]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "A heron waits." }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vision = GeminiVision::new("k-123")
            .with_model("test-model")
            .with_base_url(server.uri());
        let text = vision.generate(&request()).await.unwrap();
        assert_eq!(text, "A heron waits.");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let vision = GeminiVision::new("bad").with_base_url(server.uri());
        let err = vision.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn missing_text_part_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let vision = GeminiVision::new("k").with_base_url(server.uri());
        assert!(vision.generate(&request()).await.is_err());
    }

    #[tokio::test]
    async fn text_only_request_has_one_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Recipe please" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
            })))
            .mount(&server)
            .await;

        let vision = GeminiVision::new("k").with_base_url(server.uri());
        let text = vision
            .generate(&VisionRequest::text("Recipe please"))
            .await
            .unwrap();
        assert_eq!(text, "{}");
    }
}
