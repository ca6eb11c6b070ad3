use anyhow::Result;
use async_trait::async_trait;

use crate::image::ImagePayload;

/// A multimodal model that turns a prompt plus an inline image into text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the prompt and image, returning the first text part of the reply.
    async fn generate(&self, request: &VisionRequest) -> Result<String>;
}

/// Request to a vision model. The image may be absent for text-only prompts.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: String,
    pub image: Option<ImagePayload>,
}

impl VisionRequest {
    pub fn with_image(prompt: impl Into<String>, image: ImagePayload) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image),
        }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }
}
