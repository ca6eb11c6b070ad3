//! Azure Cognitive Services text-to-speech provider.
//!
//! Posts an SSML document with the subscription key header and returns the
//! encoded audio body.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::info;

use crate::engine::{AudioFormat, TtsProvider, TtsRequest};
use crate::ssml::build_ssml;

const DEFAULT_OUTPUT_FORMAT: &str = "audio-24khz-160kbitrate-mono-mp3";
const DEFAULT_USER_AGENT: &str = "NarratorApp";

pub struct AzureSpeech {
    client: Client,
    api_key: String,
    endpoint: String,
    output_format: String,
    user_agent: String,
}

impl AzureSpeech {
    /// Client for the regional endpoint, e.g. `eastus`.
    pub fn new(api_key: impl Into<String>, region: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: format!("https://{region}.tts.speech.microsoft.com/cognitiveservices/v1"),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl TtsProvider for AzureSpeech {
    fn name(&self) -> &str {
        "azure"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::from_output_format(&self.output_format)
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let ssml = build_ssml(&req);
        info!(voice = %req.voice, chars = req.text.len(), "[TTS/Azure] Synthesizing");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.output_format)
            .header("User-Agent", &self.user_agent)
            .body(ssml)
            .send()
            .await
            .context("Azure TTS request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure TTS error {status}: {body}");
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read Azure TTS audio")?;
        Ok(audio)
    }
}
