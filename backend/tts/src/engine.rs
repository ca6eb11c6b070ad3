//! TTS provider trait, request type and audio formats.
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use narrator_core::{Persona, Prosody};

// ---------------------------------------------------------------------------
// Audio format
// ---------------------------------------------------------------------------

/// Container of the synthesized audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Ogg,
    Wav,
}

impl AudioFormat {
    /// Classify an Azure `X-Microsoft-OutputFormat` value.
    pub fn from_output_format(format: &str) -> Self {
        let format = format.to_ascii_lowercase();
        if format.ends_with("mp3") {
            Self::Mp3
        } else if format.starts_with("ogg") || format.starts_with("webm") {
            Self::Ogg
        } else if format.starts_with("riff") {
            Self::Wav
        } else {
            Self::Mp3
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
        }
    }
}

// ---------------------------------------------------------------------------
// Request / trait
// ---------------------------------------------------------------------------

/// What to say and how to say it.
#[derive(Debug, Clone)]
pub struct TtsRequest {
    pub text: String,
    /// Provider voice id, e.g. `en-GB-RyanNeural`.
    pub voice: String,
    /// BCP-47 language tag.
    pub language: String,
    pub gender: String,
    pub prosody: Option<Prosody>,
}

impl TtsRequest {
    /// Voice, language and prosody taken from the persona's style.
    pub fn for_persona(text: impl Into<String>, persona: Persona) -> Self {
        let style = persona.style();
        Self {
            text: text.into(),
            voice: style.voice.to_string(),
            language: style.language.to_string(),
            gender: style.gender.to_string(),
            prosody: Some(style.prosody),
        }
    }
}

/// Returns raw encoded audio bytes.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Container of the bytes returned by [`TtsProvider::synthesize`].
    fn format(&self) -> AudioFormat;

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes>;
}
