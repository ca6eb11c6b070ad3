use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use narrator_config::NarratorConfig;
use narrator_core::{
    FoodAnalysis, ImagePayload, NarrationRequest, NarrationResult, NarratorError, Persona,
    RecipeDetail, UpstreamService, VisionModel, VisionRequest,
};
use narrator_logging::{redact_sensitive_data, EventLogger, RequestEvent};
use narrator_tts::{AzureSpeech, TtsProvider, TtsRequest};
use narrator_understanding::{
    food_prompt, narration_prompt, parse_food_analysis, parse_recipe, recipe_prompt, GeminiVision,
    Lenient,
};

pub const NARRATION_CONFIG_MESSAGE: &str =
    "Server missing API configuration. Set GEMINI_API_KEY and AZURE_SPEECH_KEY.";
pub const VISION_CONFIG_MESSAGE: &str = "Server missing API configuration. Set GEMINI_API_KEY.";

/// Stateless across requests; the providers are shared, immutable clients.
#[derive(Clone, Default)]
pub struct RequestHandler {
    vision: Option<Arc<dyn VisionModel>>,
    speech: Option<Arc<dyn TtsProvider>>,
}

impl RequestHandler {
    pub fn new(
        vision: Option<Arc<dyn VisionModel>>,
        speech: Option<Arc<dyn TtsProvider>>,
    ) -> Self {
        Self { vision, speech }
    }

    /// Build providers for whichever keys are configured.
    pub fn from_config(config: &NarratorConfig) -> Self {
        let vision = config.vision.api_key().map(|key| {
            let client = GeminiVision::new(key)
                .with_model(config.vision.model())
                .with_base_url(config.vision.base_url());
            Arc::new(client) as Arc<dyn VisionModel>
        });

        let speech = config.speech.api_key().map(|key| {
            let client = AzureSpeech::new(key, config.speech.region())
                .with_endpoint(config.speech.endpoint())
                .with_output_format(config.speech.output_format())
                .with_user_agent(config.speech.user_agent());
            Arc::new(client) as Arc<dyn TtsProvider>
        });

        info!(
            vision = vision.is_some(),
            speech = speech.is_some(),
            "Request handler configured"
        );
        Self { vision, speech }
    }

    pub fn vision_configured(&self) -> bool {
        self.vision.is_some()
    }

    pub fn speech_configured(&self) -> bool {
        self.speech.is_some()
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Caption the frame in the persona's voice and synthesize it.
    pub async fn narrate(&self, req: NarrationRequest) -> Result<NarrationResult, NarratorError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("narrate", request_id = %request_id);
        let result = self.narrate_inner(req).instrument(span).await;

        match &result {
            Ok((persona, out)) => EventLogger::log_event(
                &request_id,
                RequestEvent::Narration {
                    persona: persona.style().name.to_string(),
                    text_chars: out.text.chars().count(),
                    audio_bytes: out.audio.len(),
                },
            ),
            Err(e) => log_failure(&request_id, "narrate", e),
        }
        result.map(|(_, out)| out)
    }

    async fn narrate_inner(
        &self,
        req: NarrationRequest,
    ) -> Result<(Persona, NarrationResult), NarratorError> {
        let (vision, speech) = match (&self.vision, &self.speech) {
            (Some(v), Some(s)) => (v, s),
            _ => return Err(NarratorError::Configuration(NARRATION_CONFIG_MESSAGE.into())),
        };
        let image = require_image(req.image.as_deref())?;
        let persona = Persona::resolve(req.persona.as_deref());
        let history = req.history.as_deref().unwrap_or_default();

        let prompt = narration_prompt(persona, history);
        let raw = vision
            .generate(&VisionRequest::with_image(prompt, image))
            .await
            .map_err(|e| NarratorError::upstream(UpstreamService::Vision, &e))?;
        let text = persona.post_process(raw.trim());

        let audio = speech
            .synthesize(TtsRequest::for_persona(text.clone(), persona))
            .await
            .map_err(|e| NarratorError::upstream(UpstreamService::Speech, &e))?;

        Ok((
            persona,
            NarrationResult {
                text,
                audio,
                mime_type: speech.format().mime_type(),
            },
        ))
    }

    /// Identify food in the frame and suggest dishes.
    pub async fn analyze_food(
        &self,
        image: Option<&str>,
    ) -> Result<Lenient<FoodAnalysis>, NarratorError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("analyze_food", request_id = %request_id);
        let result = self.analyze_food_inner(image).instrument(span).await;

        match &result {
            Ok(out) => EventLogger::log_event(
                &request_id,
                RequestEvent::FoodAnalysis {
                    suggestions: out.value.suggestions.len(),
                    fallback: out.fallback,
                },
            ),
            Err(e) => log_failure(&request_id, "analyze_food", e),
        }
        result
    }

    async fn analyze_food_inner(
        &self,
        image: Option<&str>,
    ) -> Result<Lenient<FoodAnalysis>, NarratorError> {
        let vision = self.require_vision()?;
        let image = require_image(image)?;

        let raw = vision
            .generate(&VisionRequest::with_image(food_prompt(), image))
            .await
            .map_err(|e| NarratorError::upstream(UpstreamService::Vision, &e))?;
        Ok(parse_food_analysis(&raw))
    }

    /// Expand one suggestion into a full recipe.
    pub async fn get_recipe(
        &self,
        suggestion: Option<&str>,
        description: Option<&str>,
    ) -> Result<Lenient<RecipeDetail>, NarratorError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("get_recipe", request_id = %request_id);
        let result = self
            .get_recipe_inner(suggestion, description)
            .instrument(span)
            .await;

        match &result {
            Ok(out) => EventLogger::log_event(
                &request_id,
                RequestEvent::Recipe {
                    title: out.value.title().to_string(),
                    fallback: out.fallback,
                },
            ),
            Err(e) => log_failure(&request_id, "get_recipe", e),
        }
        result
    }

    async fn get_recipe_inner(
        &self,
        suggestion: Option<&str>,
        description: Option<&str>,
    ) -> Result<Lenient<RecipeDetail>, NarratorError> {
        let title = suggestion
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NarratorError::BadRequest("No suggestion provided".into()))?;
        let vision = self.require_vision()?;

        let prompt = recipe_prompt(title, description);
        let raw = vision
            .generate(&VisionRequest::text(prompt))
            .await
            .map_err(|e| NarratorError::upstream(UpstreamService::Vision, &e))?;
        Ok(parse_recipe(&raw, title))
    }

    fn require_vision(&self) -> Result<&Arc<dyn VisionModel>, NarratorError> {
        self.vision
            .as_ref()
            .ok_or_else(|| NarratorError::Configuration(VISION_CONFIG_MESSAGE.into()))
    }
}

fn require_image(image: Option<&str>) -> Result<ImagePayload, NarratorError> {
    match image.filter(|s| !s.trim().is_empty()) {
        Some(url) => ImagePayload::from_data_url(url),
        None => Err(NarratorError::BadRequest("No image data received".into())),
    }
}

fn log_failure(request_id: &str, operation: &str, err: &NarratorError) {
    if !err.is_client_error() {
        let detail = redact_sensitive_data(&err.to_string());
        error!(request_id, operation, error = %detail, "Request failed");
    }
    EventLogger::log_event(
        request_id,
        RequestEvent::Failure {
            operation: operation.to_string(),
            error_msg: err.to_string(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use bytes::Bytes;
    use narrator_tts::AudioFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const FRAME: &str = "data:image/jpeg;base64,/9j/4AAQ";

    struct MockVision {
        reply: Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl MockVision {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl VisionModel for MockVision {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, req: &VisionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = req.prompt.clone();
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(msg) => anyhow::bail!("{msg}"),
            }
        }
    }

    struct MockSpeech {
        fail: bool,
        calls: AtomicUsize,
        last: Mutex<Option<TtsRequest>>,
    }

    impl MockSpeech {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TtsProvider for MockSpeech {
        fn name(&self) -> &str {
            "mock"
        }

        fn format(&self) -> AudioFormat {
            AudioFormat::Mp3
        }

        async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(req);
            if self.fail {
                anyhow::bail!("speech service returned 401");
            }
            Ok(Bytes::from_static(&[1, 2, 3]))
        }
    }

    fn handler(vision: &Arc<MockVision>, speech: &Arc<MockSpeech>) -> RequestHandler {
        RequestHandler::new(
            Some(vision.clone() as Arc<dyn VisionModel>),
            Some(speech.clone() as Arc<dyn TtsProvider>),
        )
    }

    fn narration(image: Option<&str>, persona: Option<&str>) -> NarrationRequest {
        NarrationRequest {
            image: image.map(str::to_string),
            history: Some("The heron waits.".into()),
            persona: persona.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn narrate_returns_text_and_audio() {
        let vision = MockVision::replying("  The heron strikes.  ");
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), None))
            .await
            .unwrap();

        assert_eq!(out.text, "The heron strikes.");
        assert_eq!(out.audio.as_ref(), &[1, 2, 3]);
        assert_eq!(out.mime_type, "audio/mpeg");
        assert!(vision.last_prompt.lock().unwrap().contains("The heron waits."));

        let sent = speech.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.voice, "en-GB-RyanNeural");
    }

    #[tokio::test]
    async fn host_persona_adds_catchphrase_and_voice() {
        let vision = MockVision::replying("Look at that. She's a beauty!");
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), Some("IRWIN")))
            .await
            .unwrap();

        assert_eq!(out.text, "Crikey! Look at that. Crikey! She's a beauty!");
        let sent = speech.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.voice, "en-AU-WilliamNeural");
        assert_eq!(sent.text, out.text);
    }

    #[tokio::test]
    async fn unknown_persona_uses_narrator() {
        let vision = MockVision::replying("A quiet morning.");
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), Some("pirate")))
            .await
            .unwrap();
        assert_eq!(out.text, "A quiet morning.");
    }

    #[tokio::test]
    async fn missing_keys_make_no_outbound_calls() {
        let vision = MockVision::replying("unused");
        let only_vision =
            RequestHandler::new(Some(vision.clone() as Arc<dyn VisionModel>), None);

        let err = only_vision
            .narrate(narration(Some(FRAME), None))
            .await
            .unwrap_err();
        assert!(matches!(err, NarratorError::Configuration(_)));
        assert_eq!(err.public_message(), NARRATION_CONFIG_MESSAGE);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn configuration_is_checked_before_image() {
        let err = RequestHandler::default()
            .narrate(narration(None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, NarratorError::Configuration(_)));
    }

    #[tokio::test]
    async fn malformed_image_is_bad_request() {
        let vision = MockVision::replying("unused");
        let speech = MockSpeech::new(false);
        let h = handler(&vision, &speech);

        let err = h.narrate(narration(None, None)).await.unwrap_err();
        assert!(err.is_client_error());

        let err = h
            .narrate(narration(Some("not-a-data-url"), None))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn vision_failure_skips_speech() {
        let vision = MockVision::failing("vision service returned 500");
        let speech = MockSpeech::new(false);
        let err = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), None))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Failed to get AI response");
        assert_eq!(speech.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn speech_failure_returns_no_text() {
        let vision = MockVision::replying("The heron strikes.");
        let speech = MockSpeech::new(true);
        let err = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NarratorError::Upstream {
                service: UpstreamService::Speech,
                ..
            }
        ));
        assert_eq!(err.public_message(), "Failed to generate audio from Azure");
    }

    #[tokio::test]
    async fn analyze_food_parses_reply() {
        let vision = MockVision::replying(
            r#"Sure! {"commentary":"Tomatoes and basil.","suggestions":[{"title":"Bruschetta","description":"Chop and pile on toast."}]}"#,
        );
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .analyze_food(Some(FRAME))
            .await
            .unwrap();

        assert!(!out.fallback);
        assert_eq!(out.value.suggestions[0].title, "Bruschetta");
        assert_eq!(speech.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn analyze_food_falls_back_on_prose() {
        let vision = MockVision::replying("I see a lonely lemon.");
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .analyze_food(Some(FRAME))
            .await
            .unwrap();

        assert!(out.fallback);
        assert_eq!(out.value.commentary, "I see a lonely lemon.");
        assert_eq!(out.value.suggestions.len(), 1);
    }

    #[tokio::test]
    async fn analyze_food_needs_only_vision_key() {
        let vision = MockVision::replying(r#"{"commentary":"Empty.","suggestions":[]}"#);
        let h = RequestHandler::new(Some(vision.clone() as Arc<dyn VisionModel>), None);
        let out = h.analyze_food(Some(FRAME)).await.unwrap();
        assert!(out.value.suggestions.is_empty());

        let err = RequestHandler::default()
            .analyze_food(Some(FRAME))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), VISION_CONFIG_MESSAGE);
    }

    #[tokio::test]
    async fn recipe_requires_suggestion_before_config() {
        let err = RequestHandler::default()
            .get_recipe(Some("   "), None)
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let err = RequestHandler::default()
            .get_recipe(Some("Tomato Soup"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, NarratorError::Configuration(_)));
    }

    #[tokio::test]
    async fn recipe_fallback_echoes_title() {
        let vision = MockVision::replying("I'd rather not.");
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .get_recipe(Some("Tomato Soup"), Some("Roasted and blended."))
            .await
            .unwrap();

        assert!(out.fallback);
        assert_eq!(out.value.title(), "Tomato Soup");
        assert!(out.value.get("ingredients").is_some_and(|v| v.is_array()));
        assert!(out.value.get("instructions").is_some_and(|v| v.is_array()));
        assert!(vision
            .last_prompt
            .lock()
            .unwrap()
            .contains("Roasted and blended."));
    }

    #[tokio::test]
    async fn recipe_keeps_model_object_verbatim() {
        let vision = MockVision::replying(
            r#"{"title":"","ingredients":[{"item":"tomato","qty":4}],"prepTime":15,"servings":2}"#,
        );
        let speech = MockSpeech::new(false);
        let out = handler(&vision, &speech)
            .get_recipe(Some("Tomato Soup"), None)
            .await
            .unwrap();

        assert!(!out.fallback);
        assert_eq!(out.value.title(), "Tomato Soup");
        assert_eq!(out.value.get("prepTime").and_then(|v| v.as_u64()), Some(15));
        assert_eq!(out.value.get("servings").and_then(|v| v.as_u64()), Some(2));
    }

    #[tokio::test]
    async fn analyze_food_rejects_bad_image_without_calling_vision() {
        let vision = MockVision::replying("unused");
        let speech = MockSpeech::new(false);
        let h = handler(&vision, &speech);

        for image in [None, Some(""), Some("no-comma")] {
            let err = h.analyze_food(image).await.unwrap_err();
            assert!(err.is_client_error(), "{image:?}");
        }
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failure_logs_hide_upstream_keys() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let vision = MockVision::failing(
            "error sending request for url (http://127.0.0.1:1/v1beta/models/gemini-1.5-flash-latest:generateContent?key=SECRETKEY123)",
        );
        let speech = MockSpeech::new(false);
        let err = handler(&vision, &speech)
            .narrate(narration(Some(FRAME), None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SECRETKEY123"));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Request failed"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("SECRETKEY123"));
    }

    #[tokio::test]
    async fn recipe_vision_failure_is_upstream() {
        let vision = MockVision::failing("connection reset");
        let speech = MockSpeech::new(false);
        let err = handler(&vision, &speech)
            .get_recipe(Some("Tomato Soup"), None)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Failed to get AI response");
    }
}
