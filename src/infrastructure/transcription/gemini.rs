//! Gemini-backed continuous transcription source
//!
//! The Gemini API is request/response, not streaming, so continuity is
//! approximated by windowing: captured frames accumulate into fixed-length
//! windows, each window is FLAC-encoded and transcribed, and every
//! recognized window is emitted as one final event. The adapter emits no
//! interim events; the source contract permits zero interims per utterance.
//!
//! Transient failures (network hiccups, rate limits, silent windows) are
//! absorbed here: the window is skipped, logged, and recognition continues.
//! Fatal failures (bad credentials) emit a `Failed` event and end the run.

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::ports::{
    AudioFeed, EventStream, TranscriptionError, TranscriptionEvent, TranscriptionSource,
};

use super::audio::prepare_window;

/// Gemini API model to use
const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Request types for Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Option<SystemInstruction>,
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

// Response types for Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ApiError {
    message: String,
    status: Option<String>,
    code: Option<i32>,
}

/// Continuous transcription source backed by the Gemini API
pub struct GeminiSpeechSource {
    api_key: Option<String>,
    model: String,
    language: String,
    chunk_seconds: u64,
    base_url: String,
    client: reqwest::Client,
    worker: StdMutex<Option<JoinHandle<()>>>,
}

impl GeminiSpeechSource {
    /// Create a new source. The API key may be absent; starting then fails
    /// with `UnsupportedEnvironment`, detectable before recording begins.
    pub fn new(api_key: Option<String>, language: impl Into<String>, chunk_seconds: u64) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            language: language.into(),
            chunk_seconds: chunk_seconds.max(1),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            worker: StdMutex::new(None),
        }
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether an engine is available at all
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        let key = self.api_key.as_deref().unwrap_or_default();
        format!("{}/{}:generateContent?key={}", self.base_url, self.model, key)
    }

    /// System instruction pinning the engine to verbatim transcription in
    /// the configured language
    fn transcription_prompt(language: &str) -> String {
        format!(
            "You are a lecture transcription engine. Transcribe the spoken audio \
             verbatim in {}. Output only the transcript text with natural sentence \
             punctuation. If no speech is present, output nothing.",
            language
        )
    }

    /// Build the request body for one audio window
    fn build_request(flac: &[u8], language: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "audio/flac".to_string(),
                        data: BASE64.encode(flac),
                    }),
                }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![TextPart {
                    text: Self::transcription_prompt(language),
                }],
            }),
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: 0, // Disable thinking for faster response
                }),
            }),
        }
    }

    /// Extract text from response
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }

    /// Transcribe one accumulated window. `Ok(None)` means the window held
    /// no recognizable speech.
    async fn transcribe_window(
        client: &reqwest::Client,
        url: &str,
        language: &str,
        samples: &[i16],
        sample_rate: u32,
    ) -> Result<Option<String>, TranscriptionError> {
        let flac = prepare_window(samples, sample_rate)
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;
        let body = Self::build_request(&flac, language);

        let response = client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(TranscriptionError::ApiError(error.message));
        }

        Ok(Self::extract_text(&response)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    /// Accumulate frames into windows and emit one final event per
    /// recognized window, until the feed closes.
    async fn run_recognition(
        client: reqwest::Client,
        url: String,
        language: String,
        chunk_seconds: u64,
        mut feed: AudioFeed,
        events: mpsc::UnboundedSender<TranscriptionEvent>,
    ) {
        let mut window: Vec<i16> = Vec::new();
        let mut window_rate: u32 = 0;

        while let Some(frame) = feed.recv().await {
            if frame.sample_rate != window_rate {
                // First frame, or the device rate changed under us
                window.clear();
                window_rate = frame.sample_rate;
            }
            window.extend_from_slice(&frame.samples);

            let target = window_rate as usize * chunk_seconds as usize;
            if window.len() < target {
                continue;
            }

            let samples = std::mem::take(&mut window);
            match Self::transcribe_window(&client, &url, &language, &samples, window_rate).await
            {
                Ok(Some(text)) => {
                    if events.send(TranscriptionEvent::Final(text)).is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    debug!("window held no recognizable speech");
                }
                Err(error) if error.is_fatal() => {
                    warn!(%error, "fatal transcription error");
                    let _ = events.send(TranscriptionEvent::Failed(error));
                    return;
                }
                Err(error) => {
                    warn!(%error, "transient transcription error, window skipped");
                }
            }
        }

        // Any partial window left at this point belongs to an utterance that
        // was never finalized; it is discarded, not transcribed.
        let _ = events.send(TranscriptionEvent::Ended);
    }
}

#[async_trait]
impl TranscriptionSource for GeminiSpeechSource {
    async fn start(&self, feed: AudioFeed) -> Result<EventStream, TranscriptionError> {
        if !self.is_available() {
            return Err(TranscriptionError::UnsupportedEnvironment);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run_recognition(
            self.client.clone(),
            self.api_url(),
            self.language.clone(),
            self.chunk_seconds,
            feed,
            tx,
        ));

        if let Ok(mut worker) = self.worker.lock() {
            if let Some(previous) = worker.replace(handle) {
                previous.abort();
            }
        }
        Ok(rx)
    }

    async fn stop(&self) {
        if let Ok(mut worker) = self.worker.lock() {
            if let Some(handle) = worker.take() {
                handle.abort();
            }
        }
    }
}
