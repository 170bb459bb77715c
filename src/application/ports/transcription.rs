//! Transcription source port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::capture::AudioFrame;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("No transcription engine available. Set GEMINI_API_KEY or configure api_key")]
    UnsupportedEnvironment,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl TranscriptionError {
    /// Transient errors are absorbed by the source and never interrupt a
    /// recording; fatal ones end the event stream.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedEnvironment | Self::InvalidApiKey)
    }
}

/// One recognition event.
///
/// Per utterance a source emits zero or more `Interim` events followed by
/// exactly one `Final`; delivery order matches utterance order.
#[derive(Debug, Clone)]
pub enum TranscriptionEvent {
    /// Provisional text, still subject to revision
    Interim(String),
    /// Authoritative text for one utterance
    Final(String),
    /// The source hit a fatal error and will emit nothing further
    Failed(TranscriptionError),
    /// The source stopped emitting (input exhausted or engine shut down)
    Ended,
}

/// Captured audio frames flowing into a source
pub type AudioFeed = mpsc::UnboundedReceiver<AudioFrame>;

/// Recognition events flowing out of a source
pub type EventStream = mpsc::UnboundedReceiver<TranscriptionEvent>;

/// Port for continuous, incremental speech-to-text
#[async_trait]
pub trait TranscriptionSource: Send + Sync {
    /// Begin recognizing speech from the given audio feed.
    ///
    /// # Returns
    /// The event stream for this run, or an error when no engine is
    /// available. May be called again after `stop()` to begin a new run.
    async fn start(&self, feed: AudioFeed) -> Result<EventStream, TranscriptionError>;

    /// Stop emitting events. Does not destroy the engine; a later `start`
    /// begins a fresh run.
    async fn stop(&self);
}
