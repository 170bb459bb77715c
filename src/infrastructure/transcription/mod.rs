//! Transcription adapters

mod audio;
mod gemini;

pub use audio::{prepare_window, AudioPrepError, TARGET_SAMPLE_RATE};
pub use gemini::GeminiSpeechSource;
