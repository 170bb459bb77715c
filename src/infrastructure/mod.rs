//! Infrastructure layer - Adapter implementations

pub mod capture;
pub mod config;
pub mod storage;
pub mod transcription;

pub use capture::CpalCaptureDevice;
pub use config::XdgConfigStore;
pub use storage::JsonLectureStore;
pub use transcription::GeminiSpeechSource;
