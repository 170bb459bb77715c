//! Port interfaces (traits) for external collaborators

mod capture;
mod config;
mod storage;
mod transcription;

pub use capture::{AudioFrame, CaptureDevice, CaptureError, CaptureStream, FrameSink};
pub use config::ConfigStore;
pub use storage::{LectureStore, StorageError};
pub use transcription::{
    AudioFeed, EventStream, TranscriptionError, TranscriptionEvent, TranscriptionSource,
};
