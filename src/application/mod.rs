//! Application layer - Use cases and port interfaces

pub mod ports;
pub mod record;

pub use record::{RecordError, RecordLectureUseCase};
