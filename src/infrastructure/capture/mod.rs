//! Audio capture adapters

mod cpal;

pub use self::cpal::{CpalCaptureDevice, CpalCaptureStream};
