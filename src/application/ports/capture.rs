//! Audio capture port interfaces

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Microphone access was denied")]
    PermissionDenied,

    #[error("No audio input device available")]
    DeviceUnavailable,

    #[error("Failed to open capture stream: {0}")]
    StreamFailed(String),
}

/// A chunk of mono PCM samples as delivered by the capture callback,
/// at the device sample rate.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// Destination for captured frames; attached by the session while a
/// transcription source is consuming audio.
pub type FrameSink = mpsc::UnboundedSender<AudioFrame>;

/// A live microphone stream handle.
///
/// The handle owns the underlying device resources; implementations must
/// release them exactly once, on `close()` or on drop, whichever comes
/// first.
pub trait CaptureStream: Send + Sync {
    /// Latest loudness estimate, 0-100. Holds its last value while
    /// suspended.
    fn level(&self) -> u8;

    /// Route captured frames to the given sink, replacing any previous one
    fn attach_sink(&self, sink: FrameSink);

    /// Stop routing frames
    fn detach_sink(&self);

    /// Suspend level metering and frame delivery without releasing the
    /// device
    fn suspend(&self);

    /// Resume metering and frame delivery after a suspend
    fn resume(&self);

    /// Release the capture device. Idempotent.
    fn close(&self);
}

/// Port for acquiring microphone access
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Request microphone access and start capturing.
    ///
    /// # Returns
    /// A live stream handle, or `PermissionDenied` / `DeviceUnavailable`
    /// when the microphone cannot be acquired.
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>, CaptureError>;
}
