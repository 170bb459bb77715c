//! Cross-platform microphone capture using cpal
//!
//! The cpal stream lives on a dedicated background thread because
//! `cpal::Stream` is not Send; the handle communicates with it through
//! atomics and a shared frame sink. The callback reduces each buffer to a
//! single loudness scalar and forwards mono frames to whatever sink is
//! currently attached.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::oneshot;

use crate::application::ports::{
    AudioFrame, CaptureDevice, CaptureError, CaptureStream, FrameSink,
};

/// Mean absolute sample magnitude treated as full loudness (100). Speech
/// rarely exceeds a quarter of the i16 range even close to the mic.
const LEVEL_FULL_SCALE: f32 = 8192.0;

/// Shared state between the capture thread and the stream handle
struct Shared {
    level: AtomicU8,
    active: AtomicBool,
    open: AtomicBool,
    sink: StdMutex<Option<FrameSink>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            level: AtomicU8::new(0),
            active: AtomicBool::new(true),
            open: AtomicBool::new(true),
            sink: StdMutex::new(None),
        }
    }

    /// Called from the audio callback with one mono buffer
    fn ingest(&self, samples: Vec<i16>, sample_rate: u32) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        self.level
            .store(compute_level(&samples), Ordering::SeqCst);
        if let Ok(sink) = self.sink.lock() {
            if let Some(tx) = sink.as_ref() {
                let _ = tx.send(AudioFrame {
                    samples,
                    sample_rate,
                });
            }
        }
    }
}

/// Reduce a buffer to a 0-100 loudness scalar: arithmetic mean of absolute
/// sample magnitudes, normalized against `LEVEL_FULL_SCALE`.
fn compute_level(samples: &[i16]) -> u8 {
    if samples.is_empty() {
        return 0;
    }
    let mean = samples
        .iter()
        .map(|&s| (s as f32).abs())
        .sum::<f32>()
        / samples.len() as f32;
    ((mean / LEVEL_FULL_SCALE) * 100.0).min(100.0) as u8
}

/// Mix stereo (or more channels) down to mono
fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels == 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Live microphone stream handle backed by a cpal capture thread
pub struct CpalCaptureStream {
    shared: Arc<Shared>,
}

impl CaptureStream for CpalCaptureStream {
    fn level(&self) -> u8 {
        self.shared.level.load(Ordering::SeqCst)
    }

    fn attach_sink(&self, sink: FrameSink) {
        if let Ok(mut slot) = self.shared.sink.lock() {
            *slot = Some(sink);
        }
    }

    fn detach_sink(&self) {
        if let Ok(mut slot) = self.shared.sink.lock() {
            *slot = None;
        }
    }

    fn suspend(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.shared.active.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        // The capture thread watches this flag and drops the cpal stream
        self.shared.open.store(false, Ordering::SeqCst);
        self.detach_sink();
    }
}

impl Drop for CpalCaptureStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Microphone capture adapter using cpal
pub struct CpalCaptureDevice;

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self
    }

    /// Get the default input device
    fn input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)
    }

    /// Pick a workable input configuration, preferring mono i16/f32
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| map_device_error(&e.to_string()))?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }
            let is_better = match &best {
                None => true,
                Some(current) => config.channels() < current.channels(),
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or_else(|| {
            CaptureError::StreamFailed("no suitable input config found".to_string())
        })?;

        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate: range.min_sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        Ok((config, sample_format))
    }

    /// Run the capture stream until the handle is closed
    fn capture_thread(
        shared: Arc<Shared>,
        ready: oneshot::Sender<Result<(), CaptureError>>,
    ) {
        let device = match Self::input_device() {
            Ok(device) => device,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        let (config, sample_format) = match Self::input_config(&device) {
            Ok(pair) => pair,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let stream_result = match sample_format {
            SampleFormat::I16 => {
                let shared = Arc::clone(&shared);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        shared.ingest(mix_to_mono(data, channels), sample_rate);
                    },
                    |err| tracing::warn!(%err, "audio stream error"),
                    None,
                )
            }
            SampleFormat::F32 => {
                let shared = Arc::clone(&shared);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        shared.ingest(mix_to_mono(&i16_data, channels), sample_rate);
                    },
                    |err| tracing::warn!(%err, "audio stream error"),
                    None,
                )
            }
            _ => {
                let _ = ready.send(Err(CaptureError::StreamFailed(
                    "unsupported sample format".to_string(),
                )));
                return;
            }
        };

        let stream = match stream_result {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(map_device_error(&e.to_string())));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready.send(Err(map_device_error(&e.to_string())));
            return;
        }

        let _ = ready.send(Ok(()));

        while shared.open.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(100));
        }

        drop(stream);
    }
}

impl Default for CpalCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a backend error message into the capture taxonomy
fn map_device_error(message: &str) -> CaptureError {
    let lowered = message.to_lowercase();
    if lowered.contains("permission") || lowered.contains("denied") {
        CaptureError::PermissionDenied
    } else if lowered.contains("device") && lowered.contains("available") {
        CaptureError::DeviceUnavailable
    } else {
        CaptureError::StreamFailed(message.to_string())
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>, CaptureError> {
        let shared = Arc::new(Shared::new());
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread_shared = Arc::clone(&shared);
        std::thread::spawn(move || {
            Self::capture_thread(thread_shared, ready_tx);
        });

        match ready_rx.await {
            Ok(Ok(())) => Ok(Arc::new(CpalCaptureStream { shared })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CaptureError::StreamFailed(
                "capture thread exited before reporting readiness".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(mix_to_mono(&mono, 1), mono);
    }

    #[test]
    fn mix_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(mix_to_mono(&stereo, 2), vec![150, 350]); // Average of each pair
    }

    #[test]
    fn level_of_silence_is_zero() {
        assert_eq!(compute_level(&[0i16; 480]), 0);
        assert_eq!(compute_level(&[]), 0);
    }

    #[test]
    fn level_is_capped_at_hundred() {
        assert_eq!(compute_level(&[i16::MAX; 480]), 100);
    }

    #[test]
    fn level_scales_with_magnitude() {
        let quiet = compute_level(&[800i16; 480]);
        let loud = compute_level(&[8000i16; 480]);
        assert!(quiet < loud);
        assert!(loud <= 100);
    }

    #[test]
    fn suspended_stream_holds_level_and_drops_frames() {
        let shared = Arc::new(Shared::new());
        let handle = CpalCaptureStream {
            shared: Arc::clone(&shared),
        };
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        handle.attach_sink(tx);

        shared.ingest(vec![8000i16; 100], 16000);
        let before = handle.level();
        assert!(before > 0);
        assert!(rx.try_recv().is_ok());

        handle.suspend();
        shared.ingest(vec![0i16; 100], 16000);
        assert_eq!(handle.level(), before);
        assert!(rx.try_recv().is_err());

        handle.resume();
        shared.ingest(vec![0i16; 100], 16000);
        assert_eq!(handle.level(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let handle = CpalCaptureStream {
            shared: Arc::new(Shared::new()),
        };
        handle.close();
        handle.close();
        assert!(!handle.shared.open.load(Ordering::SeqCst));
    }

    #[test]
    fn error_message_mapping() {
        assert!(matches!(
            map_device_error("Access permission denied by user"),
            CaptureError::PermissionDenied
        ));
        assert!(matches!(
            map_device_error("the requested device is no longer available"),
            CaptureError::DeviceUnavailable
        ));
        assert!(matches!(
            map_device_error("something else went wrong"),
            CaptureError::StreamFailed(_)
        ));
    }
}
