//! Audio window preparation for the transcription API
//!
//! Gemini accepts FLAC; every accumulated window is resampled to a
//! speech-optimized 16kHz mono track and losslessly encoded before upload.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use rubato::{FftFixedIn, Resampler};

/// Target sample rate for speech-optimized encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Number of channels (mono)
const CHANNELS: usize = 1;

/// Audio preparation errors
#[derive(Debug, thiserror::Error)]
pub enum AudioPrepError {
    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),
}

/// Resample a mono window to 16kHz and encode it as FLAC bytes
pub fn prepare_window(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioPrepError> {
    let resampled = resample_to_16k(samples, sample_rate)?;
    encode_flac(&resampled)
}

/// Resample mono audio from the device rate to 16kHz if needed
fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, AudioPrepError> {
    if source_rate == TARGET_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        1024, // Chunk size
        2,    // Sub-chunks
        1,    // Mono
    )
    .map_err(|e| AudioPrepError::Resample(format!("resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());
        let mut chunk = samples_f32[input_pos..end_pos].to_vec();
        // Pad the tail so the final chunk still fills the FFT frame
        if chunk.len() < frames_needed {
            chunk.resize(frames_needed, 0.0);
        }

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioPrepError::Resample(e.to_string()))?;

        output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}

/// Encode mono 16kHz PCM samples to FLAC
fn encode_flac(pcm_samples: &[i16]) -> Result<Vec<u8>, AudioPrepError> {
    // flacenc works on i32 samples
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| AudioPrepError::Encode(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS,
        BITS_PER_SAMPLE,
        TARGET_SAMPLE_RATE as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| AudioPrepError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| AudioPrepError::Encode(e.to_string()))?;

    Ok(sink.into_inner())
}
