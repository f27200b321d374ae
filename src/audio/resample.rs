//! Audio resampling using rubato.
//!
//! Only the VAD path needs this: the Silero model expects 16 kHz input,
//! while feature extraction runs at the recording's native rate.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Resample mono audio to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let chunk_size = 1024;
    let sub_chunks = 1;
    let channels = 1;

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        chunk_size,
        sub_chunks,
        channels,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let input_frames_needed = resampler.input_frames_next();
    let mut output = Vec::with_capacity(estimate_output_len(samples.len(), from_rate, to_rate));

    let mut pos = 0;
    while pos + input_frames_needed <= samples.len() {
        let chunk = &samples[pos..pos + input_frames_needed];
        let input_adapter =
            SequentialSlice::new(chunk, channels, input_frames_needed).map_err(|e| {
                Error::Resample {
                    reason: format!("failed to create input adapter: {e}"),
                }
            })?;

        let resampled =
            resampler
                .process(&input_adapter, 0, None)
                .map_err(|e| Error::Resample {
                    reason: e.to_string(),
                })?;

        let output_data = resampled.take_data();
        output.extend_from_slice(&output_data);
        pos += input_frames_needed;
    }

    // Pad the trailing partial chunk and keep only the proportional output
    if pos < samples.len() {
        let remaining = samples.len() - pos;
        let mut padded = samples[pos..].to_vec();
        padded.resize(input_frames_needed, 0.0);

        let input_adapter =
            SequentialSlice::new(&padded, channels, input_frames_needed).map_err(|e| {
                Error::Resample {
                    reason: format!("failed to create input adapter: {e}"),
                }
            })?;

        let resampled =
            resampler
                .process(&input_adapter, 0, None)
                .map_err(|e| Error::Resample {
                    reason: e.to_string(),
                })?;

        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let output_frames =
            (remaining as f64 * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize;

        let output_data = resampled.take_data();
        let take_count = output_frames.min(output_data.len());
        output.extend_from_slice(&output_data[..take_count]);
    }

    Ok(output)
}

/// Estimate output length after resampling.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn estimate_output_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize + 1024
}
