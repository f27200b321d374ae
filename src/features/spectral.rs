//! Windowed-spectrum features via rustfft.
//!
//! Frames are causal: the FFT window ends at the frame boundary and is
//! zero-padded on the left for early frames, so no feature ever looks ahead
//! of its own timestamp.

use crate::constants::FFT_SIZE;
use rustfft::{FftPlanner, num_complex::Complex};

/// Per-frame spectral measurements.
#[derive(Debug, Clone, Default)]
pub struct SpectralFrames {
    /// Spectral centroid per frame, in Hz.
    pub centroid: Vec<f32>,
    /// Spectral flatness per frame (0.0 tonal .. 1.0 noisy).
    pub flatness: Vec<f32>,
    /// Onset strength per frame (positive spectral flux).
    pub onset: Vec<f32>,
}

/// Compute centroid, flatness, and onset strength for each hop.
pub fn spectral_frames(samples: &[f32], sample_rate: u32, hop: usize, frames: usize) -> SpectralFrames {
    if frames == 0 || hop == 0 {
        return SpectralFrames::default();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);

    // Hann window, precomputed once
    #[allow(clippy::cast_precision_loss)]
    let window: Vec<f32> = (0..FFT_SIZE)
        .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (FFT_SIZE as f32 - 1.0)).cos()))
        .collect();

    let bins = FFT_SIZE / 2 + 1;
    #[allow(clippy::cast_precision_loss)]
    let bin_hz = sample_rate as f32 / FFT_SIZE as f32;

    let mut out = SpectralFrames {
        centroid: Vec::with_capacity(frames),
        flatness: Vec::with_capacity(frames),
        onset: Vec::with_capacity(frames),
    };

    let mut buffer = vec![Complex::new(0.0f32, 0.0); FFT_SIZE];
    let mut prev_mags: Option<Vec<f32>> = None;

    for frame in 0..frames {
        let end = ((frame + 1) * hop).min(samples.len());
        let start = end.saturating_sub(FFT_SIZE);
        let slice = &samples[start..end];

        // Left-pad so the window always ends at the frame boundary
        let pad = FFT_SIZE - slice.len();
        for (i, value) in buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { slice[i - pad] };
            *value = Complex::new(sample * window[i], 0.0);
        }

        fft.process(&mut buffer);

        let mags: Vec<f32> = buffer[..bins].iter().map(|c| c.norm()).collect();

        out.centroid.push(centroid_hz(&mags, bin_hz));
        out.flatness.push(flatness_ratio(&mags));
        out.onset.push(positive_flux(&mags, prev_mags.as_deref()));

        prev_mags = Some(mags);
    }

    out
}

/// Magnitude-weighted mean frequency in Hz.
fn centroid_hz(mags: &[f32], bin_hz: f32) -> f32 {
    let total: f32 = mags.iter().sum();
    if total <= f32::EPSILON {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let weighted: f32 = mags
        .iter()
        .enumerate()
        .map(|(i, m)| i as f32 * bin_hz * m)
        .sum();
    weighted / total
}

/// Geometric over arithmetic mean of the magnitude spectrum.
fn flatness_ratio(mags: &[f32]) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let n = mags.len() as f32;
    let arith = mags.iter().sum::<f32>() / n;
    if arith <= f32::EPSILON {
        return 0.0;
    }

    let log_mean = mags.iter().map(|m| (m + 1e-10).ln()).sum::<f32>() / n;
    (log_mean.exp() / arith).clamp(0.0, 1.0)
}

/// Sum of positive magnitude increases since the previous frame.
fn positive_flux(mags: &[f32], prev: Option<&[f32]>) -> f32 {
    let Some(prev) = prev else {
        return 0.0;
    };

    #[allow(clippy::cast_precision_loss)]
    let n = mags.len() as f32;
    mags.iter()
        .zip(prev)
        .map(|(m, p)| (m - p).max(0.0))
        .sum::<f32>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let n = (secs * sample_rate as f32) as usize;
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f32 / sample_rate as f32;
                (t * freq * std::f32::consts::TAU).sin()
            })
            .collect()
    }

    #[test]
    fn test_centroid_tracks_tone_frequency() {
        let sample_rate = 16_000;
        let samples = tone(2000.0, sample_rate, 1.0);
        let frames = samples.len() / 800;
        let spec = spectral_frames(&samples, sample_rate, 800, frames);

        // Skip warm-up frames still dominated by left padding
        let late = &spec.centroid[4..];
        let mean = late.iter().sum::<f32>() / late.len() as f32;
        assert!((mean - 2000.0).abs() < 300.0, "centroid {mean} far from 2 kHz");
    }

    #[test]
    fn test_tone_is_less_flat_than_noise() {
        let sample_rate = 16_000;
        let tone_samples = tone(1000.0, sample_rate, 0.5);
        // Deterministic pseudo-noise
        let noise: Vec<f32> = (0..tone_samples.len())
            .map(|i| ((i * 2_654_435_761) % 10_007) as f32 / 10_007.0 - 0.5)
            .collect();

        let frames = tone_samples.len() / 800;
        let tone_spec = spectral_frames(&tone_samples, sample_rate, 800, frames);
        let noise_spec = spectral_frames(&noise, sample_rate, 800, frames);

        let tone_flat = tone_spec.flatness[frames - 1];
        let noise_flat = noise_spec.flatness[frames - 1];
        assert!(tone_flat < noise_flat);
    }

    #[test]
    fn test_onset_fires_on_energy_arrival() {
        let sample_rate = 16_000;
        let mut samples = vec![0.0f32; 8000];
        samples.extend(tone(1000.0, sample_rate, 0.5));

        let frames = samples.len() / 800;
        let spec = spectral_frames(&samples, sample_rate, 800, frames);

        // Onset at the silence->tone transition beats onsets inside silence
        let transition = 8000 / 800;
        let silent_max = spec.onset[1..transition - 1]
            .iter()
            .fold(0.0f32, |a, v| a.max(*v));
        assert!(spec.onset[transition] > silent_max);
    }

    #[test]
    fn test_empty_input() {
        let spec = spectral_frames(&[], 16_000, 800, 0);
        assert!(spec.centroid.is_empty());
    }
}
