//! Voice activity detection.
//!
//! Two interchangeable detectors sit behind [`VoiceDetector`]: the Silero
//! model (via `voice_activity_detector`) and an energy-percentile fallback
//! for environments where the model cannot initialize. The choice is made
//! once at startup by [`resolve_detector`]; stages never fall back mid-run.

use crate::audio::resample;
use crate::config::{VadConfig, VadMode};
use crate::constants::{VAD_FRAME_SIZE, VAD_SAMPLE_RATE};
use crate::error::{Error, Result};
use crate::features::SpeechSegment;
use crate::features::baseline::percentile;
use tracing::{debug, info};
use voice_activity_detector::VoiceActivityDetector;

/// A voice activity detector producing speech segments in seconds.
pub trait VoiceDetector {
    /// Human-readable detector name for logs and output metadata.
    fn name(&self) -> &'static str;

    /// Detect speech segments in a mono recording.
    ///
    /// Segments are returned sorted and non-overlapping, not yet merged.
    fn detect(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<SpeechSegment>>;
}

/// Silero-model detector.
pub struct SileroDetector {
    vad: VoiceActivityDetector,
    threshold: f32,
}

impl SileroDetector {
    /// Initialize the Silero model at its required 16 kHz frame size.
    pub fn new(threshold: f32) -> Result<Self> {
        let vad = VoiceActivityDetector::builder()
            .sample_rate(i64::from(VAD_SAMPLE_RATE))
            .chunk_size(VAD_FRAME_SIZE)
            .build()
            .map_err(|e| Error::VadInit {
                reason: format!("{e:?}"),
            })?;

        Ok(Self { vad, threshold })
    }
}

impl VoiceDetector for SileroDetector {
    fn name(&self) -> &'static str {
        "silero"
    }

    fn detect(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<SpeechSegment>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let samples = resample(samples.to_vec(), sample_rate, VAD_SAMPLE_RATE)?;

        #[allow(clippy::cast_precision_loss)]
        let frame_secs = VAD_FRAME_SIZE as f32 / VAD_SAMPLE_RATE as f32;

        let mut voiced = Vec::with_capacity(samples.len() / VAD_FRAME_SIZE + 1);
        let mut frame = vec![0.0f32; VAD_FRAME_SIZE];
        for chunk in samples.chunks(VAD_FRAME_SIZE) {
            frame[..chunk.len()].copy_from_slice(chunk);
            frame[chunk.len()..].fill(0.0);
            let prob = self.vad.predict(frame.iter().copied());
            voiced.push(prob >= self.threshold);
        }

        Ok(mask_to_segments(&voiced, frame_secs))
    }
}

/// Energy-percentile fallback detector.
///
/// A frame counts as speech when its RMS clears both the configured
/// percentile of all frame energies and an absolute silence floor.
pub struct EnergyDetector {
    percentile: f32,
}

impl EnergyDetector {
    /// Absolute RMS below which a frame is never speech.
    const SILENCE_FLOOR: f32 = 1e-3;

    /// Analysis frame length in seconds.
    const FRAME_SECS: f32 = 0.05;

    /// Create a fallback detector thresholding at the given percentile.
    pub fn new(percentile: f32) -> Self {
        Self { percentile }
    }
}

impl VoiceDetector for EnergyDetector {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn detect(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<SpeechSegment>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            clippy::cast_possible_truncation
        )]
        let hop = ((Self::FRAME_SECS * sample_rate as f32) as usize).max(1);

        let rms: Vec<f32> = samples
            .chunks(hop)
            .map(|chunk| {
                #[allow(clippy::cast_precision_loss)]
                let mean_sq = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
                mean_sq.sqrt()
            })
            .collect();

        let threshold = percentile(&rms, self.percentile).max(Self::SILENCE_FLOOR);
        let voiced: Vec<bool> = rms.iter().map(|r| *r > threshold).collect();

        #[allow(clippy::cast_precision_loss)]
        let frame_secs = hop as f32 / sample_rate as f32;

        Ok(mask_to_segments(&voiced, frame_secs))
    }
}

/// Collect runs of voiced frames into time segments.
fn mask_to_segments(voiced: &[bool], frame_secs: f32) -> Vec<SpeechSegment> {
    let mut segments = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, is_voiced) in voiced.iter().enumerate() {
        match (run_start, is_voiced) {
            (None, true) => run_start = Some(i),
            (Some(start), false) => {
                #[allow(clippy::cast_precision_loss)]
                segments.push(SpeechSegment {
                    start: start as f32 * frame_secs,
                    end: i as f32 * frame_secs,
                });
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        #[allow(clippy::cast_precision_loss)]
        segments.push(SpeechSegment {
            start: start as f32 * frame_secs,
            end: voiced.len() as f32 * frame_secs,
        });
    }

    segments
}

/// Merge segments separated by less than `merge_gap_secs`.
pub fn merge_segments(mut segments: Vec<SpeechSegment>, merge_gap_secs: f32) -> Vec<SpeechSegment> {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<SpeechSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(last) if segment.start - last.end < merge_gap_secs => {
                last.end = last.end.max(segment.end);
            }
            _ => merged.push(segment),
        }
    }

    merged
}

/// Resolve the voice detector once, before the pipeline runs.
///
/// `Auto` probes the Silero model and falls back to the energy detector
/// if initialization fails; the decision is logged and final for the run.
pub fn resolve_detector(config: &VadConfig) -> Result<Box<dyn VoiceDetector>> {
    match config.mode {
        VadMode::Silero => Ok(Box::new(SileroDetector::new(config.threshold)?)),
        VadMode::Energy => Ok(Box::new(EnergyDetector::new(config.fallback_percentile))),
        VadMode::Auto => match SileroDetector::new(config.threshold) {
            Ok(detector) => {
                debug!("Using Silero voice activity detector");
                Ok(Box::new(detector))
            }
            Err(e) => {
                info!("Silero VAD unavailable ({e}), using energy fallback");
                Ok(Box::new(EnergyDetector::new(config.fallback_percentile)))
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_to_segments_basic() {
        let voiced = [false, true, true, false, true];
        let segments = mask_to_segments(&voiced, 0.5);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[0].end, 1.5);
        assert_eq!(segments[1].end, 2.5);
    }

    #[test]
    fn test_merge_segments_below_gap() {
        let segments = vec![
            SpeechSegment { start: 0.0, end: 1.0 },
            SpeechSegment { start: 1.2, end: 2.0 },
            SpeechSegment { start: 3.0, end: 4.0 },
        ];
        let merged = merge_segments(segments, 0.3);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].end, 2.0);
    }

    #[test]
    fn test_merge_segments_unsorted_input() {
        let segments = vec![
            SpeechSegment { start: 3.0, end: 4.0 },
            SpeechSegment { start: 0.0, end: 1.0 },
        ];
        let merged = merge_segments(segments, 0.1);
        assert_eq!(merged[0].start, 0.0);
    }

    #[test]
    fn test_energy_detector_finds_loud_region() {
        let sample_rate = 16_000;
        let mut samples = vec![0.0f32; sample_rate as usize];
        #[allow(clippy::cast_precision_loss)]
        samples.extend((0..sample_rate as usize).map(|i| {
            let t = i as f32 / sample_rate as f32;
            (t * 440.0 * std::f32::consts::TAU).sin() * 0.5
        }));
        samples.extend(vec![0.0f32; sample_rate as usize]);

        let mut detector = EnergyDetector::new(0.4);
        let segments = detector.detect(&samples, sample_rate).unwrap();

        assert!(!segments.is_empty());
        assert!(segments[0].start >= 0.9);
        assert!(segments.last().unwrap().end <= 2.1);
    }

    #[test]
    fn test_energy_detector_empty_input() {
        let mut detector = EnergyDetector::new(0.4);
        assert!(detector.detect(&[], 16_000).unwrap().is_empty());
    }

    #[test]
    fn test_energy_detector_all_silence() {
        let samples = vec![0.0f32; 32_000];
        let mut detector = EnergyDetector::new(0.4);
        assert!(detector.detect(&samples, 16_000).unwrap().is_empty());
    }
}
