//! Per-frame feature extraction (the feature cache).
//!
//! Everything downstream of this module reads one [`FeatureSet`], computed
//! once per recording and never mutated afterwards. All per-frame arrays
//! share a single length and time axis; the extractor truncates to the
//! shortest computed array to keep that invariant.

pub mod baseline;
mod spectral;
mod vad;

pub use vad::{
    EnergyDetector, SileroDetector, VoiceDetector, merge_segments, resolve_detector,
};

use crate::config::{FeatureConfig, VadConfig};
use crate::constants::BASELINE_EPSILON;
use crate::error::Result;
use baseline::{moving_average, rolling_median};
use std::ops::Range;
use tracing::debug;

/// A time interval judged to contain speech, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSegment {
    /// Segment start in seconds.
    pub start: f32,
    /// Segment end in seconds.
    pub end: f32,
}

impl SpeechSegment {
    /// Segment length in seconds.
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// All derived per-frame signals for one recording.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    /// Frame start times in seconds, monotonically increasing.
    pub times: Vec<f32>,
    /// Short-time RMS energy.
    pub energy: Vec<f32>,
    /// Moving-average smoothed energy.
    pub energy_smooth: Vec<f32>,
    /// Rolling-median energy baseline.
    pub energy_baseline: Vec<f32>,
    /// Spectral centroid in Hz.
    pub centroid: Vec<f32>,
    /// Rolling-median centroid baseline.
    pub centroid_baseline: Vec<f32>,
    /// Spectral flatness (0.0 tonal .. 1.0 noisy).
    pub flatness: Vec<f32>,
    /// Rolling-median flatness baseline.
    pub flatness_baseline: Vec<f32>,
    /// Zero-crossing rate (0.0 .. 1.0).
    pub zcr: Vec<f32>,
    /// Rolling-median zero-crossing baseline.
    pub zcr_baseline: Vec<f32>,
    /// Onset strength (positive spectral flux).
    pub onset: Vec<f32>,
    /// Rolling-median onset baseline.
    pub onset_baseline: Vec<f32>,
    /// Voice-activity mask per frame.
    pub voiced: Vec<bool>,
    /// Merged speech segments in seconds.
    pub segments: Vec<SpeechSegment>,
    /// Seconds between consecutive frames.
    pub hop_secs: f32,
    /// Total media duration in seconds.
    pub duration_secs: f32,
}

impl FeatureSet {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the recording produced no frames at all.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Frame index containing the given time, clamped into range.
    pub fn index_at(&self, time_secs: f32) -> usize {
        if self.is_empty() || self.hop_secs <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = (time_secs.max(0.0) / self.hop_secs) as usize;
        idx.min(self.len() - 1)
    }

    /// Frame index range covering `[start, end)` seconds, clamped.
    pub fn frame_range(&self, start_secs: f32, end_secs: f32) -> Range<usize> {
        if self.is_empty() || end_secs <= start_secs {
            return 0..0;
        }
        let lo = self.index_at(start_secs);
        let hi = self.index_at(end_secs) + 1;
        lo..hi.min(self.len())
    }

    /// Normalized deviation of a value from its local baseline.
    pub fn deviation(value: f32, baseline: f32) -> f32 {
        (value - baseline) / (baseline + BASELINE_EPSILON)
    }

    /// Energy deviation from baseline at a frame.
    pub fn energy_deviation(&self, i: usize) -> f32 {
        Self::deviation(self.energy_smooth[i], self.energy_baseline[i])
    }

    /// Onset deviation from baseline at a frame.
    pub fn onset_deviation(&self, i: usize) -> f32 {
        Self::deviation(self.onset[i], self.onset_baseline[i])
    }

    /// Fraction of voiced frames in a frame range.
    pub fn speech_ratio(&self, range: Range<usize>) -> f32 {
        if range.is_empty() {
            return 0.0;
        }
        let len = range.len();
        let voiced = self.voiced[range].iter().filter(|v| **v).count();
        #[allow(clippy::cast_precision_loss)]
        {
            voiced as f32 / len as f32
        }
    }

    /// Seconds of voiced audio in a frame range.
    pub fn speech_secs(&self, range: Range<usize>) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let voiced = self.voiced[range].iter().filter(|v| **v).count() as f32;
        voiced * self.hop_secs
    }
}

/// Extract all per-frame signals and speech segments for one recording.
///
/// Empty or too-short input degrades to an empty `FeatureSet`; it is never
/// an error. The voice detector has already been resolved by the caller.
pub fn extract(
    samples: &[f32],
    sample_rate: u32,
    config: &FeatureConfig,
    vad_config: &VadConfig,
    detector: &mut dyn VoiceDetector,
) -> Result<FeatureSet> {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    let hop = ((config.hop_secs * sample_rate as f32) as usize).max(1);

    let frames = samples.len() / hop;
    if frames == 0 {
        debug!("Recording too short for a single frame, returning empty features");
        return Ok(FeatureSet::default());
    }

    #[allow(clippy::cast_precision_loss)]
    let hop_secs = hop as f32 / sample_rate as f32;
    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f32 / sample_rate as f32;

    // Short-time RMS and zero-crossing rate over each hop, causal by
    // construction: frame i only sees samples [i*hop, (i+1)*hop).
    let mut energy = Vec::with_capacity(frames);
    let mut zcr = Vec::with_capacity(frames);
    for i in 0..frames {
        let chunk = &samples[i * hop..(i + 1) * hop];
        #[allow(clippy::cast_precision_loss)]
        let mean_sq = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
        energy.push(mean_sq.sqrt());

        let crossings = chunk
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        #[allow(clippy::cast_precision_loss)]
        zcr.push(crossings as f32 / (chunk.len() - 1).max(1) as f32);
    }

    let spectral = spectral::spectral_frames(samples, sample_rate, hop, frames);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let smoothing_frames = ((config.smoothing_secs / hop_secs) as usize).max(1);
    let energy_smooth = moving_average(&energy, smoothing_frames);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let baseline_frames = ((config.baseline_window_secs / hop_secs) as usize).max(3);

    let energy_baseline = rolling_median(&energy_smooth, baseline_frames);
    let centroid_baseline = rolling_median(&spectral.centroid, baseline_frames);
    let flatness_baseline = rolling_median(&spectral.flatness, baseline_frames);
    let zcr_baseline = rolling_median(&zcr, baseline_frames);
    let onset_baseline = rolling_median(&spectral.onset, baseline_frames);

    let raw_segments = detector.detect(samples, sample_rate)?;
    let segments = merge_segments(raw_segments, vad_config.merge_gap_secs);

    // The alignment invariant: every array shares the shortest length
    let len = frames
        .min(energy.len())
        .min(spectral.centroid.len())
        .min(spectral.flatness.len())
        .min(spectral.onset.len())
        .min(zcr.len());

    #[allow(clippy::cast_precision_loss)]
    let times: Vec<f32> = (0..len).map(|i| i as f32 * hop_secs).collect();

    let mut voiced = Vec::with_capacity(len);
    let mut seg_idx = 0;
    for i in 0..len {
        #[allow(clippy::cast_precision_loss)]
        let mid = (i as f32 + 0.5) * hop_secs;
        while seg_idx < segments.len() && segments[seg_idx].end <= mid {
            seg_idx += 1;
        }
        voiced.push(
            segments
                .get(seg_idx)
                .is_some_and(|s| s.start <= mid && mid < s.end),
        );
    }

    let truncate = |mut v: Vec<f32>| {
        v.truncate(len);
        v
    };

    debug!(
        frames = len,
        segments = segments.len(),
        hop_secs,
        "Extracted feature set"
    );

    Ok(FeatureSet {
        times,
        energy: truncate(energy),
        energy_smooth: truncate(energy_smooth),
        energy_baseline: truncate(energy_baseline),
        centroid: truncate(spectral.centroid),
        centroid_baseline: truncate(centroid_baseline),
        flatness: truncate(spectral.flatness),
        flatness_baseline: truncate(flatness_baseline),
        zcr: truncate(zcr),
        zcr_baseline: truncate(zcr_baseline),
        onset: truncate(spectral.onset),
        onset_baseline: truncate(onset_baseline),
        voiced,
        segments,
        hop_secs,
        duration_secs,
    })
}
