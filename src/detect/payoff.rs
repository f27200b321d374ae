//! Payoff detector: a dramatic pause, then the room reacts.
//!
//! Scans for silence runs (energy well below the local baseline), then
//! inspects the following seconds for a sustained energy spike. The pause
//! plus the reaction, with setup context in front, is the clip.

use super::{ClipCandidate, PatternKind, clamp_duration, scan_regions};
use crate::config::PayoffConfig;
use crate::features::FeatureSet;
use std::collections::BTreeMap;

/// Weight of the silence-duration term in the pattern score.
const SILENCE_WEIGHT: f32 = 0.35;
/// Weight of the spike-intensity term.
const SPIKE_WEIGHT: f32 = 0.45;
/// Weight of the spike-sustain term.
const SUSTAIN_WEIGHT: f32 = 0.20;
/// Sustain length that earns full marks, in seconds.
const SUSTAIN_CAP_SECS: f32 = 2.0;

pub(super) fn detect(features: &FeatureSet, config: &PayoffConfig) -> Vec<ClipCandidate> {
    let hop = features.hop_secs;
    if hop <= 0.0 {
        return Vec::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_silence_frames = ((config.min_silence_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_silence_frames = ((config.max_silence_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lookahead_frames = ((config.lookahead_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_sustain_frames = ((config.min_sustain_secs / hop) as usize).max(1);

    let silences = scan_regions(features.len(), min_silence_frames, 0, |i| {
        features.energy_deviation(i) <= config.silence_threshold
    });

    let mut candidates = Vec::new();

    for silence in silences {
        if silence.len() > max_silence_frames {
            continue;
        }

        let Some(spike) = find_spike(
            features,
            silence.end,
            lookahead_frames,
            min_sustain_frames,
            config.spike_threshold,
        ) else {
            continue;
        };

        #[allow(clippy::cast_precision_loss)]
        let silence_secs = silence.len() as f32 * hop;
        #[allow(clippy::cast_precision_loss)]
        let sustain_secs = spike.sustain_frames as f32 * hop;

        let silence_score = (silence_secs / config.max_silence_secs).min(1.0) * 100.0;
        let spike_score = (spike.peak_deviation / (config.spike_threshold * 2.0)).min(1.0) * 100.0;
        let sustain_score = (sustain_secs / SUSTAIN_CAP_SECS).min(1.0) * 100.0;
        let score = (SILENCE_WEIGHT * silence_score
            + SPIKE_WEIGHT * spike_score
            + SUSTAIN_WEIGHT * sustain_score)
            .clamp(0.0, 100.0);

        #[allow(clippy::cast_precision_loss)]
        let silence_start = silence.start as f32 * hop;
        #[allow(clippy::cast_precision_loss)]
        let spike_end = spike.end_frame as f32 * hop;

        let raw_start = silence_start - config.pre_context_secs;
        let raw_end = spike_end + config.post_context_secs;
        let (start, end) = clamp_duration(
            raw_start,
            raw_end,
            config.min_clip_secs,
            config.max_clip_secs,
            features.duration_secs,
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("silence_secs".to_string(), silence_secs);
        metrics.insert("peak_deviation".to_string(), spike.peak_deviation);
        metrics.insert("sustain_secs".to_string(), sustain_secs);
        metrics.insert("silence_start".to_string(), silence_start);

        candidates.push(ClipCandidate {
            id: 0,
            pattern: PatternKind::Payoff,
            start,
            end,
            score,
            metrics,
        });
    }

    candidates
}

struct Spike {
    end_frame: usize,
    peak_deviation: f32,
    sustain_frames: usize,
}

/// Look for a sustained above-threshold spike after the silence.
fn find_spike(
    features: &FeatureSet,
    from: usize,
    lookahead_frames: usize,
    min_sustain_frames: usize,
    threshold: f32,
) -> Option<Spike> {
    let limit = (from + lookahead_frames).min(features.len());

    let mut i = from;
    while i < limit {
        if features.energy_deviation(i) >= threshold {
            // Measure how long the spike holds, past the lookahead if needed
            let mut j = i;
            let mut peak = 0.0f32;
            while j < features.len() && features.energy_deviation(j) >= threshold {
                peak = peak.max(features.energy_deviation(j));
                j += 1;
            }
            if j - i >= min_sustain_frames {
                return Some(Spike {
                    end_frame: j,
                    peak_deviation: peak,
                    sustain_frames: j - i,
                });
            }
            i = j;
        } else {
            i += 1;
        }
    }

    None
}
