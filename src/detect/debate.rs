//! Debate detector: rapid back-and-forth speaker exchanges.
//!
//! Works on the speech segments rather than frame signals. A cluster of
//! segments separated by very short gaps reads as turn-taking, and a
//! cluster with enough turns over a long enough window becomes a
//! candidate.

use super::{ClipCandidate, PatternKind, clamp_duration};
use crate::config::DebateConfig;
use crate::features::FeatureSet;
use std::collections::BTreeMap;

/// Weight of the turn-count term.
const TURNS_WEIGHT: f32 = 0.35;
/// Weight of the gap-tightness term.
const TIGHTNESS_WEIGHT: f32 = 0.25;
/// Weight of the mean energy-deviation term.
const ENERGY_WEIGHT: f32 = 0.20;
/// Weight of the onset-variability term.
const VARIABILITY_WEIGHT: f32 = 0.20;
/// Turn count that earns full marks.
const TURNS_CAP: f32 = 12.0;
/// Onset variance-to-mean ratio that earns full marks.
const VARIABILITY_CAP: f32 = 2.0;

struct Cluster {
    /// Index range into `features.segments`, end exclusive.
    first: usize,
    last: usize,
    start: f32,
    end: f32,
}

impl Cluster {
    fn turns(&self) -> usize {
        self.last - self.first
    }

    fn span(&self) -> f32 {
        self.end - self.start
    }
}

/// Groups consecutive speech segments whose gaps stay at or below
/// `max_gap_secs` into exchange clusters.
fn cluster_segments(features: &FeatureSet, max_gap_secs: f32) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for (i, segment) in features.segments.iter().enumerate() {
        if let Some(current) = clusters.last_mut()
            && segment.start - current.end <= max_gap_secs
        {
            current.last = i + 1;
            current.end = segment.end;
            continue;
        }
        clusters.push(Cluster {
            first: i,
            last: i + 1,
            start: segment.start,
            end: segment.end,
        });
    }

    clusters
}

pub(super) fn detect(features: &FeatureSet, config: &DebateConfig) -> Vec<ClipCandidate> {
    if features.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();

    for cluster in cluster_segments(features, config.max_gap_secs) {
        if cluster.span() < config.min_window_secs || cluster.turns() < config.min_turns {
            continue;
        }

        let gaps: Vec<f32> = (cluster.first..cluster.last - 1)
            .map(|i| (features.segments[i + 1].start - features.segments[i].end).max(0.0))
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let mean_gap = if gaps.is_empty() {
            0.0
        } else {
            gaps.iter().sum::<f32>() / gaps.len() as f32
        };

        let frames = features.frame_range(cluster.start, cluster.end);
        let (lo, hi) = (frames.start, frames.end);
        #[allow(clippy::cast_precision_loss)]
        let span_frames = (hi - lo).max(1) as f32;
        let mean_energy_dev = (lo..hi)
            .map(|i| features.energy_deviation(i).max(0.0))
            .sum::<f32>()
            / span_frames;
        let mean_onset = features.onset[lo..hi].iter().sum::<f32>() / span_frames;
        let onset_var = features.onset[lo..hi]
            .iter()
            .map(|v| (v - mean_onset).powi(2))
            .sum::<f32>()
            / span_frames;
        let variability = if mean_onset > 0.0 {
            onset_var / mean_onset
        } else {
            0.0
        };

        #[allow(clippy::cast_precision_loss)]
        let turns_score = (cluster.turns() as f32 / TURNS_CAP).min(1.0) * 100.0;
        let tightness_score = (1.0 - mean_gap / config.max_gap_secs).clamp(0.0, 1.0) * 100.0;
        let energy_score = mean_energy_dev.clamp(0.0, 1.0) * 100.0;
        let variability_score = (variability / VARIABILITY_CAP).clamp(0.0, 1.0) * 100.0;

        let score = (TURNS_WEIGHT * turns_score
            + TIGHTNESS_WEIGHT * tightness_score
            + ENERGY_WEIGHT * energy_score
            + VARIABILITY_WEIGHT * variability_score)
            .clamp(0.0, 100.0);

        let (start, end) = clamp_duration(
            cluster.start - config.pre_context_secs,
            cluster.end + config.post_context_secs,
            config.min_clip_secs,
            config.max_clip_secs,
            features.duration_secs,
        );

        let mut metrics = BTreeMap::new();
        #[allow(clippy::cast_precision_loss)]
        metrics.insert("turns".to_string(), cluster.turns() as f32);
        metrics.insert("mean_gap_secs".to_string(), mean_gap);
        metrics.insert("window_secs".to_string(), cluster.span());
        metrics.insert("onset_variability".to_string(), variability);

        candidates.push(ClipCandidate {
            id: 0,
            pattern: PatternKind::Debate,
            start,
            end,
            score,
            metrics,
        });
    }

    candidates
}
