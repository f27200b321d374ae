//! Monologue detector: sustained, dense, emphatic speech.

use super::{ClipCandidate, PatternKind, clamp_duration, scan_regions};
use crate::config::MonologueConfig;
use crate::features::FeatureSet;
use crate::features::baseline::moving_average;
use std::collections::BTreeMap;

/// Weight of the mean energy-deviation term.
const ENERGY_WEIGHT: f32 = 0.30;
/// Weight of the mean onset-deviation (pace) term.
const PACE_WEIGHT: f32 = 0.20;
/// Weight of the speech-density term.
const DENSITY_WEIGHT: f32 = 0.20;
/// Weight of the duration term.
const DURATION_WEIGHT: f32 = 0.30;
/// Energy deviation that earns full marks.
const ENERGY_CAP: f32 = 0.5;
/// Onset deviation that earns full marks.
const PACE_CAP: f32 = 1.0;

pub(super) fn detect(features: &FeatureSet, config: &MonologueConfig) -> Vec<ClipCandidate> {
    let hop = features.hop_secs;
    if hop <= 0.0 {
        return Vec::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let density_frames = ((config.density_window_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_frames = ((config.min_region_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let gap_frames = (config.gap_tolerance_secs / hop) as usize;

    // Rolling speech density over the voiced mask
    let mask: Vec<f32> = features
        .voiced
        .iter()
        .map(|v| if *v { 1.0 } else { 0.0 })
        .collect();
    let density = moving_average(&mask, density_frames);

    let regions = scan_regions(features.len(), min_frames, gap_frames, |i| {
        features.energy_deviation(i) >= config.energy_threshold
            && density[i] >= config.density_threshold
    });

    let mut candidates = Vec::new();

    for region in regions {
        #[allow(clippy::cast_precision_loss)]
        let span = region.len() as f32;

        let mean_energy_dev = (region.start..region.end)
            .map(|i| features.energy_deviation(i))
            .sum::<f32>()
            / span;
        let mean_onset_dev = (region.start..region.end)
            .map(|i| features.onset_deviation(i).max(0.0))
            .sum::<f32>()
            / span;
        let mean_density = density[region.start..region.end].iter().sum::<f32>() / span;
        let duration_secs = span * hop;

        let energy_score = (mean_energy_dev / ENERGY_CAP).clamp(0.0, 1.0) * 100.0;
        let pace_score = (mean_onset_dev / PACE_CAP).clamp(0.0, 1.0) * 100.0;
        let density_score = mean_density.clamp(0.0, 1.0) * 100.0;
        let duration_score = (duration_secs / config.duration_cap_secs).min(1.0) * 100.0;

        let score = (ENERGY_WEIGHT * energy_score
            + PACE_WEIGHT * pace_score
            + DENSITY_WEIGHT * density_score
            + DURATION_WEIGHT * duration_score)
            .clamp(0.0, 100.0);

        #[allow(clippy::cast_precision_loss)]
        let region_start = region.start as f32 * hop;
        #[allow(clippy::cast_precision_loss)]
        let region_end = region.end as f32 * hop;

        let (start, end) = clamp_duration(
            region_start - config.pre_context_secs,
            region_end + config.post_context_secs,
            config.min_clip_secs,
            config.max_clip_secs,
            features.duration_secs,
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("mean_energy_deviation".to_string(), mean_energy_dev);
        metrics.insert("mean_onset_deviation".to_string(), mean_onset_dev);
        metrics.insert("mean_speech_density".to_string(), mean_density);
        metrics.insert("region_secs".to_string(), duration_secs);

        candidates.push(ClipCandidate {
            id: 0,
            pattern: PatternKind::Monologue,
            start,
            end,
            score,
            metrics,
        });
    }

    candidates
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn features_with_monologue(loud: std::ops::Range<usize>, n: usize, hop: f32) -> FeatureSet {
        #[allow(clippy::cast_precision_loss)]
        let times: Vec<f32> = (0..n).map(|i| i as f32 * hop).collect();
        let energy: Vec<f32> = (0..n)
            .map(|i| if loud.contains(&i) { 1.5 } else { 0.8 })
            .collect();
        let voiced: Vec<bool> = (0..n).map(|i| loud.contains(&i)).collect();

        FeatureSet {
            times,
            energy_smooth: energy.clone(),
            energy_baseline: vec![1.0; n],
            energy,
            onset: vec![0.1; n],
            onset_baseline: vec![0.1; n],
            voiced,
            hop_secs: hop,
            #[allow(clippy::cast_precision_loss)]
            duration_secs: n as f32 * hop,
            ..FeatureSet::default()
        }
    }

    #[test]
    fn test_long_dense_region_is_detected() {
        // 20 s loud dense region inside a 120 s recording, 0.1 s hop
        let features = features_with_monologue(200..400, 1200, 0.1);
        let candidates = detect(&features, &MonologueConfig::default());

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert!(c.score > 0.0);
        assert!(c.start <= 20.0);
        assert!(c.end >= 40.0);
        assert!(c.duration() >= 20.0);
    }

    #[test]
    fn test_short_region_is_ignored() {
        // Only 5 s of loud dense speech
        let features = features_with_monologue(200..250, 1200, 0.1);
        let candidates = detect(&features, &MonologueConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_quiet_dense_region_is_ignored() {
        let mut features = features_with_monologue(200..400, 1200, 0.1);
        // Dense speech but no emphasis over baseline
        for e in &mut features.energy_smooth {
            *e = 1.0;
        }
        let candidates = detect(&features, &MonologueConfig::default());
        assert!(candidates.is_empty());
    }
}
