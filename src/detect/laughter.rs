//! Laughter detector: bright, bursty high-energy activity.
//!
//! Laughter has no baseline of its own, so the detector builds a
//! composite activity signal from normalized energy, spectral centroid,
//! zero-crossing rate and frame-to-frame energy burstiness, then keeps
//! the regions where the composite crosses its own high percentile.
//! The generous pre-context exists to capture the setup that earned
//! the laugh.

use super::{ClipCandidate, PatternKind, Region, clamp_duration, scan_regions};
use crate::config::LaughterConfig;
use crate::features::FeatureSet;
use crate::features::baseline::{moving_average, percentile};
use std::collections::BTreeMap;

/// Rescales a signal to [0, 1]. A flat signal maps to all zeros.
fn min_max_normalize(values: &[f32]) -> Vec<f32> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / span).collect()
}

/// Absolute frame-to-frame energy change, a proxy for burstiness.
fn burstiness(energy: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; energy.len()];
    for i in 1..energy.len() {
        out[i] = (energy[i] - energy[i - 1]).abs();
    }
    out
}

pub(super) fn detect(features: &FeatureSet, config: &LaughterConfig) -> Vec<ClipCandidate> {
    let hop = features.hop_secs;
    if hop <= 0.0 || features.is_empty() {
        return Vec::new();
    }

    let energy = min_max_normalize(&features.energy_smooth);
    let centroid = min_max_normalize(&features.centroid);
    let zcr = min_max_normalize(&features.zcr);
    let burst = min_max_normalize(&burstiness(&features.energy));

    // Tolerate truncated spectral arrays instead of indexing past them
    let frames = features
        .len()
        .min(energy.len())
        .min(centroid.len())
        .min(zcr.len())
        .min(burst.len());

    let composite: Vec<f32> = (0..frames)
        .map(|i| {
            config.energy_weight * energy[i]
                + config.centroid_weight * centroid[i]
                + config.zcr_weight * zcr[i]
                + config.burst_weight * burst[i]
        })
        .collect();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let smooth_frames = ((config.smoothing_secs / hop) as usize).max(1);
    let composite = moving_average(&composite, smooth_frames);

    let threshold = percentile(&composite, config.percentile);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_frames = ((config.min_region_secs / hop) as usize).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_frames = ((config.max_region_secs / hop) as usize).max(min_frames);

    // Strict comparison: in a mostly flat composite the percentile
    // lands exactly on the common value
    let regions = scan_regions(frames, min_frames, 0, |i| composite[i] > threshold);

    let mut candidates = Vec::new();

    for mut region in regions {
        // Overlong regions keep their loudest-onset prefix
        if region.len() > max_frames {
            region = Region {
                start: region.start,
                end: region.start + max_frames,
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let span = region.len() as f32;
        let mean_composite = composite[region.start..region.end].iter().sum::<f32>() / span;
        let peak_composite = composite[region.start..region.end]
            .iter()
            .copied()
            .fold(0.0_f32, f32::max);

        // Composite lives in [0, 1] by construction
        let score = (50.0 * mean_composite + 50.0 * peak_composite).clamp(0.0, 100.0);

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
        metrics.insert("region_secs".to_string(), span * hop);
        metrics.insert("mean_composite".to_string(), mean_composite);
        metrics.insert("peak_composite".to_string(), peak_composite);
        metrics.insert("laughter_start".to_string(), region_start);

        candidates.push(ClipCandidate {
            id: 0,
            pattern: PatternKind::Laughter,
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

    /// 120 s at 0.1 s hop with one bright bursty stretch.
    fn features_with_laughter(burst: std::ops::Range<usize>) -> FeatureSet {
        let n = 1200;
        let hop = 0.1;
        #[allow(clippy::cast_precision_loss)]
        let times: Vec<f32> = (0..n).map(|i| i as f32 * hop).collect();

        let energy: Vec<f32> = (0..n)
            .map(|i| {
                if burst.contains(&i) {
                    // Alternating loud and soft frames
                    if i % 2 == 0 { 2.0 } else { 0.8 }
                } else {
                    1.0
                }
            })
            .collect();
        let centroid: Vec<f32> = (0..n)
            .map(|i| if burst.contains(&i) { 3000.0 } else { 800.0 })
            .collect();
        let zcr: Vec<f32> = (0..n)
            .map(|i| if burst.contains(&i) { 0.3 } else { 0.05 })
            .collect();

        FeatureSet {
            times,
            energy_smooth: energy.clone(),
            energy,
            centroid,
            zcr,
            hop_secs: hop,
            duration_secs: 120.0,
            ..FeatureSet::default()
        }
    }

    #[test]
    fn test_bright_bursty_region_is_detected() {
        // 4 s of laughter at 60 s
        let features = features_with_laughter(600..640);
        let candidates = detect(&features, &LaughterConfig::default());

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert!(c.score > 0.0);
        // Setup context reaches well before the laugh
        assert!(c.start < 55.0);
        assert!(c.end >= 64.0);
        assert!(c.duration() >= 15.0 && c.duration() <= 30.0);
    }

    #[test]
    fn test_flat_recording_yields_nothing() {
        let features = features_with_laughter(0..0);
        assert!(detect(&features, &LaughterConfig::default()).is_empty());
    }

    #[test]
    fn test_missing_spectral_arrays_do_not_panic() {
        let mut features = features_with_laughter(600..640);
        features.centroid = Vec::new();
        features.zcr = Vec::new();
        assert!(detect(&features, &LaughterConfig::default()).is_empty());
    }

    #[test]
    fn test_normalize_handles_flat_input() {
        assert_eq!(min_max_normalize(&[2.0, 2.0, 2.0]), vec![0.0, 0.0, 0.0]);
        let normalized = min_max_normalize(&[0.0, 5.0, 10.0]);
        assert!((normalized[2] - 1.0).abs() < f32::EPSILON);
        assert!((normalized[1] - 0.5).abs() < f32::EPSILON);
    }
}
