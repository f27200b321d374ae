//! Detection, gating and selection working together over synthetic
//! feature sets.

#![allow(clippy::unwrap_used)]

use clipscout::config::{Config, GateConfig, SelectionConfig};
use clipscout::detect::detect_all;
use clipscout::features::{FeatureSet, SpeechSegment};
use clipscout::score::{apply_gate, select};

/// A 10-minute recording with a payoff shape at 120 s: flat speech,
/// a 2 s silence, then a sustained loud spike.
fn payoff_features() -> FeatureSet {
    let hop = 0.05_f32;
    let n = 12_000; // 600 s
    #[allow(clippy::cast_precision_loss)]
    let times: Vec<f32> = (0..n).map(|i| i as f32 * hop).collect();

    let mut energy = vec![1.0_f32; n];
    // Silence from 120 s to 122 s
    for e in &mut energy[2400..2440] {
        *e = 0.02;
    }
    // Spike from 122 s to 123 s
    for e in &mut energy[2440..2460] {
        *e = 3.5;
    }

    FeatureSet {
        times,
        energy: energy.clone(),
        energy_smooth: energy,
        energy_baseline: vec![1.0; n],
        centroid: vec![900.0; n],
        centroid_baseline: vec![900.0; n],
        flatness: vec![0.2; n],
        flatness_baseline: vec![0.2; n],
        zcr: vec![0.06; n],
        zcr_baseline: vec![0.06; n],
        onset: vec![0.1; n],
        onset_baseline: vec![0.1; n],
        voiced: vec![true; n],
        segments: vec![SpeechSegment {
            start: 0.0,
            end: 600.0,
        }],
        hop_secs: hop,
        duration_secs: 600.0,
        ..FeatureSet::default()
    }
}

#[test]
fn test_payoff_flows_through_gate_and_selection() {
    let features = payoff_features();
    let config = Config::default();

    let candidates = detect_all(&features, &config.patterns);
    assert!(
        candidates
            .iter()
            .any(|c| c.pattern.as_str() == "payoff"),
        "expected a payoff candidate"
    );

    let gated = apply_gate(&features, candidates, &config.gate);
    assert!(!gated.accepted.is_empty());

    let picked = select(gated.accepted, &config.selection);
    assert!(!picked.is_empty());
    assert!(picked.len() <= config.selection.max_clips);

    let clip = &picked[0];
    assert_eq!(clip.display_id, Some(1));
    assert!(clip.score > 0.0 && clip.score <= 100.0);
    // The payoff interval covers the silence and the spike
    assert!(clip.start() < 120.0);
    assert!(clip.end() > 123.0);
}

#[test]
fn test_unvoiced_recording_produces_no_clips() {
    let mut features = payoff_features();
    features.voiced = vec![false; features.len()];
    features.segments = Vec::new();
    let config = Config::default();

    let candidates = detect_all(&features, &config.patterns);
    let gated = apply_gate(&features, candidates, &config.gate);
    assert!(gated.accepted.is_empty());
}

#[test]
fn test_selection_caps_candidates_from_many_detections() {
    let hop = 0.05_f32;
    let n = 24_000; // 1200 s
    #[allow(clippy::cast_precision_loss)]
    let times: Vec<f32> = (0..n).map(|i| i as f32 * hop).collect();

    let mut energy = vec![1.0_f32; n];
    // Payoff shapes every 120 s
    for k in 0..9 {
        let base = 2400 * (k + 1);
        for e in &mut energy[base..base + 40] {
            *e = 0.02;
        }
        for e in &mut energy[base + 40..base + 60] {
            *e = 3.5;
        }
    }

    let features = FeatureSet {
        times,
        energy: energy.clone(),
        energy_smooth: energy,
        energy_baseline: vec![1.0; n],
        centroid: vec![900.0; n],
        centroid_baseline: vec![900.0; n],
        flatness: vec![0.2; n],
        flatness_baseline: vec![0.2; n],
        zcr: vec![0.06; n],
        zcr_baseline: vec![0.06; n],
        onset: vec![0.1; n],
        onset_baseline: vec![0.1; n],
        voiced: vec![true; n],
        segments: vec![SpeechSegment {
            start: 0.0,
            end: 1200.0,
        }],
        hop_secs: hop,
        duration_secs: 1200.0,
        ..FeatureSet::default()
    };

    let config = Config::default();
    let candidates = detect_all(&features, &config.patterns);
    assert!(candidates.len() >= 5);

    let gated = apply_gate(&features, candidates, &config.gate);
    let picked = select(
        gated.accepted,
        &SelectionConfig {
            max_clips: 3,
            min_gap_secs: 30.0,
        },
    );
    assert_eq!(picked.len(), 3);

    // Start order with sequential ids
    for (i, clip) in picked.iter().enumerate() {
        assert_eq!(clip.display_id, Some(u32::try_from(i + 1).unwrap()));
    }
    for pair in picked.windows(2) {
        assert!(pair[1].start() - pair[0].start() >= 30.0);
    }
}

#[test]
fn test_keep_rejected_exposes_gate_failures() {
    let mut features = payoff_features();
    // High flatness fails the hard gate everywhere
    features.flatness = vec![0.9; features.len()];
    let config = Config::default();

    let candidates = detect_all(&features, &config.patterns);
    assert!(!candidates.is_empty());

    let silent = apply_gate(&features, candidates.clone(), &config.gate);
    assert!(silent.accepted.is_empty());
    assert!(silent.rejected.is_empty());

    let debug_gate = GateConfig {
        keep_rejected: true,
        ..config.gate
    };
    let kept = apply_gate(&features, candidates, &debug_gate);
    assert!(!kept.rejected.is_empty());
    assert!(!kept.rejected[0].breakdown.passed_flatness);
}
