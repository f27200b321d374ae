//! The clipworthiness gate: hard structural checks first, then a
//! weighted soft-score ensemble over the survivors.

use super::{ScoreBreakdown, ScoredClip};
use crate::config::GateConfig;
use crate::constants::{COHERENCE_DECAY_SECS, HOOK_WINDOW_SECS};
use crate::detect::ClipCandidate;
use crate::features::FeatureSet;
use crate::features::baseline::percentile;
use tracing::debug;

/// Hook ratio at or below this scores zero.
const HOOK_RATIO_FLOOR: f32 = 0.9;
/// Hook ratio at or above this scores full marks.
const HOOK_RATIO_CEIL: f32 = 1.6;
/// Onset deviation in the opening window that earns the novelty bonus.
const HOOK_NOVELTY_THRESHOLD: f32 = 1.0;
/// Flat bonus for a novel opening.
const HOOK_NOVELTY_BONUS: f32 = 15.0;
/// Largest multiplier a strong opening can earn.
const MAX_HOOK_MULTIPLIER: f32 = 1.1;

/// Accepted clips plus, when enabled, the gate rejects for debugging.
#[derive(Debug, Default)]
pub struct GateOutput {
    /// Candidates that passed every hard gate, scored.
    pub accepted: Vec<ScoredClip>,
    /// Hard-gate rejects, kept only when `keep_rejected` is set.
    pub rejected: Vec<ScoredClip>,
}

/// How strongly the clip opens, judged on its first seconds.
///
/// A listener decides within the opening moments whether to keep
/// watching, so the opening energy relative to baseline carries the
/// score, with a flat bonus when the opening also brings onset novelty.
fn hook_score(features: &FeatureSet, candidate: &ClipCandidate) -> f32 {
    let window = features.frame_range(candidate.start, candidate.start + HOOK_WINDOW_SECS);
    if window.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = window.len() as f32;
    let mean_energy = features.energy_smooth[window.clone()].iter().sum::<f32>() / len;
    let mean_baseline = features.energy_baseline[window.clone()].iter().sum::<f32>() / len;
    let ratio = if mean_baseline > 0.0 {
        mean_energy / mean_baseline
    } else {
        0.0
    };

    let mut score =
        ((ratio - HOOK_RATIO_FLOOR) / (HOOK_RATIO_CEIL - HOOK_RATIO_FLOOR)).clamp(0.0, 1.0) * 100.0;

    let peak_novelty = window
        .map(|i| features.onset_deviation(i))
        .fold(0.0_f32, f32::max);
    if peak_novelty >= HOOK_NOVELTY_THRESHOLD {
        score += HOOK_NOVELTY_BONUS;
    }

    score.min(100.0)
}

/// How cleanly one clip edge lands on a speech boundary: full marks on
/// the boundary, fading to zero at `COHERENCE_DECAY_SECS` away.
fn edge_coherence(edge: f32, boundaries: impl Iterator<Item = f32>) -> f32 {
    let nearest = boundaries
        .map(|b| (b - edge).abs())
        .fold(f32::INFINITY, f32::min);
    if !nearest.is_finite() {
        return 0.0;
    }
    (1.0 - nearest / COHERENCE_DECAY_SECS).clamp(0.0, 1.0) * 100.0
}

fn coherence_score(features: &FeatureSet, candidate: &ClipCandidate) -> f32 {
    let start = edge_coherence(candidate.start, features.segments.iter().map(|s| s.start));
    let end = edge_coherence(candidate.end, features.segments.iter().map(|s| s.end));
    (start + end) / 2.0
}

fn score_candidate(
    features: &FeatureSet,
    candidate: ClipCandidate,
    config: &GateConfig,
) -> ScoredClip {
    let window = features.frame_range(candidate.start, candidate.end);

    let speech_ratio = features.speech_ratio(window.clone());
    let speech_secs = features.speech_secs(window.clone());
    let flatness_median = if window.is_empty() {
        1.0
    } else {
        percentile(&features.flatness[window], 0.5)
    };

    let hook = hook_score(features, &candidate);
    let coherence = coherence_score(features, &candidate);

    let breakdown = ScoreBreakdown {
        speech_ratio,
        speech_secs,
        flatness_median,
        passed_speech_ratio: speech_ratio >= config.min_speech_ratio,
        passed_flatness: flatness_median <= config.max_flatness,
        passed_speech_secs: speech_secs >= config.min_speech_secs,
        pattern_score: candidate.score,
        hook_score: hook,
        coherence_score: coherence,
    };

    let w = &config.weights;
    let weight_sum = w.pattern + w.hook + w.coherence;
    let base = if weight_sum > 0.0 {
        (w.pattern * candidate.score + w.hook * hook + w.coherence * coherence) / weight_sum
    } else {
        candidate.score
    };

    // A strong opening earns a small multiplicative edge in ranking
    let hook_multiplier = 1.0 + (hook / 100.0) * (MAX_HOOK_MULTIPLIER - 1.0);
    let score = (base * hook_multiplier).clamp(0.0, 100.0);

    ScoredClip {
        candidate,
        score,
        hook_multiplier,
        breakdown,
        display_id: None,
    }
}

/// Runs every candidate through the hard gates and scores the
/// survivors. Rejects are dropped unless `keep_rejected` is set.
pub fn apply_gate(
    features: &FeatureSet,
    candidates: Vec<ClipCandidate>,
    config: &GateConfig,
) -> GateOutput {
    let mut output = GateOutput::default();

    for candidate in candidates {
        let scored = score_candidate(features, candidate, config);
        if scored.breakdown.passed() {
            output.accepted.push(scored);
        } else {
            debug!(
                id = scored.candidate.id,
                pattern = %scored.candidate.pattern,
                speech_ratio = scored.breakdown.speech_ratio,
                flatness = scored.breakdown.flatness_median,
                speech_secs = scored.breakdown.speech_secs,
                "candidate rejected by hard gate"
            );
            if config.keep_rejected {
                output.rejected.push(scored);
            }
        }
    }

    output
}
