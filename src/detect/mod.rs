//! Pattern detectors.
//!
//! Four scanners share one skeleton: grow a region while a per-frame
//! predicate holds (tolerating a bounded gap), keep regions over a minimum
//! span, score the closed region 0-100 from aggregate statistics, pad with
//! pattern context, and clamp the result into the pattern's clip duration
//! range. The deltas live in the per-pattern modules.

mod debate;
mod laughter;
mod monologue;
mod payoff;
mod snap;

pub use snap::{SnapOutcome, SnapParams, SnapResult, snap_to_speech};

use crate::config::PatternsConfig;
use crate::features::FeatureSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Which detector produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Dramatic pause followed by an energy spike.
    Payoff,
    /// Sustained dense emphatic speech.
    Monologue,
    /// Rapid multi-turn exchange.
    Debate,
    /// Laughter burst.
    Laughter,
}

impl PatternKind {
    /// Stable lowercase name for output files and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payoff => "payoff",
            Self::Monologue => "monologue",
            Self::Debate => "debate",
            Self::Laughter => "laughter",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detector-produced clip interval, before gating.
///
/// The snapper may rewrite `start`/`end` once; nothing mutates a candidate
/// after the gate stage.
#[derive(Debug, Clone, Serialize)]
pub struct ClipCandidate {
    /// Candidate id, unique within one run.
    pub id: u32,
    /// Producing pattern.
    pub pattern: PatternKind,
    /// Start in seconds.
    pub start: f32,
    /// End in seconds.
    pub end: f32,
    /// Raw pattern score, 0-100.
    pub score: f32,
    /// Pattern-specific debug metrics.
    pub metrics: BTreeMap<String, f32>,
}

impl ClipCandidate {
    /// Candidate length in seconds.
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// A closed frame region, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub(crate) fn len(self) -> usize {
        self.end - self.start
    }
}

/// Region growing with hysteresis over a per-frame predicate.
///
/// A region stays open across up to `gap_frames` consecutive predicate
/// failures; the closed region ends at the last passing frame. Regions
/// shorter than `min_frames` are discarded.
pub(crate) fn scan_regions(
    frames: usize,
    min_frames: usize,
    gap_frames: usize,
    predicate: impl Fn(usize) -> bool,
) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;
    let mut last_hit = 0usize;

    for i in 0..frames {
        if predicate(i) {
            if start.is_none() {
                start = Some(i);
            }
            last_hit = i;
        } else if let Some(s) = start
            && i - last_hit > gap_frames
        {
            if last_hit + 1 - s >= min_frames {
                regions.push(Region {
                    start: s,
                    end: last_hit + 1,
                });
            }
            start = None;
        }
    }

    if let Some(s) = start
        && last_hit + 1 - s >= min_frames
    {
        regions.push(Region {
            start: s,
            end: last_hit + 1,
        });
    }

    regions
}

/// Margin applied when an extended interval rounds below the minimum.
const MIN_DURATION_NUDGE_SECS: f32 = 1e-3;

/// Clamp an interval into `[min_secs, max_secs]` inside the media bounds.
///
/// Too-short intervals extend symmetrically (spilling to the other side at
/// a media edge); too-long intervals trim symmetrically around the center.
pub(crate) fn clamp_duration(
    start: f32,
    end: f32,
    min_secs: f32,
    max_secs: f32,
    media_end: f32,
) -> (f32, f32) {
    let mut start = start.max(0.0);
    let mut end = end.min(media_end).max(start);
    let duration = end - start;

    if duration < min_secs {
        let deficit = min_secs - duration;
        start -= deficit / 2.0;
        end += deficit / 2.0;
        if start < 0.0 {
            end -= start;
            start = 0.0;
        }
        if end > media_end {
            start -= end - media_end;
            end = media_end;
            start = start.max(0.0);
        }
        // Splitting the deficit across both edges can round a hair short
        if end - start < min_secs {
            end = (start + min_secs + MIN_DURATION_NUDGE_SECS).min(media_end);
            if end - start < min_secs {
                start = (end - min_secs - MIN_DURATION_NUDGE_SECS).max(0.0);
            }
        }
    } else if duration > max_secs {
        let excess = duration - max_secs;
        start += excess / 2.0;
        end -= excess / 2.0;
    }

    (start, end)
}

/// Run all four detectors and number the candidates.
pub fn detect_all(features: &FeatureSet, config: &PatternsConfig) -> Vec<ClipCandidate> {
    if features.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    candidates.extend(payoff::detect(features, &config.payoff));
    candidates.extend(monologue::detect(features, &config.monologue));
    candidates.extend(debate::detect(features, &config.debate));
    candidates.extend(laughter::detect(features, &config.laughter));

    for (i, candidate) in candidates.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        {
            candidate.id = i as u32;
        }
    }

    debug!(candidates = candidates.len(), "Pattern detection complete");
    candidates
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_regions_simple_run() {
        let mask = [false, true, true, true, false, false];
        let regions = scan_regions(mask.len(), 2, 0, |i| mask[i]);
        assert_eq!(regions, vec![Region { start: 1, end: 4 }]);
    }

    #[test]
    fn test_scan_regions_min_span_filters() {
        let mask = [true, false, false, true, true, true];
        let regions = scan_regions(mask.len(), 3, 0, |i| mask[i]);
        assert_eq!(regions, vec![Region { start: 3, end: 6 }]);
    }

    #[test]
    fn test_scan_regions_gap_tolerance_bridges_dip() {
        let mask = [true, true, false, true, true, false, false, false];
        let bridged = scan_regions(mask.len(), 2, 1, |i| mask[i]);
        assert_eq!(bridged, vec![Region { start: 0, end: 5 }]);

        let strict = scan_regions(mask.len(), 2, 0, |i| mask[i]);
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn test_scan_regions_open_at_end() {
        let mask = [false, false, true, true, true];
        let regions = scan_regions(mask.len(), 2, 0, |i| mask[i]);
        assert_eq!(regions, vec![Region { start: 2, end: 5 }]);
    }

    #[test]
    fn test_clamp_duration_extends_symmetrically() {
        let (start, end) = clamp_duration(10.0, 14.0, 10.0, 20.0, 100.0);
        assert_eq!(start, 7.0);
        assert_eq!(end, 17.0);
    }

    #[test]
    fn test_clamp_duration_spills_at_media_start() {
        let (start, end) = clamp_duration(1.0, 5.0, 10.0, 20.0, 100.0);
        assert_eq!(start, 0.0);
        assert_eq!(end, 10.0);
    }

    #[test]
    fn test_clamp_duration_never_lands_under_minimum() {
        // Fractional inputs whose symmetric split rounds awkwardly in f32
        for (raw_start, raw_end) in [(9.0, 23.8), (0.3, 7.7), (100.13, 114.57)] {
            let (start, end) = clamp_duration(raw_start, raw_end, 15.0, 80.0, 600.0);
            assert!(
                end - start >= 15.0,
                "({raw_start}, {raw_end}) clamped to ({start}, {end})"
            );
        }
    }

    #[test]
    fn test_clamp_duration_trims_long_interval() {
        let (start, end) = clamp_duration(10.0, 50.0, 10.0, 20.0, 100.0);
        assert_eq!(start, 20.0);
        assert_eq!(end, 40.0);
        assert_eq!(end - start, 20.0);
    }

    #[test]
    fn test_clamp_duration_in_range_unchanged() {
        let (start, end) = clamp_duration(10.0, 25.0, 10.0, 20.0, 100.0);
        assert_eq!((start, end), (10.0, 25.0));
    }
}
