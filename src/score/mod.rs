//! Clipworthiness gating, scoring and final selection.

mod gate;
mod select;

pub use gate::{GateOutput, apply_gate};
pub use select::select;

use crate::detect::ClipCandidate;
use serde::Serialize;

/// Per-candidate scoring detail, kept for the output report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    /// Fraction of voiced frames inside the clip window.
    pub speech_ratio: f32,
    /// Seconds of speech inside the clip window.
    pub speech_secs: f32,
    /// Median spectral flatness inside the clip window.
    pub flatness_median: f32,
    /// Whether the speech-ratio hard gate passed.
    pub passed_speech_ratio: bool,
    /// Whether the flatness hard gate passed.
    pub passed_flatness: bool,
    /// Whether the absolute-speech hard gate passed.
    pub passed_speech_secs: bool,
    /// Raw detector score, 0 to 100.
    pub pattern_score: f32,
    /// Opening-hook score, 0 to 100.
    pub hook_score: f32,
    /// Boundary coherence score, 0 to 100.
    pub coherence_score: f32,
}

impl ScoreBreakdown {
    /// Whether every hard gate passed.
    pub fn passed(&self) -> bool {
        self.passed_speech_ratio && self.passed_flatness && self.passed_speech_secs
    }
}

/// A candidate that survived (or, in debug mode, failed) the gate.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredClip {
    /// The underlying detected candidate.
    #[serde(flatten)]
    pub candidate: ClipCandidate,
    /// Final ensemble score, 0 to 100.
    pub score: f32,
    /// Multiplier applied for a strong opening, at most 1.1.
    pub hook_multiplier: f32,
    /// Scoring detail.
    pub breakdown: ScoreBreakdown,
    /// Position in the final ranked output, assigned after selection.
    pub display_id: Option<u32>,
}

impl ScoredClip {
    /// Clip start in seconds.
    pub fn start(&self) -> f32 {
        self.candidate.start
    }

    /// Clip end in seconds.
    pub fn end(&self) -> f32 {
        self.candidate.end
    }

    /// Whether this clip's interval overlaps another's.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}
