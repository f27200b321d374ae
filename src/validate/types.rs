//! Validation vocabulary: the final clip entity, error codes with
//! fixed severities, and per-clip and per-batch reports.

use crate::captions::Caption;
use crate::detect::PatternKind;
use serde::Serialize;

/// How bad a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Cosmetic; never blocks output.
    Warning,
    /// Structural but fixable within the adjustment budget.
    Error,
    /// Never auto-fixed; the clip is dropped.
    HardFailure,
}

/// Every finding the validator can produce. The severity of each code
/// is fixed, not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Clip duration under the configured minimum.
    ClipTooShort,
    /// Clip duration over the configured maximum.
    ClipTooLong,
    /// Clip start falls inside a transcript word, beyond tolerance.
    ClipCutsMidWordStart,
    /// Clip end falls inside a transcript word, beyond tolerance.
    ClipCutsMidWordEnd,
    /// Clip interval intersects another clip in the batch.
    ClipOverlap,
    /// Caption interval intersects the next caption.
    CaptionOverlap,
    /// Caption text exceeds the word limit.
    CaptionTooManyWords,
    /// Highlight token is absent from the caption text.
    CaptionHighlightMissing,
    /// Caption starts before the clip start.
    CaptionBeforeClip,
    /// Caption ends after the clip end.
    CaptionAfterClip,
    /// Caption shorter than the readability minimum.
    CaptionTooShort,
    /// Caption longer than the readability maximum.
    CaptionTooLong,
}

impl ErrorCode {
    /// The fixed severity of this code.
    pub fn severity(self) -> Severity {
        match self {
            Self::ClipOverlap => Severity::HardFailure,
            Self::CaptionTooShort | Self::CaptionTooLong => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One validation finding on one clip.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// What went wrong.
    pub code: ErrorCode,
    /// Severity, derived from the code.
    pub severity: Severity,
    /// Human-readable description with the offending values.
    pub message: String,
    /// Index of the offending caption, when the finding is about one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_index: Option<usize>,
}

impl ValidationError {
    pub(super) fn clip(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            severity: code.severity(),
            message,
            caption_index: None,
        }
    }

    pub(super) fn caption(code: ErrorCode, index: usize, message: String) -> Self {
        Self {
            code,
            severity: code.severity(),
            message,
            caption_index: Some(index),
        }
    }
}

/// A selected clip as it goes to output.
#[derive(Debug, Clone, Serialize)]
pub struct Clip {
    /// Sequential id in start order.
    pub id: u32,
    /// Pattern that produced the clip.
    pub pattern: PatternKind,
    /// Clip start in seconds.
    pub start: f32,
    /// Clip end in seconds.
    pub end: f32,
    /// Final ensemble score, 0 to 100.
    pub score: f32,
    /// Captions covering the clip.
    pub captions: Vec<Caption>,
    /// Detector metrics carried through for the report.
    pub metrics: std::collections::BTreeMap<String, f32>,
}

impl Clip {
    /// Clip length in seconds.
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// All findings for one clip.
#[derive(Debug, Clone, Serialize)]
pub struct ClipReport {
    /// Id of the clip the findings belong to.
    pub clip_id: u32,
    /// Findings in detection order.
    pub errors: Vec<ValidationError>,
}

impl ClipReport {
    /// Whether the clip has no findings above warning level.
    pub fn is_valid(&self) -> bool {
        self.errors.iter().all(|e| e.severity == Severity::Warning)
    }

    /// Whether any finding is a hard failure.
    pub fn has_hard_failure(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity == Severity::HardFailure)
    }
}

/// Validation outcome over a whole clip set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Per-clip findings, one entry per validated clip.
    pub reports: Vec<ClipReport>,
}

impl BatchReport {
    /// Whether every clip is valid.
    pub fn all_valid(&self) -> bool {
        self.reports.iter().all(ClipReport::is_valid)
    }

    /// Number of clips with findings above warning level.
    pub fn invalid_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_valid()).count()
    }

    /// Number of clips carrying a hard failure.
    pub fn hard_failure_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.has_hard_failure())
            .count()
    }

    /// The findings for a given clip id, if it was validated.
    pub fn report_for(&self, clip_id: u32) -> Option<&ClipReport> {
        self.reports.iter().find(|r| r.clip_id == clip_id)
    }
}
