//! Structural validation and bounded auto-fix of finished clips.

mod autofix;
mod engine;
mod types;

pub use autofix::{FixOutcome, FixSummary, apply_fixes};
pub use engine::{validate_batch, validate_clip};
pub use types::{BatchReport, Clip, ClipReport, ErrorCode, Severity, ValidationError};
