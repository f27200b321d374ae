//! One-shot bounded auto-fix for validation errors.
//!
//! The fixer runs once per clip, applies every fix it can within the
//! adjustment budget, and reports what it did. The caller re-validates
//! exactly once; a clip still invalid after that is dropped. Hard
//! failures are never fixed.

use super::engine::validate_clip;
use super::types::{Clip, ClipReport, ErrorCode, Severity};
use crate::config::{AutofixConfig, ValidationConfig};
use crate::transcript::Word;
use tracing::debug;

/// Slack left between two captions after an overlap trim.
const CAPTION_TRIM_GAP_SECS: f32 = 0.01;

/// What the fixer did with one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The clip had no errors to fix.
    Clean,
    /// Fixes were applied and the clip re-validated clean.
    Fixed(Vec<String>),
    /// The clip carried a hard failure, or fixing was impossible or
    /// insufficient; the clip must be dropped.
    Dropped(Vec<String>),
}

/// Fix summary over a whole clip set.
#[derive(Debug, Default)]
pub struct FixSummary {
    /// Clips that survived, fixed or already clean, in input order.
    pub clips: Vec<Clip>,
    /// Per-clip fix logs, aligned with the input clip order.
    pub outcomes: Vec<(u32, FixOutcome)>,
}

impl FixSummary {
    /// Whether any clip had fixes applied.
    pub fn any_fixed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| matches!(o, FixOutcome::Fixed(_)))
    }

    /// Number of clips dropped.
    pub fn dropped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FixOutcome::Dropped(_)))
            .count()
    }
}

/// Moves a boundary to `target` when the move fits the budget.
/// Returns the applied delta, or `None` when the move is too large.
fn bounded_move(current: f32, target: f32, budget: f32) -> Option<f32> {
    let delta = target - current;
    if delta.abs() <= budget { Some(delta) } else { None }
}

fn fix_clip_duration(
    clip: &mut Clip,
    media_end: f32,
    validation: &ValidationConfig,
    budget: f32,
    log: &mut Vec<String>,
) -> bool {
    let duration = clip.duration();
    if duration < validation.min_clip_secs {
        let needed = validation.min_clip_secs - duration;
        let target = (clip.end + needed).min(media_end);
        match bounded_move(clip.end, target, budget) {
            Some(delta) if (clip.end + delta) - clip.start >= validation.min_clip_secs => {
                clip.end += delta;
                log.push(format!("extended end by {delta:.2}s to reach minimum duration"));
            }
            _ => {
                log.push(format!(
                    "cannot extend by {needed:.2}s within the {budget:.2}s budget"
                ));
                return false;
            }
        }
    } else if duration > validation.max_clip_secs {
        let excess = duration - validation.max_clip_secs;
        match bounded_move(clip.end, clip.end - excess, budget) {
            Some(delta) => {
                clip.end += delta;
                log.push(format!("trimmed end by {:.2}s to the maximum duration", -delta));
            }
            None => {
                log.push(format!(
                    "cannot trim {excess:.2}s within the {budget:.2}s budget"
                ));
                return false;
            }
        }
    }
    true
}

fn fix_word_cut(
    boundary: f32,
    words: &[Word],
    tolerance: f32,
    budget: f32,
    snap_to_start: bool,
) -> Option<f32> {
    let word = words
        .iter()
        .find(|w| boundary > w.start + tolerance && boundary < w.end - tolerance)?;
    let target = if snap_to_start { word.start } else { word.end };
    bounded_move(boundary, target, budget).map(|delta| boundary + delta)
}

fn fix_captions(clip: &mut Clip, log: &mut Vec<String>) {
    let start = clip.start;
    let end = clip.end;

    // Captions with no overlap at all cannot be clamped into the clip
    let before = clip.captions.len();
    clip.captions
        .retain(|c| c.end > start && c.start < end);
    if clip.captions.len() < before {
        log.push(format!(
            "removed {} caption(s) lying wholly outside the clip",
            before - clip.captions.len()
        ));
    }

    for (i, caption) in clip.captions.iter_mut().enumerate() {
        if caption.start < start {
            caption.start = start;
            log.push(format!("clamped caption {i} start to the clip start"));
        }
        if caption.end > end {
            caption.end = end;
            log.push(format!("clamped caption {i} end to the clip end"));
        }
        if let Some(highlight) = &caption.highlight
            && !caption.text.split_whitespace().any(|w| w == highlight)
        {
            caption.highlight = None;
            log.push(format!("dropped missing highlight on caption {i}"));
        }
    }

    for i in 1..clip.captions.len() {
        let next_start = clip.captions[i].start;
        let prev = &mut clip.captions[i - 1];
        if next_start < prev.end {
            prev.end = next_start - CAPTION_TRIM_GAP_SECS;
            log.push(format!(
                "trimmed caption {} end to {:.2}s to clear the next caption",
                i - 1,
                prev.end
            ));
        }
    }
}

fn try_fix(
    clip: &mut Clip,
    report: &ClipReport,
    words: &[Word],
    media_end: f32,
    validation: &ValidationConfig,
    budget: f32,
) -> (bool, Vec<String>) {
    let mut log = Vec::new();
    let mut ok = true;

    for error in &report.errors {
        match error.code {
            ErrorCode::ClipTooShort | ErrorCode::ClipTooLong => {
                ok &= fix_clip_duration(clip, media_end, validation, budget, &mut log);
            }
            ErrorCode::ClipCutsMidWordStart => {
                if let Some(new_start) =
                    fix_word_cut(clip.start, words, validation.word_tolerance_secs, budget, true)
                {
                    log.push(format!("moved start to a word boundary at {new_start:.2}s"));
                    clip.start = new_start;
                } else {
                    log.push("word boundary out of reach for the clip start".to_string());
                    ok = false;
                }
            }
            ErrorCode::ClipCutsMidWordEnd => {
                if let Some(new_end) =
                    fix_word_cut(clip.end, words, validation.word_tolerance_secs, budget, false)
                {
                    log.push(format!("moved end to a word boundary at {new_end:.2}s"));
                    clip.end = new_end;
                } else {
                    log.push("word boundary out of reach for the clip end".to_string());
                    ok = false;
                }
            }
            ErrorCode::CaptionOverlap
            | ErrorCode::CaptionTooManyWords
            | ErrorCode::CaptionHighlightMissing
            | ErrorCode::CaptionBeforeClip
            | ErrorCode::CaptionAfterClip => {
                // Handled in one caption pass below
            }
            ErrorCode::ClipOverlap | ErrorCode::CaptionTooShort | ErrorCode::CaptionTooLong => {}
        }
    }

    if report
        .errors
        .iter()
        .any(|e| e.caption_index.is_some() && e.severity == Severity::Error)
    {
        truncate_wordy_captions(clip, validation.max_caption_words, &mut log);
        fix_captions(clip, &mut log);
    }

    (ok, log)
}

/// Truncates any caption over the word limit to its first `max_words`
/// words, shortening the caption end in proportion.
fn truncate_wordy_captions(clip: &mut Clip, max_words: usize, log: &mut Vec<String>) {
    let max_words = max_words.max(1);

    for (i, caption) in clip.captions.iter_mut().enumerate() {
        let words: Vec<&str> = caption.text.split_whitespace().collect();
        if words.len() <= max_words {
            continue;
        }

        log.push(format!("truncated caption {i} to the word limit"));
        #[allow(clippy::cast_precision_loss)]
        let kept_fraction = max_words as f32 / words.len() as f32;
        caption.end = caption.start + caption.duration() * kept_fraction;
        caption.text = words[..max_words].join(" ");
        caption.highlight = caption
            .highlight
            .take()
            .filter(|h| caption.text.split_whitespace().any(|w| w == h));
    }
}

/// Applies the one-shot fix pass to every invalid clip and re-validates
/// once. Clips with hard failures are dropped outright, and clips still
/// invalid after their fix are dropped too.
pub fn apply_fixes(
    clips: Vec<Clip>,
    reports: &[ClipReport],
    words: &[Word],
    media_end: f32,
    validation: &ValidationConfig,
    config: &AutofixConfig,
) -> FixSummary {
    let mut summary = FixSummary::default();

    for mut clip in clips {
        let id = clip.id;
        let Some(report) = reports.iter().find(|r| r.clip_id == id) else {
            summary.clips.push(clip);
            summary.outcomes.push((id, FixOutcome::Clean));
            continue;
        };

        if report.has_hard_failure() {
            debug!(clip_id = id, "dropping clip with hard failure");
            summary
                .outcomes
                .push((id, FixOutcome::Dropped(vec!["hard failure".to_string()])));
            continue;
        }

        if report.is_valid() {
            summary.clips.push(clip);
            summary.outcomes.push((id, FixOutcome::Clean));
            continue;
        }

        if !config.enabled {
            summary
                .outcomes
                .push((id, FixOutcome::Dropped(vec!["auto-fix disabled".to_string()])));
            continue;
        }

        let (moved_ok, log) = try_fix(
            &mut clip,
            report,
            words,
            media_end,
            validation,
            config.max_adjustment_secs,
        );

        let recheck = validate_clip(&clip, words, validation);
        if moved_ok && recheck.is_valid() {
            debug!(clip_id = id, fixes = log.len(), "clip fixed");
            summary.clips.push(clip);
            summary.outcomes.push((id, FixOutcome::Fixed(log)));
        } else {
            debug!(clip_id = id, "clip still invalid after fix, dropping");
            summary.outcomes.push((id, FixOutcome::Dropped(log)));
        }
    }

    summary
}
