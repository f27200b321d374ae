//! The structural validator. Pure checks over finished clips; never
//! panics and never mutates its input.

use super::types::{BatchReport, Clip, ClipReport, ErrorCode, ValidationError};
use crate::config::ValidationConfig;
use crate::transcript::Word;

/// Whether `time` falls strictly inside a word, beyond the tolerance
/// on both sides.
fn cuts_word(time: f32, words: &[Word], tolerance: f32) -> Option<&Word> {
    words
        .iter()
        .find(|w| time > w.start + tolerance && time < w.end - tolerance)
}

fn check_clip_bounds(clip: &Clip, config: &ValidationConfig, errors: &mut Vec<ValidationError>) {
    let duration = clip.duration();
    if duration < config.min_clip_secs {
        errors.push(ValidationError::clip(
            ErrorCode::ClipTooShort,
            format!(
                "duration {duration:.2}s is below the minimum {:.2}s",
                config.min_clip_secs
            ),
        ));
    } else if duration > config.max_clip_secs {
        errors.push(ValidationError::clip(
            ErrorCode::ClipTooLong,
            format!(
                "duration {duration:.2}s is above the maximum {:.2}s",
                config.max_clip_secs
            ),
        ));
    }
}

fn check_word_cuts(
    clip: &Clip,
    words: &[Word],
    config: &ValidationConfig,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(word) = cuts_word(clip.start, words, config.word_tolerance_secs) {
        errors.push(ValidationError::clip(
            ErrorCode::ClipCutsMidWordStart,
            format!(
                "clip start {:.2}s falls inside \"{}\" ({:.2}s to {:.2}s)",
                clip.start, word.text, word.start, word.end
            ),
        ));
    }
    if let Some(word) = cuts_word(clip.end, words, config.word_tolerance_secs) {
        errors.push(ValidationError::clip(
            ErrorCode::ClipCutsMidWordEnd,
            format!(
                "clip end {:.2}s falls inside \"{}\" ({:.2}s to {:.2}s)",
                clip.end, word.text, word.start, word.end
            ),
        ));
    }
}

fn check_captions(clip: &Clip, config: &ValidationConfig, errors: &mut Vec<ValidationError>) {
    for (i, caption) in clip.captions.iter().enumerate() {
        if caption.start < clip.start - config.word_tolerance_secs {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionBeforeClip,
                i,
                format!(
                    "caption starts at {:.2}s, before the clip start {:.2}s",
                    caption.start, clip.start
                ),
            ));
        }
        if caption.end > clip.end + config.word_tolerance_secs {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionAfterClip,
                i,
                format!(
                    "caption ends at {:.2}s, after the clip end {:.2}s",
                    caption.end, clip.end
                ),
            ));
        }

        let words = caption.word_count();
        if words > config.max_caption_words {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionTooManyWords,
                i,
                format!(
                    "caption has {words} words, more than the maximum {}",
                    config.max_caption_words
                ),
            ));
        }

        if let Some(highlight) = &caption.highlight
            && !caption.text.split_whitespace().any(|w| w == highlight)
        {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionHighlightMissing,
                i,
                format!("highlight \"{highlight}\" does not appear in the caption text"),
            ));
        }

        let duration = caption.duration();
        if duration < config.min_caption_secs {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionTooShort,
                i,
                format!("caption lasts {duration:.2}s"),
            ));
        } else if duration > config.max_caption_secs {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionTooLong,
                i,
                format!("caption lasts {duration:.2}s"),
            ));
        }
    }

    for i in 1..clip.captions.len() {
        let prev = &clip.captions[i - 1];
        let next = &clip.captions[i];
        if next.start < prev.end {
            errors.push(ValidationError::caption(
                ErrorCode::CaptionOverlap,
                i - 1,
                format!(
                    "caption ending at {:.2}s overlaps the next starting at {:.2}s",
                    prev.end, next.start
                ),
            ));
        }
    }
}

/// Validates one clip against the transcript and the configured rules.
pub fn validate_clip(clip: &Clip, words: &[Word], config: &ValidationConfig) -> ClipReport {
    let mut errors = Vec::new();
    check_clip_bounds(clip, config, &mut errors);
    check_word_cuts(clip, words, config, &mut errors);
    check_captions(clip, config, &mut errors);
    ClipReport {
        clip_id: clip.id,
        errors,
    }
}

/// Validates every clip and the pairwise relationships between them.
pub fn validate_batch(clips: &[Clip], words: &[Word], config: &ValidationConfig) -> BatchReport {
    let mut reports: Vec<ClipReport> = clips
        .iter()
        .map(|clip| validate_clip(clip, words, config))
        .collect();

    for i in 0..clips.len() {
        for j in (i + 1)..clips.len() {
            let (a, b) = (&clips[i], &clips[j]);
            if a.start < b.end && b.start < a.end {
                let message = format!(
                    "clip {} ({:.2}s to {:.2}s) overlaps clip {} ({:.2}s to {:.2}s)",
                    a.id, a.start, a.end, b.id, b.start, b.end
                );
                reports[i]
                    .errors
                    .push(ValidationError::clip(ErrorCode::ClipOverlap, message.clone()));
                reports[j]
                    .errors
                    .push(ValidationError::clip(ErrorCode::ClipOverlap, message));
            }
        }
    }

    BatchReport { reports }
}
