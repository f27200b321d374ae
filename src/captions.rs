//! Caption construction from word-level transcript timings.

use crate::transcript::Word;
use serde::{Deserialize, Serialize};

/// A pause between words long enough to force a caption break.
const GAP_BREAK_SECS: f32 = 1.0;
/// Shortest word worth highlighting.
const HIGHLIGHT_MIN_CHARS: usize = 4;

/// One on-screen caption line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    /// Caption start in seconds, absolute media time.
    pub start: f32,
    /// Caption end in seconds, absolute media time.
    pub end: f32,
    /// Caption text.
    pub text: String,
    /// Word to emphasize when rendering, if any. Always a word that
    /// appears in `text`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl Caption {
    /// Number of words in the caption.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Caption length in seconds.
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// The longest word in the group, when it is long enough to carry
/// emphasis.
fn pick_highlight(words: &[&Word]) -> Option<String> {
    words
        .iter()
        .max_by_key(|w| w.text.chars().count())
        .filter(|w| w.text.chars().count() >= HIGHLIGHT_MIN_CHARS)
        .map(|w| w.text.clone())
}

fn flush(group: &mut Vec<&Word>, captions: &mut Vec<Caption>) {
    let Some(first) = group.first() else {
        return;
    };
    let Some(last) = group.last() else {
        return;
    };
    let text = group
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    captions.push(Caption {
        start: first.start,
        end: last.end,
        text,
        highlight: pick_highlight(group),
    });
    group.clear();
}

/// Groups the words falling inside `[clip_start, clip_end]` into
/// captions of at most `max_words` words, breaking early at long
/// pauses. Words straddling a clip edge are kept only when at least
/// half of the word lies inside.
pub fn build_captions(
    words: &[Word],
    clip_start: f32,
    clip_end: f32,
    max_words: usize,
) -> Vec<Caption> {
    let max_words = max_words.max(1);
    let mut captions = Vec::new();
    let mut group: Vec<&Word> = Vec::new();

    for word in words {
        let mid = (word.start + word.end) / 2.0;
        if mid < clip_start || mid > clip_end {
            continue;
        }

        if let Some(last) = group.last()
            && (word.start - last.end > GAP_BREAK_SECS || group.len() >= max_words)
        {
            flush(&mut group, &mut captions);
        }
        group.push(word);
    }
    flush(&mut group, &mut captions);

    captions
}
