//! Transcript input from an external speech-to-text step.
//!
//! The transcript is optional: without one, word-boundary validation and
//! caption building are skipped. The expected JSON shape is
//! `{ "words": [{"text", "start", "end"}], "segments": [{"start", "end", "text"}] }`
//! with either list allowed to be absent.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single transcribed word with its time interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// The word text.
    pub text: String,
    /// Word start in seconds.
    pub start: f32,
    /// Word end in seconds.
    pub end: f32,
}

/// A transcribed segment (sentence or phrase level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment start in seconds.
    pub start: f32,
    /// Segment end in seconds.
    pub end: f32,
    /// Segment text.
    pub text: String,
}

/// A full transcript: ordered words and/or coarser segments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transcript {
    /// Word-level timings, ordered by start.
    pub words: Vec<Word>,
    /// Segment-level timings, ordered by start.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Whether the transcript carries any usable timing at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.segments.is_empty()
    }
}

/// Load and sanity-check a transcript JSON file.
///
/// Words are re-sorted by start time; a word with `end < start` is rejected
/// deterministically here rather than failing on access deep inside
/// validation.
pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::TranscriptRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut transcript: Transcript =
        serde_json::from_str(&contents).map_err(|e| Error::TranscriptParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    for word in &transcript.words {
        if word.end < word.start {
            return Err(Error::TranscriptInvalid {
                message: format!(
                    "word '{}' has end {} before start {}",
                    word.text, word.end, word.start
                ),
            });
        }
    }
    for segment in &transcript.segments {
        if segment.end < segment.start {
            return Err(Error::TranscriptInvalid {
                message: format!(
                    "segment at {} has end {} before start",
                    segment.start, segment.end
                ),
            });
        }
    }

    transcript
        .words
        .sort_by(|a, b| a.start.total_cmp(&b.start));
    transcript
        .segments
        .sort_by(|a, b| a.start.total_cmp(&b.start));

    Ok(transcript)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_words_and_segments() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"words":[{{"text":"hello","start":0.5,"end":0.9}}],"segments":[{{"start":0.5,"end":2.0,"text":"hello there"}}]}}"#
        )
        .unwrap();

        let transcript = load_transcript(file.path()).unwrap();
        assert_eq!(transcript.words.len(), 1);
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.words[0].text, "hello");
    }

    #[test]
    fn test_words_resorted_by_start() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"words":[{{"text":"b","start":2.0,"end":2.5}},{{"text":"a","start":1.0,"end":1.5}}]}}"#
        )
        .unwrap();

        let transcript = load_transcript(file.path()).unwrap();
        assert_eq!(transcript.words[0].text, "a");
    }

    #[test]
    fn test_inverted_word_interval_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"words":[{{"text":"x","start":2.0,"end":1.0}}]}}"#
        )
        .unwrap();

        assert!(load_transcript(file.path()).is_err());
    }

    #[test]
    fn test_empty_object_is_empty_transcript() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let transcript = load_transcript(file.path()).unwrap();
        assert!(transcript.is_empty());
    }
}
