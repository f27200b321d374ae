//! CSV output: one flat row per clip.

use crate::error::{Error, Result};
use crate::validate::Clip;
use serde::Serialize;
use std::path::Path;

/// One CSV row.
#[derive(Debug, Serialize)]
struct ClipRow<'a> {
    id: u32,
    pattern: &'a str,
    start_secs: f32,
    end_secs: f32,
    duration_secs: f32,
    score: f32,
    captions: usize,
    text: String,
}

impl<'a> ClipRow<'a> {
    fn from_clip(clip: &'a Clip) -> Self {
        let text = clip
            .captions
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: clip.id,
            pattern: clip.pattern.as_str(),
            start_secs: clip.start,
            end_secs: clip.end,
            duration_secs: clip.duration(),
            score: clip.score,
            captions: clip.captions.len(),
            text,
        }
    }
}

/// Write all clips as a CSV table with a header row.
pub fn write_csv(path: &Path, clips: &[Clip]) -> Result<()> {
    let map_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(map_err)?;
    for clip in clips {
        writer.serialize(ClipRow::from_clip(clip)).map_err(map_err)?;
    }
    writer.flush()?;
    Ok(())
}
