//! JSON result file writer.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::score::ScoredClip;
use crate::validate::Clip;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON result file structure.
#[derive(Debug, Serialize)]
pub struct JsonResultFile {
    /// Source audio file name.
    pub source_file: String,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Analysis settings.
    pub settings: JsonSettings,
    /// Final clips in start order.
    pub clips: Vec<Clip>,
    /// Hard-gate rejects, present only in debug runs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<ScoredClip>,
    /// Downsampled absolute-peak waveform, normalized to 1.0.
    pub waveform_preview: Vec<f32>,
    /// Summary statistics.
    pub summary: JsonSummary,
}

/// The settings that shaped this result.
#[derive(Debug, Serialize)]
pub struct JsonSettings {
    /// Maximum number of clips requested.
    pub max_clips: usize,
    /// Minimum gap between clip starts in seconds.
    pub min_gap_secs: f32,
    /// Voice activity detector that was used.
    pub vad: String,
    /// Whether the auto-fix pass was enabled.
    pub autofix_enabled: bool,
}

/// Summary statistics.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    /// Number of clips in the output.
    pub total_clips: usize,
    /// Combined clip runtime in seconds.
    pub total_clip_seconds: f32,
    /// Clips per pattern.
    pub clips_per_pattern: BTreeMap<String, usize>,
    /// Number of clips repaired by the auto-fix pass.
    pub clips_fixed: usize,
    /// Number of clips dropped as unfixable.
    pub clips_dropped: usize,
    /// Audio duration in seconds.
    pub audio_duration_seconds: f32,
}

impl JsonResultFile {
    /// Assemble a result file from the pipeline products.
    pub fn new(
        source_file: &str,
        config: &Config,
        vad_name: &str,
        clips: Vec<Clip>,
        rejected: Vec<ScoredClip>,
        waveform_preview: Vec<f32>,
        audio_duration: f32,
        clips_fixed: usize,
        clips_dropped: usize,
    ) -> Self {
        let mut clips_per_pattern: BTreeMap<String, usize> = BTreeMap::new();
        for clip in &clips {
            *clips_per_pattern
                .entry(clip.pattern.to_string())
                .or_insert(0) += 1;
        }

        let summary = JsonSummary {
            total_clips: clips.len(),
            total_clip_seconds: clips.iter().map(Clip::duration).sum(),
            clips_per_pattern,
            clips_fixed,
            clips_dropped,
            audio_duration_seconds: audio_duration,
        };

        Self {
            source_file: source_file.to_string(),
            analysis_date: Utc::now(),
            settings: JsonSettings {
                max_clips: config.selection.max_clips,
                min_gap_secs: config.selection.min_gap_secs,
                vad: vad_name.to_string(),
                autofix_enabled: config.autofix.enabled,
            },
            clips,
            rejected,
            waveform_preview,
            summary,
        }
    }

    /// Write the result file as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| Error::JsonWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detect::PatternKind;

    fn clip(id: u32, pattern: PatternKind, start: f32, end: f32) -> Clip {
        Clip {
            id,
            pattern,
            start,
            end,
            score: 80.0,
            captions: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_counts_patterns() {
        let result = JsonResultFile::new(
            "episode.mp3",
            &Config::default(),
            "silero",
            vec![
                clip(1, PatternKind::Payoff, 10.0, 30.0),
                clip(2, PatternKind::Payoff, 100.0, 120.0),
                clip(3, PatternKind::Laughter, 200.0, 220.0),
            ],
            Vec::new(),
            vec![0.5; 10],
            600.0,
            1,
            0,
        );

        assert_eq!(result.summary.total_clips, 3);
        assert_eq!(result.summary.clips_per_pattern["payoff"], 2);
        assert_eq!(result.summary.clips_per_pattern["laughter"], 1);
        assert!((result.summary.total_clip_seconds - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_written_file_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.clipscout.json");
        let result = JsonResultFile::new(
            "episode.mp3",
            &Config::default(),
            "energy",
            vec![clip(1, PatternKind::Monologue, 10.0, 35.0)],
            Vec::new(),
            Vec::new(),
            600.0,
            0,
            0,
        );
        result.write(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["source_file"], "episode.mp3");
        assert_eq!(parsed["clips"][0]["pattern"], "monologue");
        // Empty debug list stays out of the file entirely
        assert!(parsed.get("rejected").is_none());
    }
}
