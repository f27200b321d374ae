//! Single file processing pipeline.
//!
//! Decode, extract features, detect patterns, snap boundaries, gate,
//! select, caption, validate, fix, write.

use crate::audio::{decode_recording, waveform_preview};
use crate::captions::build_captions;
use crate::config::Config;
use crate::detect::{SnapOutcome, SnapParams, detect_all, snap_to_speech};
use crate::error::{Error, Result};
use crate::features::{self, FeatureSet, resolve_detector};
use crate::output::{self, JsonResultFile};
use crate::pipeline::output_path_for;
use crate::score::{ScoredClip, apply_gate, select};
use crate::transcript::{Transcript, load_transcript};
use crate::validate::{Clip, apply_fixes, validate_batch};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of clips written.
    pub clips: usize,
    /// Number of clips repaired by the auto-fix pass.
    pub clips_fixed: usize,
    /// Number of clips dropped as unfixable.
    pub clips_dropped: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Audio duration in seconds.
    pub audio_duration_secs: f32,
}

/// Process a single audio file and write clip results.
pub fn process_file(
    input_path: &Path,
    transcript_path: Option<&Path>,
    output_dir: &Path,
    config: &Config,
    progress_enabled: bool,
) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let file_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let spinner = output::create_stage_spinner(file_name, progress_enabled);

    output::set_stage(spinner.as_ref(), &format!("{file_name}: decoding"));
    let decoded = decode_recording(input_path)?;
    let audio_duration_secs = decoded.duration_secs;
    info!("Decoded {audio_duration_secs:.1}s of audio");

    let transcript = match transcript_path {
        Some(path) if path.exists() => Some(load_transcript(path)?),
        Some(path) => {
            warn!(
                "Transcript '{}' not found, captions and word checks disabled",
                path.display()
            );
            None
        }
        None => None,
    };
    let words = transcript.as_ref().map_or(&[][..], |t| t.words.as_slice());

    output::set_stage(spinner.as_ref(), &format!("{file_name}: extracting features"));
    let mut detector = resolve_detector(&config.vad)?;
    let features = features::extract(
        &decoded.samples,
        decoded.sample_rate,
        &config.features,
        &config.vad,
        detector.as_mut(),
    )?;
    debug!(
        frames = features.len(),
        segments = features.segments.len(),
        "feature extraction complete"
    );

    output::set_stage(spinner.as_ref(), &format!("{file_name}: detecting patterns"));
    let mut candidates = detect_all(&features, &config.patterns);
    info!("Found {} candidate intervals", candidates.len());

    snap_candidates(&mut candidates, &features, config);

    output::set_stage(spinner.as_ref(), &format!("{file_name}: scoring"));
    let gated = apply_gate(&features, candidates, &config.gate);
    debug!(
        accepted = gated.accepted.len(),
        rejected = gated.rejected.len(),
        "clipworthiness gate applied"
    );

    let picked = select(gated.accepted, &config.selection);

    let clips = finish_clips(picked, transcript.as_ref(), config);

    output::set_stage(spinner.as_ref(), &format!("{file_name}: validating"));
    let report = validate_batch(&clips, words, &config.validation);
    let summary = apply_fixes(
        clips,
        &report.reports,
        words,
        audio_duration_secs,
        &config.validation,
        &config.autofix,
    );

    let clips_fixed = summary
        .outcomes
        .iter()
        .filter(|(_, o)| matches!(o, crate::validate::FixOutcome::Fixed(_)))
        .count();
    let clips_dropped = summary.dropped_count();
    if clips_dropped > 0 {
        warn!("{clips_dropped} clip(s) dropped as unfixable");
    }

    output::set_stage(spinner.as_ref(), &format!("{file_name}: writing output"));
    let preview = waveform_preview(&decoded.samples, config.output.preview_bins);
    write_outputs(
        input_path,
        output_dir,
        config,
        detector.name(),
        summary.clips.clone(),
        gated.rejected,
        preview,
        audio_duration_secs,
        clips_fixed,
        clips_dropped,
    )?;

    output::finish_progress(spinner, &format!("{file_name}: done"));

    let duration_secs = start_time.elapsed().as_secs_f64();
    let realtime_factor = if duration_secs > 0.0 {
        f64::from(audio_duration_secs) / duration_secs
    } else {
        0.0
    };
    info!(
        "Wrote {} clips in {:.2}s ({:.1}x realtime)",
        summary.clips.len(),
        duration_secs,
        realtime_factor
    );

    Ok(ProcessResult {
        clips: summary.clips.len(),
        clips_fixed,
        clips_dropped,
        duration_secs,
        audio_duration_secs,
    })
}

/// Snap every candidate's boundaries to speech segment edges, keeping
/// the per-pattern duration bounds.
fn snap_candidates(
    candidates: &mut [crate::detect::ClipCandidate],
    features: &FeatureSet,
    config: &Config,
) {
    for candidate in candidates.iter_mut() {
        let (min_duration, max_duration) = pattern_bounds(candidate.pattern, config);
        let params = SnapParams {
            min_duration,
            max_duration,
            snap_window: config.snap.window_secs,
            tail_padding: config.snap.tail_padding_secs,
        };
        let result = snap_to_speech(
            candidate.start,
            candidate.end,
            &features.segments,
            features.duration_secs,
            &params,
        );
        if result.outcome == SnapOutcome::Snapped {
            debug!(
                id = candidate.id,
                from = candidate.start,
                to = result.start,
                "boundary snapped"
            );
        }
        candidate.start = result.start;
        candidate.end = result.end;
    }
}

fn pattern_bounds(pattern: crate::detect::PatternKind, config: &Config) -> (f32, f32) {
    use crate::detect::PatternKind;
    let p = &config.patterns;
    match pattern {
        PatternKind::Payoff => (p.payoff.min_clip_secs, p.payoff.max_clip_secs),
        PatternKind::Monologue => (p.monologue.min_clip_secs, p.monologue.max_clip_secs),
        PatternKind::Debate => (p.debate.min_clip_secs, p.debate.max_clip_secs),
        PatternKind::Laughter => (p.laughter.min_clip_secs, p.laughter.max_clip_secs),
    }
}

/// Turn selected scored clips into output clips with captions.
fn finish_clips(picked: Vec<ScoredClip>, transcript: Option<&Transcript>, config: &Config) -> Vec<Clip> {
    picked
        .into_iter()
        .map(|scored| {
            let captions = transcript.map_or_else(Vec::new, |t| {
                build_captions(
                    &t.words,
                    scored.start(),
                    scored.end(),
                    config.validation.max_caption_words,
                )
            });
            Clip {
                id: scored.display_id.unwrap_or(scored.candidate.id),
                pattern: scored.candidate.pattern,
                start: scored.start(),
                end: scored.end(),
                score: scored.score,
                captions,
                metrics: scored.candidate.metrics,
            }
        })
        .collect()
}

/// Write results in every configured format.
#[allow(clippy::too_many_arguments)]
fn write_outputs(
    input_path: &Path,
    output_dir: &Path,
    config: &Config,
    vad_name: &str,
    clips: Vec<Clip>,
    rejected: Vec<ScoredClip>,
    preview: Vec<f32>,
    audio_duration: f32,
    clips_fixed: usize,
    clips_dropped: usize,
) -> Result<()> {
    use crate::config::OutputFormat;

    let file_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    for format in &config.output.formats {
        let output_path = output_path_for(input_path, output_dir, *format);
        debug!("Writing {format:?} output: {}", output_path.display());
        match format {
            OutputFormat::Json => {
                let result = JsonResultFile::new(
                    file_name,
                    config,
                    vad_name,
                    clips.clone(),
                    rejected.clone(),
                    preview.clone(),
                    audio_duration,
                    clips_fixed,
                    clips_dropped,
                );
                result.write(&output_path)?;
            }
            OutputFormat::Csv => output::write_csv(&output_path, &clips)?,
        }
    }

    Ok(())
}
