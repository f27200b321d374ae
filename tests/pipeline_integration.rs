//! End-to-end pipeline tests over synthetic audio.

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation)]

use clipscout::config::{Config, OutputFormat, VadMode};
use clipscout::pipeline::process_file;
use std::f32::consts::TAU;
use std::path::Path;

const SAMPLE_RATE: u32 = 16_000;

/// Write a WAV with speech-like tone bursts separated by near-silence.
/// Bursts of 2 s on, 0.2 s off, for the requested duration.
fn write_bursty_wav(path: &Path, duration_secs: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();

    let total = (duration_secs * SAMPLE_RATE as f32) as usize;
    for i in 0..total {
        let t = i as f32 / SAMPLE_RATE as f32;
        let cycle = t % 2.2;
        let sample = if cycle < 2.0 {
            // Crude vowel-ish mix, loud enough to register as speech
            0.4 * (TAU * 220.0 * t).sin() + 0.2 * (TAU * 660.0 * t).sin()
        } else {
            0.005 * (TAU * 100.0 * t).sin()
        };
        #[allow(clippy::cast_possible_truncation)]
        writer.write_sample((sample * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_transcript(path: &Path, duration_secs: f32) {
    let mut words = Vec::new();
    let mut t = 0.1_f32;
    let mut i = 0;
    while t < duration_secs - 0.5 {
        words.push(serde_json::json!({
            "text": format!("word{i}"),
            "start": t,
            "end": t + 0.3,
        }));
        t += 0.45;
        i += 1;
    }
    let transcript = serde_json::json!({ "words": words, "segments": [] });
    std::fs::write(path, serde_json::to_string(&transcript).unwrap()).unwrap();
}

fn test_config() -> Config {
    let mut config = Config::default();
    // The Silero model may be unavailable in CI
    config.vad.mode = VadMode::Energy;
    config.output.formats = vec![OutputFormat::Json, OutputFormat::Csv];
    config
}

#[test]
fn test_process_file_writes_all_formats() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("episode.wav");
    let transcript = dir.path().join("episode.json");
    write_bursty_wav(&audio, 90.0);
    write_transcript(&transcript, 90.0);

    let result =
        process_file(&audio, Some(&transcript), dir.path(), &test_config(), false).unwrap();

    assert!((result.audio_duration_secs - 90.0).abs() < 0.5);

    let json_path = dir.path().join("episode.clipscout.json");
    let csv_path = dir.path().join("episode.clipscout.csv");
    assert!(json_path.exists());
    assert!(csv_path.exists());

    let contents = std::fs::read_to_string(&json_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["source_file"], "episode.wav");
    assert!(parsed["clips"].is_array());
    assert!(parsed["summary"]["audio_duration_seconds"].as_f64().unwrap() > 80.0);
    assert!(parsed["waveform_preview"].as_array().unwrap().len() <= 1000);
}

#[test]
fn test_process_file_without_transcript_still_works() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("episode.wav");
    write_bursty_wav(&audio, 60.0);

    let missing = dir.path().join("missing.json");
    let result = process_file(&audio, Some(&missing), dir.path(), &test_config(), false).unwrap();
    assert!(result.audio_duration_secs > 59.0);

    let json_path = dir.path().join("episode.clipscout.json");
    assert!(json_path.exists());
}

#[test]
fn test_emitted_clips_respect_structure() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("episode.wav");
    let transcript = dir.path().join("episode.json");
    write_bursty_wav(&audio, 120.0);
    write_transcript(&transcript, 120.0);

    process_file(&audio, Some(&transcript), dir.path(), &test_config(), false).unwrap();

    let contents = std::fs::read_to_string(dir.path().join("episode.clipscout.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let clips = parsed["clips"].as_array().unwrap();

    // Every emitted clip is structurally valid and ordered
    let mut prev_end = f64::MIN;
    for clip in clips {
        let start = clip["start"].as_f64().unwrap();
        let end = clip["end"].as_f64().unwrap();
        let duration = end - start;
        assert!(duration >= 15.0 - 1e-3, "clip shorter than 15s: {duration}");
        assert!(duration <= 60.0 + 1e-3, "clip longer than 60s: {duration}");
        assert!(start >= prev_end, "clips overlap");
        prev_end = end;
        assert!(clip["score"].as_f64().unwrap() <= 100.0);
    }
}
