//! CLI surface tests.

#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_help_lists_analysis_flags() {
    let mut cmd = Command::new(cargo_bin("clipscout"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--transcript"))
        .stdout(predicate::str::contains("--max-clips"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_no_inputs_prints_help() {
    let mut cmd = Command::new(cargo_bin("clipscout"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_config_path_prints_a_path() {
    let mut cmd = Command::new(cargo_bin("clipscout"));
    cmd.arg("config").arg("path");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("clipscout"));
}

#[test]
fn test_missing_input_exits_with_hard_failure() {
    let mut cmd = Command::new(cargo_bin("clipscout"));
    cmd.arg("--no-progress").arg("/nonexistent/episode.mp3");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_unreadable_audio_fails_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.wav");
    std::fs::write(&bogus, b"not audio at all").unwrap();

    let mut cmd = Command::new(cargo_bin("clipscout"));
    cmd.arg("--no-progress").arg("-q").arg(&bogus);
    // Per-file failures surface through the exit code
    cmd.assert().code(2);
}
