//! Clipscout - clip-worthy interval detection for spoken audio.
//!
//! This crate analyzes long-form spoken recordings (podcasts, streams,
//! interviews) and emits short, structurally valid clip suggestions.

#![warn(missing_docs)]

pub mod audio;
pub mod captions;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod score;
pub mod transcript;
pub mod validate;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command};
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use constants::exit_codes;
use pipeline::{
    ProcessCheck, collect_input_files, default_transcript_path, output_dir_for, process_file,
    should_process,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the clipscout CLI. Returns the process exit
/// code: 0 for clean output, 1 when auto-fixes were applied, 2 when
/// clips had to be dropped.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    let config = load_default_config()?;
    validate_config(&config)?;

    if let Some(command) = cli.command {
        handle_command(command)?;
        return Ok(exit_codes::SUCCESS);
    }

    if cli.inputs.is_empty() {
        use clap::CommandFactory;
        Cli::command()
            .print_help()
            .map_err(|e| Error::Internal {
                message: format!("failed to print help: {e}"),
            })?;
        return Ok(exit_codes::SUCCESS);
    }

    analyze_files(&cli.inputs, &cli.analyze, config)
}

/// Analyze input files with the given options.
fn analyze_files(inputs: &[PathBuf], args: &AnalyzeArgs, mut config: Config) -> Result<i32> {
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    info!("Found {} audio file(s) to process", files.len());

    // CLI overrides on top of the config file
    if let Some(max_clips) = args.max_clips {
        config.selection.max_clips = max_clips;
    }
    if let Some(min_gap) = args.min_gap {
        config.selection.min_gap_secs = min_gap;
    }
    if let Some(formats) = args.format.clone() {
        config.output.formats = formats;
    }
    if let Some(vad) = args.vad {
        config.vad.mode = vad;
    }
    if args.strict {
        config.autofix.enabled = false;
    }
    if args.keep_rejected {
        config.gate.keep_rejected = true;
    }
    validate_config(&config)?;

    let output_dir = args.output_dir.clone();
    let progress_enabled = !args.quiet && !args.no_progress;
    let file_progress = output::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_clips = 0;
    let mut total_fixed = 0;
    let mut total_dropped = 0;

    for file in &files {
        let file_output_dir = output_dir_for(file, output_dir.as_deref());

        match should_process(file, &file_output_dir, &config.output.formats, args.force) {
            ProcessCheck::SkipExists => {
                info!("Skipping (output exists): {}", file.display());
                skipped += 1;
                output::inc_progress(file_progress.as_ref());
                continue;
            }
            ProcessCheck::Process => {}
        }

        let transcript_path = args
            .transcript
            .clone()
            .unwrap_or_else(|| default_transcript_path(file));

        match process_file(
            file,
            Some(&transcript_path),
            &file_output_dir,
            &config,
            progress_enabled,
        ) {
            Ok(result) => {
                processed += 1;
                total_clips += result.clips;
                total_fixed += result.clips_fixed;
                total_dropped += result.clips_dropped;
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    output::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        output::inc_progress(file_progress.as_ref());
    }

    output::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} total clips in {:.2}s",
        processed, skipped, errors, total_clips, total_duration
    );
    if total_fixed > 0 {
        info!("{total_fixed} clip(s) needed auto-fixes");
    }
    if errors > 0 && !args.fail_fast {
        warn!("{errors} file(s) had errors");
    }

    if total_dropped > 0 || errors > 0 {
        Ok(exit_codes::HARD_FAILURE)
    } else if total_fixed > 0 {
        Ok(exit_codes::FIXED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
