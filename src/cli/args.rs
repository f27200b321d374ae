//! CLI argument definitions.

use crate::config::{OutputFormat, VadMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Clip-worthy interval detection for spoken audio.
#[derive(Debug, Parser)]
#[command(name = "clipscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input audio files or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Word-level transcript JSON (default: input path with .json extension).
    #[arg(short, long, env = "CLIPSCOUT_TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_enum, value_delimiter = ',', env = "CLIPSCOUT_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "CLIPSCOUT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of clips to emit.
    #[arg(short = 'n', long, env = "CLIPSCOUT_MAX_CLIPS")]
    pub max_clips: Option<usize>,

    /// Minimum gap between clip starts in seconds.
    #[arg(long, env = "CLIPSCOUT_MIN_GAP")]
    pub min_gap: Option<f32>,

    /// Voice activity detector to use.
    #[arg(long, value_enum, env = "CLIPSCOUT_VAD")]
    pub vad: Option<VadMode>,

    /// Disable the auto-fix pass; validation errors drop the clip.
    #[arg(long)]
    pub strict: bool,

    /// Keep hard-gate rejects in the JSON output for debugging.
    #[arg(long)]
    pub keep_rejected: bool,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable progress bars (logging unaffected).
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
