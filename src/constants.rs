//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "clipscout";

/// Default feature hop length in seconds.
pub const DEFAULT_HOP_SECS: f32 = 0.05;

/// Default energy smoothing window in seconds.
pub const DEFAULT_SMOOTHING_SECS: f32 = 0.5;

/// Default rolling-median baseline window in seconds.
pub const DEFAULT_BASELINE_WINDOW_SECS: f32 = 10.0;

/// FFT window size for spectral features.
///
/// 1024 samples gives ~64 ms of context at 16 kHz, enough frequency
/// resolution for centroid/flatness on speech while keeping frames causal.
pub const FFT_SIZE: usize = 1024;

/// Sample rate expected by the Silero VAD model.
pub const VAD_SAMPLE_RATE: u32 = 16_000;

/// Silero VAD frame size at 16 kHz.
pub const VAD_FRAME_SIZE: usize = 512;

/// Default speech probability threshold for the VAD.
pub const DEFAULT_VAD_THRESHOLD: f32 = 0.5;

/// Default gap below which adjacent speech segments are merged, in seconds.
pub const DEFAULT_MERGE_GAP_SECS: f32 = 0.3;

/// Energy percentile used by the fallback voice detector.
pub const FALLBACK_VAD_PERCENTILE: f32 = 0.4;

/// Default maximum number of clips to select per recording.
pub const DEFAULT_MAX_CLIPS: usize = 5;

/// Default minimum gap between selected clip starts, in seconds.
pub const DEFAULT_MIN_GAP_SECS: f32 = 30.0;

/// Default minimum valid clip duration in seconds.
pub const DEFAULT_MIN_CLIP_SECS: f32 = 15.0;

/// Default maximum valid clip duration in seconds.
pub const DEFAULT_MAX_CLIP_SECS: f32 = 60.0;

/// Default tolerance for a clip boundary falling inside a transcript word.
pub const DEFAULT_WORD_TOLERANCE_SECS: f32 = 0.05;

/// Default maximum boundary adjustment the auto-fixer may apply, in seconds.
pub const DEFAULT_MAX_ADJUSTMENT_SECS: f32 = 0.25;

/// Default maximum words per caption.
pub const DEFAULT_MAX_CAPTION_WORDS: usize = 8;

/// Default snap window for aligning clip edges to speech boundaries.
pub const DEFAULT_SNAP_WINDOW_SECS: f32 = 0.75;

/// Default padding appended after the snapped clip end.
pub const DEFAULT_TAIL_PADDING_SECS: f32 = 0.15;

/// Distance at which boundary coherence decays to zero, in seconds.
pub const COHERENCE_DECAY_SECS: f32 = 0.75;

/// Length of the leading window used for hook scoring, in seconds.
pub const HOOK_WINDOW_SECS: f32 = 3.0;

/// Number of bins in the waveform preview handed to UIs.
pub const DEFAULT_PREVIEW_BINS: usize = 1000;

/// Epsilon guarding divisions by near-zero baselines.
pub const BASELINE_EPSILON: f32 = 1e-6;

/// Output file extensions by format.
pub mod output_extensions {
    /// JSON result extension.
    pub const JSON: &str = ".clipscout.json";
    /// CSV result extension.
    pub const CSV: &str = ".clipscout.csv";
}

/// Process exit codes for the CLI contract.
pub mod exit_codes {
    /// All emitted clips were valid as produced.
    pub const SUCCESS: i32 = 0;
    /// Recoverable: at least one clip needed an auto-fix.
    pub const FIXED: i32 = 1;
    /// Hard failure: clips dropped, or strict mode violated.
    pub const HARD_FAILURE: i32 = 2;
}
