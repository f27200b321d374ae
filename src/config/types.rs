//! Configuration type definitions.

use crate::constants::{
    DEFAULT_BASELINE_WINDOW_SECS, DEFAULT_HOP_SECS, DEFAULT_MAX_ADJUSTMENT_SECS,
    DEFAULT_MAX_CAPTION_WORDS, DEFAULT_MAX_CLIP_SECS, DEFAULT_MAX_CLIPS, DEFAULT_MERGE_GAP_SECS,
    DEFAULT_MIN_CLIP_SECS, DEFAULT_MIN_GAP_SECS, DEFAULT_PREVIEW_BINS, DEFAULT_SMOOTHING_SECS,
    DEFAULT_SNAP_WINDOW_SECS, DEFAULT_TAIL_PADDING_SECS, DEFAULT_VAD_THRESHOLD,
    DEFAULT_WORD_TOLERANCE_SECS, FALLBACK_VAD_PERCENTILE,
};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feature extraction settings.
    pub features: FeatureConfig,

    /// Voice activity detection settings.
    pub vad: VadConfig,

    /// Per-pattern detector settings.
    pub patterns: PatternsConfig,

    /// Clipworthiness gate settings.
    pub gate: GateConfig,

    /// Boundary snapping settings.
    pub snap: SnapConfig,

    /// Clip selection settings.
    pub selection: SelectionConfig,

    /// Structural validation settings.
    pub validation: ValidationConfig,

    /// Auto-fix settings.
    pub autofix: AutofixConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Feature extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Hop length between feature frames in seconds.
    pub hop_secs: f32,

    /// Moving-average window for smoothed energy in seconds.
    pub smoothing_secs: f32,

    /// Rolling-median baseline window in seconds.
    pub baseline_window_secs: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            hop_secs: DEFAULT_HOP_SECS,
            smoothing_secs: DEFAULT_SMOOTHING_SECS,
            baseline_window_secs: DEFAULT_BASELINE_WINDOW_SECS,
        }
    }
}

/// Voice detector selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VadMode {
    /// Use the Silero model if it initializes, else the energy fallback.
    #[default]
    Auto,
    /// Force the Silero model, fail if unavailable.
    Silero,
    /// Force the energy-percentile fallback.
    Energy,
}

/// Voice activity detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfig {
    /// Which detector implementation to use.
    pub mode: VadMode,

    /// Speech probability threshold (Silero) in 0.0-1.0.
    pub threshold: f32,

    /// Gap below which adjacent speech segments are merged, in seconds.
    pub merge_gap_secs: f32,

    /// Energy percentile for the fallback detector, in 0.0-1.0.
    pub fallback_percentile: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            mode: VadMode::Auto,
            threshold: DEFAULT_VAD_THRESHOLD,
            merge_gap_secs: DEFAULT_MERGE_GAP_SECS,
            fallback_percentile: FALLBACK_VAD_PERCENTILE,
        }
    }
}

/// Per-pattern detector settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Payoff (silence-then-spike) detector.
    pub payoff: PayoffConfig,

    /// Monologue (sustained dense speech) detector.
    pub monologue: MonologueConfig,

    /// Debate (rapid turn exchange) detector.
    pub debate: DebateConfig,

    /// Laughter detector.
    pub laughter: LaughterConfig,
}

/// Payoff detector settings.
///
/// A payoff is a dramatic pause followed by an energy spike: the setup
/// lands, the room reacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Energy deviation at or below which a frame counts as silence.
    pub silence_threshold: f32,

    /// Energy deviation the following spike must reach.
    pub spike_threshold: f32,

    /// Minimum silence run length in seconds.
    pub min_silence_secs: f32,

    /// Maximum silence run length in seconds.
    pub max_silence_secs: f32,

    /// How far past the silence to look for the spike, in seconds.
    pub lookahead_secs: f32,

    /// Minimum time the spike must stay above threshold, in seconds.
    pub min_sustain_secs: f32,

    /// Context added before the silence start, in seconds.
    pub pre_context_secs: f32,

    /// Context added after the spike end, in seconds.
    pub post_context_secs: f32,

    /// Final clip duration bounds for this pattern, in seconds.
    pub min_clip_secs: f32,
    /// Upper clip duration bound in seconds.
    pub max_clip_secs: f32,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            silence_threshold: -0.6,
            spike_threshold: 1.5,
            min_silence_secs: 1.5,
            max_silence_secs: 5.0,
            lookahead_secs: 3.0,
            min_sustain_secs: 0.5,
            pre_context_secs: 3.0,
            post_context_secs: 3.0,
            min_clip_secs: DEFAULT_MIN_CLIP_SECS,
            max_clip_secs: 40.0,
        }
    }
}

/// Monologue detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonologueConfig {
    /// Minimum energy deviation for a frame to count as emphatic speech.
    pub energy_threshold: f32,

    /// Minimum rolling speech density (fraction of voiced frames).
    pub density_threshold: f32,

    /// Rolling window for the speech density mean, in seconds.
    pub density_window_secs: f32,

    /// Minimum region span in seconds.
    pub min_region_secs: f32,

    /// Predicate dips shorter than this do not close the region, in seconds.
    pub gap_tolerance_secs: f32,

    /// Duration contribution to the score is capped here, in seconds.
    pub duration_cap_secs: f32,

    /// Context added before the region, in seconds.
    pub pre_context_secs: f32,

    /// Context added after the region, in seconds.
    pub post_context_secs: f32,

    /// Final clip duration bounds for this pattern, in seconds.
    pub min_clip_secs: f32,
    /// Upper clip duration bound in seconds.
    pub max_clip_secs: f32,
}

impl Default for MonologueConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 0.1,
            density_threshold: 0.7,
            density_window_secs: 2.0,
            min_region_secs: 15.0,
            gap_tolerance_secs: 1.0,
            duration_cap_secs: 45.0,
            pre_context_secs: 2.0,
            post_context_secs: 2.0,
            min_clip_secs: 20.0,
            max_clip_secs: DEFAULT_MAX_CLIP_SECS,
        }
    }
}

/// Debate detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Maximum gap between speech segments within one exchange, in seconds.
    pub max_gap_secs: f32,

    /// Minimum exchange span in seconds.
    pub min_window_secs: f32,

    /// Minimum number of speech turns in the exchange.
    pub min_turns: usize,

    /// Context added before the exchange, in seconds.
    pub pre_context_secs: f32,

    /// Context added after the exchange, in seconds.
    pub post_context_secs: f32,

    /// Final clip duration bounds for this pattern, in seconds.
    pub min_clip_secs: f32,
    /// Upper clip duration bound in seconds.
    pub max_clip_secs: f32,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_gap_secs: 0.25,
            min_window_secs: 10.0,
            min_turns: 6,
            pre_context_secs: 2.0,
            post_context_secs: 2.0,
            min_clip_secs: DEFAULT_MIN_CLIP_SECS,
            max_clip_secs: 45.0,
        }
    }
}

/// Laughter detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaughterConfig {
    /// Percentile of the composite score used as the activity threshold.
    pub percentile: f32,

    /// Moving-average smoothing of the composite, in seconds.
    pub smoothing_secs: f32,

    /// Minimum laughter region span in seconds.
    pub min_region_secs: f32,

    /// Maximum laughter region span in seconds.
    pub max_region_secs: f32,

    /// Context before the laughter, in seconds (the setup that earned it).
    pub pre_context_secs: f32,

    /// Context after the laughter, in seconds.
    pub post_context_secs: f32,

    /// Composite weight for normalized energy.
    pub energy_weight: f32,
    /// Composite weight for normalized spectral centroid.
    pub centroid_weight: f32,
    /// Composite weight for normalized zero-crossing rate.
    pub zcr_weight: f32,
    /// Composite weight for frame-to-frame energy burstiness.
    pub burst_weight: f32,

    /// Final clip duration bounds for this pattern, in seconds.
    pub min_clip_secs: f32,
    /// Upper clip duration bound in seconds.
    pub max_clip_secs: f32,
}

impl Default for LaughterConfig {
    fn default() -> Self {
        Self {
            percentile: 0.85,
            smoothing_secs: 0.4,
            min_region_secs: 2.0,
            max_region_secs: 15.0,
            pre_context_secs: 15.0,
            post_context_secs: 3.0,
            energy_weight: 0.35,
            centroid_weight: 0.25,
            zcr_weight: 0.2,
            burst_weight: 0.2,
            min_clip_secs: DEFAULT_MIN_CLIP_SECS,
            max_clip_secs: 30.0,
        }
    }
}

/// Soft-score ensemble weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight for the raw pattern score.
    pub pattern: f32,
    /// Weight for the hook score.
    pub hook: f32,
    /// Weight for the boundary coherence score.
    pub coherence: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            pattern: 0.7,
            hook: 0.2,
            coherence: 0.1,
        }
    }
}

/// Clipworthiness gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum fraction of voiced frames inside the clip window.
    pub min_speech_ratio: f32,

    /// Maximum median spectral flatness inside the clip window.
    pub max_flatness: f32,

    /// Minimum seconds of speech inside the clip window.
    pub min_speech_secs: f32,

    /// Ensemble weights for the final score.
    pub weights: ScoreWeights,

    /// Keep hard-gate rejects in a debug list (never in the output set).
    pub keep_rejected: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_speech_ratio: 0.55,
            max_flatness: 0.45,
            min_speech_secs: 6.0,
            weights: ScoreWeights::default(),
            keep_rejected: false,
        }
    }
}

/// Boundary snapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Maximum distance a boundary may move to a speech edge, in seconds.
    pub window_secs: f32,

    /// Padding appended after the snapped end, in seconds.
    pub tail_padding_secs: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_SNAP_WINDOW_SECS,
            tail_padding_secs: DEFAULT_TAIL_PADDING_SECS,
        }
    }
}

/// Clip selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum number of clips to emit.
    pub max_clips: usize,

    /// Minimum gap between selected clip starts, in seconds.
    pub min_gap_secs: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_clips: DEFAULT_MAX_CLIPS,
            min_gap_secs: DEFAULT_MIN_GAP_SECS,
        }
    }
}

/// Structural validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum valid clip duration in seconds.
    pub min_clip_secs: f32,

    /// Maximum valid clip duration in seconds.
    pub max_clip_secs: f32,

    /// Tolerance for a boundary falling inside a transcript word, in seconds.
    pub word_tolerance_secs: f32,

    /// Maximum words per caption.
    pub max_caption_words: usize,

    /// Captions shorter than this draw a warning, in seconds.
    pub min_caption_secs: f32,

    /// Captions longer than this draw a warning, in seconds.
    pub max_caption_secs: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_clip_secs: DEFAULT_MIN_CLIP_SECS,
            max_clip_secs: DEFAULT_MAX_CLIP_SECS,
            word_tolerance_secs: DEFAULT_WORD_TOLERANCE_SECS,
            max_caption_words: DEFAULT_MAX_CAPTION_WORDS,
            min_caption_secs: 0.3,
            max_caption_secs: 7.0,
        }
    }
}

/// Auto-fix settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofixConfig {
    /// Whether the auto-fix pass runs at all.
    pub enabled: bool,

    /// Maximum boundary adjustment the fixer may apply, in seconds.
    pub max_adjustment_secs: f32,
}

impl Default for AutofixConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_adjustment_secs: DEFAULT_MAX_ADJUSTMENT_SECS,
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON result file with clips, preview, and summary.
    Json,
    /// Flat CSV table of clips.
    Csv,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,

    /// Number of bins in the waveform preview.
    pub preview_bins: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Json],
            preview_bins: DEFAULT_PREVIEW_BINS,
        }
    }
}
