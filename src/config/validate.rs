//! Configuration validation.
//!
//! Malformed thresholds fail fast here, before any audio is decoded. A
//! threshold pair that makes the search space empty by construction (an
//! inverted duration range, a zero hop) is a configuration bug, not a
//! per-clip condition.

use crate::config::Config;
use crate::error::{Error, Result};

fn fail(message: String) -> Error {
    Error::ConfigValidation { message }
}

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_features(config)?;
    validate_vad(config)?;
    validate_patterns(config)?;
    validate_gate(config)?;
    validate_selection(config)?;
    validate_validation(config)?;
    validate_autofix(config)?;
    Ok(())
}

fn validate_features(config: &Config) -> Result<()> {
    let f = &config.features;

    if f.hop_secs <= 0.0 {
        return Err(fail(format!("hop_secs must be positive, got {}", f.hop_secs)));
    }
    if f.smoothing_secs < 0.0 {
        return Err(fail(format!(
            "smoothing_secs must be non-negative, got {}",
            f.smoothing_secs
        )));
    }
    if f.baseline_window_secs <= 0.0 {
        return Err(fail(format!(
            "baseline_window_secs must be positive, got {}",
            f.baseline_window_secs
        )));
    }
    Ok(())
}

fn validate_vad(config: &Config) -> Result<()> {
    let v = &config.vad;

    if !(0.0..=1.0).contains(&v.threshold) {
        return Err(fail(format!(
            "vad.threshold must be between 0.0 and 1.0, got {}",
            v.threshold
        )));
    }
    if v.merge_gap_secs < 0.0 {
        return Err(fail(format!(
            "vad.merge_gap_secs must be non-negative, got {}",
            v.merge_gap_secs
        )));
    }
    if !(0.0..1.0).contains(&v.fallback_percentile) {
        return Err(fail(format!(
            "vad.fallback_percentile must be in [0.0, 1.0), got {}",
            v.fallback_percentile
        )));
    }
    Ok(())
}

fn validate_patterns(config: &Config) -> Result<()> {
    let p = &config.patterns;

    let clip_ranges = [
        ("payoff", p.payoff.min_clip_secs, p.payoff.max_clip_secs),
        (
            "monologue",
            p.monologue.min_clip_secs,
            p.monologue.max_clip_secs,
        ),
        ("debate", p.debate.min_clip_secs, p.debate.max_clip_secs),
        (
            "laughter",
            p.laughter.min_clip_secs,
            p.laughter.max_clip_secs,
        ),
    ];
    for (name, min, max) in clip_ranges {
        if min <= 0.0 || max <= min {
            return Err(fail(format!(
                "patterns.{name}: clip duration range [{min}, {max}] is empty"
            )));
        }
    }

    if p.payoff.min_silence_secs <= 0.0 || p.payoff.max_silence_secs <= p.payoff.min_silence_secs {
        return Err(fail(format!(
            "patterns.payoff: silence run range [{}, {}] is empty",
            p.payoff.min_silence_secs, p.payoff.max_silence_secs
        )));
    }
    if p.payoff.min_sustain_secs <= 0.0 || p.payoff.lookahead_secs <= 0.0 {
        return Err(fail(
            "patterns.payoff: lookahead and sustain must be positive".to_string(),
        ));
    }
    if p.payoff.spike_threshold <= p.payoff.silence_threshold {
        return Err(fail(format!(
            "patterns.payoff: spike_threshold ({}) must exceed silence_threshold ({})",
            p.payoff.spike_threshold, p.payoff.silence_threshold
        )));
    }

    if !(0.0..=1.0).contains(&p.monologue.density_threshold) {
        return Err(fail(format!(
            "patterns.monologue.density_threshold must be between 0.0 and 1.0, got {}",
            p.monologue.density_threshold
        )));
    }
    if p.monologue.min_region_secs <= 0.0 {
        return Err(fail(
            "patterns.monologue.min_region_secs must be positive".to_string(),
        ));
    }

    if p.debate.min_turns == 0 {
        return Err(fail(
            "patterns.debate.min_turns must be at least 1".to_string(),
        ));
    }
    if p.debate.max_gap_secs <= 0.0 || p.debate.min_window_secs <= 0.0 {
        return Err(fail(
            "patterns.debate: max_gap_secs and min_window_secs must be positive".to_string(),
        ));
    }

    if !(0.0..1.0).contains(&p.laughter.percentile) {
        return Err(fail(format!(
            "patterns.laughter.percentile must be in [0.0, 1.0), got {}",
            p.laughter.percentile
        )));
    }
    if p.laughter.max_region_secs <= p.laughter.min_region_secs {
        return Err(fail(format!(
            "patterns.laughter: region range [{}, {}] is empty",
            p.laughter.min_region_secs, p.laughter.max_region_secs
        )));
    }
    let weight_sum = p.laughter.energy_weight
        + p.laughter.centroid_weight
        + p.laughter.zcr_weight
        + p.laughter.burst_weight;
    if weight_sum <= 0.0 {
        return Err(fail(
            "patterns.laughter: composite weights must sum to a positive value".to_string(),
        ));
    }
    Ok(())
}

fn validate_gate(config: &Config) -> Result<()> {
    let g = &config.gate;

    if !(0.0..=1.0).contains(&g.min_speech_ratio) {
        return Err(fail(format!(
            "gate.min_speech_ratio must be between 0.0 and 1.0, got {}",
            g.min_speech_ratio
        )));
    }
    if !(0.0..=1.0).contains(&g.max_flatness) {
        return Err(fail(format!(
            "gate.max_flatness must be between 0.0 and 1.0, got {}",
            g.max_flatness
        )));
    }
    if g.min_speech_secs < 0.0 {
        return Err(fail(format!(
            "gate.min_speech_secs must be non-negative, got {}",
            g.min_speech_secs
        )));
    }

    let w = &g.weights;
    if w.pattern < 0.0 || w.hook < 0.0 || w.coherence < 0.0 {
        return Err(fail("gate.weights must be non-negative".to_string()));
    }
    if w.pattern + w.hook + w.coherence <= 0.0 {
        return Err(fail(
            "gate.weights must sum to a positive value".to_string(),
        ));
    }
    Ok(())
}

fn validate_selection(config: &Config) -> Result<()> {
    let s = &config.selection;

    if s.max_clips == 0 {
        return Err(fail("selection.max_clips must be at least 1".to_string()));
    }
    if s.min_gap_secs < 0.0 {
        return Err(fail(format!(
            "selection.min_gap_secs must be non-negative, got {}",
            s.min_gap_secs
        )));
    }
    Ok(())
}

fn validate_validation(config: &Config) -> Result<()> {
    let v = &config.validation;

    if v.min_clip_secs <= 0.0 || v.max_clip_secs <= v.min_clip_secs {
        return Err(fail(format!(
            "validation: clip duration range [{}, {}] is empty",
            v.min_clip_secs, v.max_clip_secs
        )));
    }
    if v.word_tolerance_secs < 0.0 {
        return Err(fail(format!(
            "validation.word_tolerance_secs must be non-negative, got {}",
            v.word_tolerance_secs
        )));
    }
    if v.max_caption_words == 0 {
        return Err(fail(
            "validation.max_caption_words must be at least 1".to_string(),
        ));
    }
    if v.max_caption_secs <= v.min_caption_secs {
        return Err(fail(format!(
            "validation: caption duration range [{}, {}] is empty",
            v.min_caption_secs, v.max_caption_secs
        )));
    }
    Ok(())
}

fn validate_autofix(config: &Config) -> Result<()> {
    if config.autofix.max_adjustment_secs < 0.0 {
        return Err(fail(format!(
            "autofix.max_adjustment_secs must be non-negative, got {}",
            config.autofix.max_adjustment_secs
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_hop_rejected() {
        let mut config = Config::default();
        config.features.hop_secs = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_inverted_clip_bounds_rejected() {
        let mut config = Config::default();
        config.validation.min_clip_secs = 60.0;
        config.validation.max_clip_secs = 15.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_silence_range_rejected() {
        let mut config = Config::default();
        config.patterns.payoff.max_silence_secs = config.patterns.payoff.min_silence_secs;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut config = Config::default();
        config.gate.weights.pattern = 0.0;
        config.gate.weights.hook = 0.0;
        config.gate.weights.coherence = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_max_clips_rejected() {
        let mut config = Config::default();
        config.selection.max_clips = 0;
        assert!(validate_config(&config).is_err());
    }
}
