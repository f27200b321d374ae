//! Downsampled waveform preview for UI consumption.

/// Build a normalized peak-amplitude preview of the recording.
///
/// The recording is split into `bins` equal spans; each bin holds the peak
/// absolute amplitude inside its span, normalized so the loudest bin is 1.0.
/// Short recordings produce fewer bins (one per sample at most); empty input
/// produces an empty preview.
pub fn waveform_preview(samples: &[f32], bins: usize) -> Vec<f32> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    let bins = bins.min(samples.len());
    let span = samples.len().div_ceil(bins);

    let mut peaks: Vec<f32> = samples
        .chunks(span)
        .map(|chunk| chunk.iter().fold(0.0f32, |acc, s| acc.max(s.abs())))
        .collect();

    let max = peaks.iter().fold(0.0f32, |acc, p| acc.max(*p));
    if max > 0.0 {
        for p in &mut peaks {
            *p /= max;
        }
    }

    peaks
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_preview() {
        assert!(waveform_preview(&[], 100).is_empty());
        assert!(waveform_preview(&[0.5], 0).is_empty());
    }

    #[test]
    fn test_preview_is_normalized() {
        let samples = vec![0.1, -0.4, 0.2, 0.0, 0.1, 0.05, -0.2, 0.1];
        let preview = waveform_preview(&samples, 4);
        assert_eq!(preview.len(), 4);
        assert_eq!(preview.iter().fold(0.0f32, |a, p| a.max(*p)), 1.0);
    }

    #[test]
    fn test_preview_caps_bins_at_sample_count() {
        let samples = vec![0.5, -0.5];
        let preview = waveform_preview(&samples, 100);
        assert_eq!(preview.len(), 2);
    }

    #[test]
    fn test_silent_input_stays_zero() {
        let samples = vec![0.0; 64];
        let preview = waveform_preview(&samples, 8);
        assert!(preview.iter().all(|p| *p == 0.0));
    }
}
