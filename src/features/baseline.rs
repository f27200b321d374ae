//! Rolling statistics used as spike-robust references.

/// Rolling median over a centered window.
///
/// The window length is forced odd and at least 3 frames so the median is
/// always a real element. Edges clamp the window inside the signal, so the
/// output has the same length as the input.
pub fn rolling_median(values: &[f32], window: usize) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }

    let window = window.max(3) | 1;
    let half = window / 2;
    let mut out = Vec::with_capacity(values.len());
    let mut scratch: Vec<f32> = Vec::with_capacity(window);

    for i in 0..values.len() {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(values.len());
        scratch.clear();
        scratch.extend_from_slice(&values[lo..hi]);
        scratch.sort_by(f32::total_cmp);
        out.push(scratch[scratch.len() / 2]);
    }

    out
}

/// Centered moving average with edge clamping.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    if values.is_empty() || window <= 1 {
        return values.to_vec();
    }

    let half = window / 2;
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(values.len());
        #[allow(clippy::cast_precision_loss)]
        let mean = values[lo..hi].iter().sum::<f32>() / (hi - lo) as f32;
        out.push(mean);
    }

    out
}

/// Value at the given percentile (0.0-1.0) of the input, by sorting.
///
/// Returns 0.0 for empty input.
pub fn percentile(values: &[f32], p: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f32> = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let idx = ((sorted.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    sorted[idx]
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_median_flat_signal() {
        let values = vec![2.0; 10];
        assert_eq!(rolling_median(&values, 5), values);
    }

    #[test]
    fn test_rolling_median_rejects_spike() {
        let mut values = vec![1.0; 11];
        values[5] = 100.0;
        let medians = rolling_median(&values, 5);
        // The spike does not move the local median
        assert_eq!(medians[5], 1.0);
    }

    #[test]
    fn test_rolling_median_forces_odd_window() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        // Window of 4 behaves as 5
        assert_eq!(rolling_median(&values, 4), rolling_median(&values, 5));
    }

    #[test]
    fn test_rolling_median_empty() {
        assert!(rolling_median(&[], 5).is_empty());
    }

    #[test]
    fn test_moving_average_smooths() {
        let values = vec![0.0, 0.0, 3.0, 0.0, 0.0];
        let smoothed = moving_average(&values, 3);
        assert_eq!(smoothed[2], 1.0);
        assert!(smoothed[1] > 0.0);
    }

    #[test]
    fn test_percentile_bounds() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 5.0);
        assert_eq!(percentile(&values, 0.5), 3.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }
}
