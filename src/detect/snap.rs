//! Boundary snapping: align clip edges with speech segment edges.
//!
//! A clip that opens mid-word or cuts a speaker off feels broken, so
//! candidate boundaries move to the nearest segment start (for the clip
//! start) and segment end (for the clip end) within a small search
//! window. Snapping is atomic: if the adjusted interval would be
//! invalid or leave the duration bounds, both edges revert to their
//! exact original values.

use crate::features::SpeechSegment;

/// Tunables for one snapping pass.
#[derive(Debug, Clone, Copy)]
pub struct SnapParams {
    /// Lower clip duration bound in seconds.
    pub min_duration: f32,
    /// Upper clip duration bound in seconds.
    pub max_duration: f32,
    /// Maximum distance an edge may move, in seconds.
    pub snap_window: f32,
    /// Padding added after the snapped end so speech is not cut flush.
    pub tail_padding: f32,
}

/// What the snapping pass did to the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOutcome {
    /// At least one edge moved to a segment boundary.
    Snapped,
    /// No segment edge was within the search window.
    Unchanged,
    /// Snapping would have produced `end <= start`; reverted.
    InvalidBounds,
    /// Snapping would have left the duration bounds; reverted.
    DurationOutOfBounds,
}

/// A snapped interval together with what happened to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Final start in seconds.
    pub start: f32,
    /// Final end in seconds.
    pub end: f32,
    pub outcome: SnapOutcome,
}

/// Nearest value in `edges` within `window` of `target`, if any.
fn nearest_edge(target: f32, edges: impl Iterator<Item = f32>, window: f32) -> Option<f32> {
    edges
        .filter(|e| (e - target).abs() <= window)
        .min_by(|a, b| {
            (a - target)
                .abs()
                .partial_cmp(&(b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Moves `start` to the nearest segment start and `end` to the nearest
/// segment end within `params.snap_window`, then pads the end. Reverts
/// to the exact original interval when the result would be degenerate
/// or outside the duration bounds.
pub fn snap_to_speech(
    start: f32,
    end: f32,
    segments: &[SpeechSegment],
    media_end: f32,
    params: &SnapParams,
) -> SnapResult {
    let snapped_start = nearest_edge(start, segments.iter().map(|s| s.start), params.snap_window);
    let snapped_end = nearest_edge(end, segments.iter().map(|s| s.end), params.snap_window);

    if snapped_start.is_none() && snapped_end.is_none() {
        return SnapResult {
            start,
            end,
            outcome: SnapOutcome::Unchanged,
        };
    }

    let new_start = snapped_start.unwrap_or(start).max(0.0);
    let mut new_end = snapped_end.unwrap_or(end);
    if snapped_end.is_some() {
        new_end += params.tail_padding;
    }
    new_end = new_end.min(media_end);

    if new_end <= new_start {
        return SnapResult {
            start,
            end,
            outcome: SnapOutcome::InvalidBounds,
        };
    }

    let duration = new_end - new_start;
    if duration < params.min_duration || duration > params.max_duration {
        return SnapResult {
            start,
            end,
            outcome: SnapOutcome::DurationOutOfBounds,
        };
    }

    SnapResult {
        start: new_start,
        end: new_end,
        outcome: SnapOutcome::Snapped,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> SnapParams {
        SnapParams {
            min_duration: 15.0,
            max_duration: 60.0,
            snap_window: 0.75,
            tail_padding: 0.15,
        }
    }

    fn segments() -> Vec<SpeechSegment> {
        vec![
            SpeechSegment {
                start: 10.3,
                end: 18.0,
            },
            SpeechSegment {
                start: 19.0,
                end: 30.2,
            },
        ]
    }

    #[test]
    fn test_both_edges_snap() {
        let result = snap_to_speech(10.0, 30.5, &segments(), 120.0, &params());
        assert_eq!(result.outcome, SnapOutcome::Snapped);
        assert!((result.start - 10.3).abs() < 1e-4);
        assert!((result.end - 30.35).abs() < 1e-4);
    }

    #[test]
    fn test_no_edge_in_window_is_unchanged() {
        let result = snap_to_speech(40.0, 70.0, &segments(), 120.0, &params());
        assert_eq!(result.outcome, SnapOutcome::Unchanged);
        assert!((result.start - 40.0).abs() < f32::EPSILON);
        assert!((result.end - 70.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duration_violation_reverts_both_edges() {
        // Start snaps forward to 10.3, end snaps back to 18.15,
        // leaving under 15 s; both edges must revert
        let result = snap_to_speech(10.0, 18.5, &segments(), 120.0, &params());
        assert_eq!(result.outcome, SnapOutcome::DurationOutOfBounds);
        assert!((result.start - 10.0).abs() < f32::EPSILON);
        assert!((result.end - 18.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_inverted_interval_reverts() {
        let tight = vec![SpeechSegment {
            start: 20.0,
            end: 19.8,
        }];
        // End snaps to 19.8 + padding while start snaps to 20.0
        let result = snap_to_speech(20.1, 19.85, &tight, 120.0, &params());
        assert_eq!(result.outcome, SnapOutcome::InvalidBounds);
        assert!((result.start - 20.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_end_padding_respects_media_end() {
        let segs = vec![SpeechSegment {
            start: 100.0,
            end: 119.95,
        }];
        let result = snap_to_speech(100.0, 120.0, &segs, 120.0, &params());
        assert_eq!(result.outcome, SnapOutcome::Snapped);
        assert!(result.end <= 120.0);
    }
}
