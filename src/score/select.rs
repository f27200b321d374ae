//! Greedy non-overlapping selection of the top-scored clips.

use super::ScoredClip;
use crate::config::SelectionConfig;
use tracing::debug;

/// Picks at most `max_clips` clips by descending score, skipping any
/// clip that overlaps an already-picked one or starts within
/// `min_gap_secs` of one. The result is ordered by start time with
/// sequential display ids.
pub fn select(mut scored: Vec<ScoredClip>, config: &SelectionConfig) -> Vec<ScoredClip> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.start()
                    .partial_cmp(&b.start())
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut picked: Vec<ScoredClip> = Vec::new();

    for clip in scored {
        if picked.len() >= config.max_clips {
            break;
        }
        let conflicts = picked.iter().any(|p| {
            clip.overlaps(p) || (clip.start() - p.start()).abs() < config.min_gap_secs
        });
        if conflicts {
            debug!(
                id = clip.candidate.id,
                start = clip.start(),
                "clip skipped for overlap or proximity"
            );
            continue;
        }
        picked.push(clip);
    }

    picked.sort_by(|a, b| {
        a.start()
            .partial_cmp(&b.start())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, clip) in picked.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let id = (i + 1) as u32;
        clip.display_id = Some(id);
    }

    picked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detect::{ClipCandidate, PatternKind};
    use crate::score::ScoreBreakdown;
    use std::collections::BTreeMap;

    fn clip(id: u32, start: f32, end: f32, score: f32) -> ScoredClip {
        ScoredClip {
            candidate: ClipCandidate {
                id,
                pattern: PatternKind::Payoff,
                start,
                end,
                score,
                metrics: BTreeMap::new(),
            },
            score,
            hook_multiplier: 1.0,
            breakdown: ScoreBreakdown {
                speech_ratio: 1.0,
                speech_secs: end - start,
                flatness_median: 0.2,
                passed_speech_ratio: true,
                passed_flatness: true,
                passed_speech_secs: true,
                pattern_score: score,
                hook_score: 0.0,
                coherence_score: 0.0,
            },
            display_id: None,
        }
    }

    fn config(max_clips: usize, min_gap_secs: f32) -> SelectionConfig {
        SelectionConfig {
            max_clips,
            min_gap_secs,
        }
    }

    #[test]
    fn test_highest_scores_win() {
        let picked = select(
            vec![
                clip(1, 0.0, 20.0, 50.0),
                clip(2, 100.0, 120.0, 90.0),
                clip(3, 200.0, 220.0, 70.0),
            ],
            &config(2, 30.0),
        );
        assert_eq!(picked.len(), 2);
        // Ordered by start, not by score
        assert_eq!(picked[0].candidate.id, 2);
        assert_eq!(picked[1].candidate.id, 3);
    }

    #[test]
    fn test_overlapping_lower_score_is_skipped() {
        let picked = select(
            vec![clip(1, 100.0, 130.0, 90.0), clip(2, 60.0, 110.0, 80.0)],
            &config(5, 30.0),
        );
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].candidate.id, 1);
    }

    #[test]
    fn test_min_gap_between_starts_is_enforced() {
        // Non-overlapping but starts only 20 s apart
        let picked = select(
            vec![clip(1, 100.0, 118.0, 90.0), clip(2, 120.0, 138.0, 80.0)],
            &config(5, 30.0),
        );
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_display_ids_follow_start_order() {
        let picked = select(
            vec![clip(1, 200.0, 220.0, 60.0), clip(2, 0.0, 20.0, 90.0)],
            &config(5, 30.0),
        );
        assert_eq!(picked[0].display_id, Some(1));
        assert!(picked[0].start() < picked[1].start());
        assert_eq!(picked[1].display_id, Some(2));
    }

    #[test]
    fn test_respects_max_clips() {
        let clips: Vec<ScoredClip> = (0..10u8)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let start = f32::from(i) * 100.0;
                clip(u32::from(i), start, start + 20.0, 50.0 + f32::from(i))
            })
            .collect();
        let picked = select(clips, &config(3, 30.0));
        assert_eq!(picked.len(), 3);
    }
}
