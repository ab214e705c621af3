use super::types::{ScoreComponents, Verdict};
use crate::constants::{
    ALMOST_THRESHOLD, CORRECT_THRESHOLD, LOW_COVERAGE_DOWNGRADE, MIN_BORDERLINE_SCORE,
    MISSING_THRESHOLD,
};

const THRESHOLDS: [(Verdict, f32); 3] = [
    (Verdict::Correct, CORRECT_THRESHOLD),
    (Verdict::Almost, ALMOST_THRESHOLD),
    (Verdict::Missing, MISSING_THRESHOLD),
];

/// Maps a combined score to a verdict band, evaluated correct-first.
pub fn classify(score: f32) -> Verdict {
    for (verdict, threshold) in THRESHOLDS {
        if score >= threshold {
            return verdict;
        }
    }
    if score >= MIN_BORDERLINE_SCORE {
        Verdict::Missing
    } else {
        Verdict::Incorrect
    }
}

/// One step down the severity order; `incorrect` stays `incorrect`.
pub fn downgrade(verdict: Verdict) -> Verdict {
    Verdict::SEQUENCE
        .iter()
        .position(|v| *v == verdict)
        .and_then(|i| Verdict::SEQUENCE.get(i + 1))
        .copied()
        .unwrap_or(Verdict::Incorrect)
}

/// Applies keypoint corrections to a base verdict.
///
/// Only applies when the request had keypoints:
/// 1. coverage below [`LOW_COVERAGE_DOWNGRADE`] downgrades one step;
/// 2. any missing keypoint caps the verdict at `almost`.
pub fn adjust_verdict(verdict: Verdict, components: &ScoreComponents, has_keypoints: bool) -> Verdict {
    if !has_keypoints {
        return verdict;
    }

    let mut adjusted = verdict;
    if components.coverage < LOW_COVERAGE_DOWNGRADE {
        adjusted = downgrade(adjusted);
    }
    if !components.missing_keypoints.is_empty() && adjusted == Verdict::Correct {
        adjusted = Verdict::Almost;
    }
    adjusted
}
