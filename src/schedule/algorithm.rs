use chrono::{DateTime, Duration, Utc};

use super::types::ScheduleState;
use crate::constants::{
    DEFAULT_EASE, INITIAL_INTERVAL, MAX_INTERVAL, MIN_EASE, MIN_SUCCESS_QUALITY, SECOND_INTERVAL,
};
use crate::scoring::Verdict;

/// New ease factor after a review of `quality`, floored at [`MIN_EASE`].
pub fn next_ease(ease: f64, quality: u8) -> f64 {
    let q = f64::from(5 - quality.min(5));
    (ease + (0.1 - q * (0.08 + q * 0.02))).max(MIN_EASE)
}

/// SM-2 update: the state after grading `verdict` at `now`.
///
/// `previous` is `None` for a card that has never been reviewed.
pub fn next_state(
    previous: Option<&ScheduleState>,
    verdict: Verdict,
    now: DateTime<Utc>,
) -> ScheduleState {
    let (ease, interval, streak) = previous
        .map(|s| (s.ease, s.interval, s.streak))
        .unwrap_or((DEFAULT_EASE, INITIAL_INTERVAL, 0));
    let quality = verdict.quality().get();

    let ease = next_ease(ease, quality);
    let (interval, streak) = if quality < MIN_SUCCESS_QUALITY {
        (INITIAL_INTERVAL, 0)
    } else {
        let streak = streak + 1;
        let interval = match streak {
            1 => INITIAL_INTERVAL,
            2 => SECOND_INTERVAL,
            _ => ((f64::from(interval) * ease).round_ties_even() as u32).clamp(1, MAX_INTERVAL),
        };
        (interval, streak)
    };

    ScheduleState {
        ease,
        interval,
        due_at: now + Duration::days(i64::from(interval)),
        streak,
        quality: Some(quality),
    }
}
