use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ScheduleError, ScheduleResult};
use crate::constants::{DEFAULT_EASE, INITIAL_INTERVAL, LEARNED_INTERVAL, LEARNED_STREAK};
use crate::scoring::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
/// SM-2 recall quality, always within `1..=5`.
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validates a raw rating.
    pub fn new(value: i64) -> ScheduleResult<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScheduleError::InvalidQuality { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Quality {
    type Error = ScheduleError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Verdict {
    /// Quality fed to the scheduler for a graded verdict.
    pub fn quality(self) -> Quality {
        Quality(match self {
            Verdict::Correct => 5,
            Verdict::Almost => 4,
            Verdict::Missing => 2,
            Verdict::Incorrect => 1,
        })
    }

    /// Maps a self-rating onto the verdict space: 5, 4, 3, then everything lower.
    pub fn from_self_rating(quality: Quality) -> Self {
        match quality.get() {
            5 => Verdict::Correct,
            4 => Verdict::Almost,
            3 => Verdict::Missing,
            _ => Verdict::Incorrect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-card review state.
pub struct ScheduleState {
    /// Ease factor, never below 1.3.
    pub ease: f64,
    /// Days until the next review, at least 1.
    pub interval: u32,
    /// When the card is next due.
    pub due_at: DateTime<Utc>,
    /// Consecutive successful reviews.
    pub streak: u32,
    /// Quality of the review that produced this state, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::initial(Utc::now())
    }
}

impl ScheduleState {
    /// State of a card that has never been reviewed.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            ease: DEFAULT_EASE,
            interval: INITIAL_INTERVAL,
            due_at: now,
            streak: 0,
            quality: None,
        }
    }

    /// Card marked as known: due in [`LEARNED_INTERVAL`] days.
    pub fn learned(now: DateTime<Utc>) -> Self {
        Self {
            ease: DEFAULT_EASE,
            interval: LEARNED_INTERVAL,
            due_at: now + Duration::days(i64::from(LEARNED_INTERVAL)),
            streak: LEARNED_STREAK,
            quality: None,
        }
    }

    /// Card returned to its initial state, due immediately.
    pub fn reset(now: DateTime<Utc>) -> Self {
        Self::initial(now)
    }

    /// Returns `true` if the card is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}
