use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ScheduleState;
use crate::scoring::ScoreResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A scored attempt together with the card's updated schedule.
pub struct GradedAttempt {
    pub id: Uuid,
    pub card_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub schedule: ScheduleState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Schedule changes applied to many cards at once.
pub enum BulkOperation {
    /// Push the card 180 days out with a long streak.
    MarkLearned,
    /// Return the card to its initial schedule, due now.
    ResetSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchedule {
    pub card_id: String,
    pub schedule: ScheduleState,
}
