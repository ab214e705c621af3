use std::sync::Arc;

use thiserror::Error;

use crate::lifecycle::ModelError;
use crate::schedule::ScheduleError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error(transparent)]
    Scoring(ScoringError),

    #[error(transparent)]
    Schedule(ScheduleError),
}

impl ReviewError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        ReviewError::Validation {
            reason: reason.into(),
        }
    }

    /// Returns the model error if scoring failed because the model is unavailable.
    pub fn model_error(&self) -> Option<&Arc<ModelError>> {
        match self {
            ReviewError::Scoring(ScoringError::ModelUnavailable(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<ScoringError> for ReviewError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidInput { reason } => ReviewError::Validation { reason },
            other => ReviewError::Scoring(other),
        }
    }
}

impl From<ScheduleError> for ReviewError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidQuality { .. } => ReviewError::Validation {
                reason: err.to_string(),
            },
            other => ReviewError::Schedule(other),
        }
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;
