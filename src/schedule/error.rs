use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("quality must be between 1 and 5, got {value}")]
    InvalidQuality { value: i64 },

    /// Raised by [`ScheduleStore`](super::ScheduleStore) implementations when persistence fails.
    #[error("schedule store error: {reason}")]
    Store { reason: String },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
