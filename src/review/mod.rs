//! Review workflow: grading feeds the scheduler; self-ratings and bulk edits bypass grading.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ReviewError, ReviewResult};
pub use service::ReviewService;
pub use types::{BulkOperation, CardSchedule, GradedAttempt};
