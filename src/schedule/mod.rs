//! SM-2 spaced-repetition scheduling.
//!
//! [`next_state`] is pure; persistence goes through a [`ScheduleStore`].

pub mod algorithm;
pub mod error;
pub mod store;
pub mod types;


pub use algorithm::{next_ease, next_state};
pub use error::{ScheduleError, ScheduleResult};
pub use store::{MemoryScheduleStore, ScheduleStore, ScheduleUpdate};
pub use types::{Quality, ScheduleState};
