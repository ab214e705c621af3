use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::ScheduleResult;
use super::types::ScheduleState;

/// Read-modify-write step applied by [`ScheduleStore::update`].
pub type ScheduleUpdate = Box<dyn FnOnce(Option<&ScheduleState>) -> ScheduleState + Send>;

#[async_trait]
/// Persistence boundary for per-card schedules.
///
/// Implementations backed by durable storage report I/O and database failures as
/// [`ScheduleError::Store`](super::ScheduleError::Store); callers treat them as server errors.
pub trait ScheduleStore: Send + Sync {
    /// Returns the card's schedule, or `None` if it was never graded.
    async fn get(&self, card_id: &str) -> ScheduleResult<Option<ScheduleState>>;

    /// Atomically replaces the card's schedule with `update(previous)`.
    async fn update(&self, card_id: &str, update: ScheduleUpdate) -> ScheduleResult<ScheduleState>;

    /// Deletes the card's schedule, returning it if present.
    async fn remove(&self, card_id: &str) -> ScheduleResult<Option<ScheduleState>>;
}

/// In-process [`ScheduleStore`]; updates to one card are serialized under a single lock.
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    schedules: Mutex<HashMap<String, ScheduleState>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.schedules.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.lock().is_empty()
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn get(&self, card_id: &str) -> ScheduleResult<Option<ScheduleState>> {
        Ok(self.schedules.lock().get(card_id).cloned())
    }

    async fn update(&self, card_id: &str, update: ScheduleUpdate) -> ScheduleResult<ScheduleState> {
        let mut schedules = self.schedules.lock();
        let next = update(schedules.get(card_id));
        schedules.insert(card_id.to_string(), next.clone());
        Ok(next)
    }

    async fn remove(&self, card_id: &str) -> ScheduleResult<Option<ScheduleState>> {
        Ok(self.schedules.lock().remove(card_id))
    }
}
