use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{error, info};

use super::types::{ModelCacheStatus, ModelEvent, ModelState};

/// Minimum gap (percentage points) between two download progress events.
pub const PROGRESS_STEP: u8 = 5;

#[derive(Clone)]
/// Records lifecycle events: updates the status snapshot, logs, and broadcasts.
pub struct StatusReporter {
    status: Arc<RwLock<ModelCacheStatus>>,
    events: broadcast::Sender<ModelEvent>,
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("status", &*self.status.read())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl StatusReporter {
    /// Creates a reporter in the `cold` state.
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            status: Arc::new(RwLock::new(ModelCacheStatus::default())),
            events,
        }
    }

    /// Records a transition or progress update.
    pub fn emit(&self, state: ModelState, message: impl Into<String>, progress: Option<u8>) {
        let event = ModelEvent::new(state, message, progress);

        if state == ModelState::Error {
            error!(state = %event.state, progress = ?event.progress, "{}", event.message);
        } else {
            info!(state = %event.state, progress = ?event.progress, "{}", event.message);
        }

        *self.status.write() = event.clone().into();
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Returns a copy of the current status.
    pub fn snapshot(&self) -> ModelCacheStatus {
        self.status.read().clone()
    }

    /// Subscribes to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.events.subscribe()
    }
}

/// Turns byte counts into throttled `downloading` events.
///
/// An event is emitted when the integer percentage changes and is at least
/// [`PROGRESS_STEP`] points past the last emitted value; 0% and 100% always pass.
#[derive(Debug)]
pub struct DownloadProgress {
    reporter: StatusReporter,
    last_percent: Mutex<Option<u8>>,
}

impl DownloadProgress {
    /// Creates a tracker that reports through `reporter`.
    pub fn new(reporter: StatusReporter) -> Self {
        Self {
            reporter,
            last_percent: Mutex::new(None),
        }
    }

    /// Reports `current` of `total` bytes; unknown (zero) totals are ignored.
    pub fn update(&self, current: u64, total: u64) {
        if total == 0 {
            return;
        }

        let percent = (u128::from(current.min(total)) * 100 / u128::from(total)) as u8;

        let mut last = self.last_percent.lock();
        if *last == Some(percent) {
            return;
        }
        let previous = last.map_or(-i16::from(PROGRESS_STEP), i16::from);
        if i16::from(percent) - previous < i16::from(PROGRESS_STEP) && percent != 0 && percent != 100
        {
            return;
        }

        *last = Some(percent);
        self.reporter.emit(
            ModelState::Downloading,
            format!("Downloading embedding model ({percent}%)..."),
            Some(percent),
        );
    }

    /// Last percentage that produced an event.
    pub fn last_percent(&self) -> Option<u8> {
        *self.last_percent.lock()
    }
}
