use serde::{Deserialize, Serialize};

/// Message reported before the first load attempt.
pub const COLD_MESSAGE: &str = "Model cache has not been initialized yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Model cache lifecycle state.
pub enum ModelState {
    #[default]
    /// No load attempted yet.
    Cold,
    /// Preparing or validating the model.
    Initializing,
    /// Fetching model files.
    Downloading,
    /// Reading model files from disk.
    Loading,
    /// Provider available.
    Ready,
    /// Last load attempt failed (the next call retries).
    Error,
}

impl ModelState {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelState::Cold => "cold",
            ModelState::Initializing => "initializing",
            ModelState::Downloading => "downloading",
            ModelState::Loading => "loading",
            ModelState::Ready => "ready",
            ModelState::Error => "error",
        }
    }

    /// Returns `true` while a load sequence is running.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            ModelState::Initializing | ModelState::Downloading | ModelState::Loading
        )
    }
}

impl std::fmt::Display for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single lifecycle transition or progress update.
pub struct ModelEvent {
    /// State after this event.
    pub state: ModelState,
    /// Human-readable description.
    pub message: String,
    /// Percent complete (0-100), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl ModelEvent {
    /// Creates an event; `progress` is capped at 100.
    pub fn new(state: ModelState, message: impl Into<String>, progress: Option<u8>) -> Self {
        Self {
            state,
            message: message.into(),
            progress: progress.map(|p| p.min(100)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Snapshot of the model cache, as reported to health checks.
pub struct ModelCacheStatus {
    /// Current state.
    pub state: ModelState,
    /// Message from the most recent event.
    pub message: String,
    /// Progress from the most recent event, if it carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl Default for ModelCacheStatus {
    fn default() -> Self {
        Self {
            state: ModelState::Cold,
            message: COLD_MESSAGE.to_string(),
            progress: None,
        }
    }
}

impl From<ModelEvent> for ModelCacheStatus {
    fn from(event: ModelEvent) -> Self {
        Self {
            state: event.state,
            message: event.message,
            progress: event.progress,
        }
    }
}
