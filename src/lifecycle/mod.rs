//! Embedding model cache: locate, download and load the model once, reporting progress.

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod manager;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use backend::{HubBackend, ModelBackend, StubBackend};
pub use config::{DEFAULT_DATA_DIR, DEFAULT_EVENT_CAPACITY, ModelCacheConfig};
pub use error::{ModelError, ModelResult};
pub use events::{DownloadProgress, PROGRESS_STEP, StatusReporter};
pub use factory::build_backend;
pub use manager::{ModelCacheManager, SharedProvider};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MOCK_MODEL_ID, MockModelBackend, write_placeholder_files};
pub use types::{COLD_MESSAGE, ModelCacheStatus, ModelEvent, ModelState};
