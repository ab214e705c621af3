use std::sync::Arc;

use tracing::warn;

use super::backend::{HubBackend, ModelBackend, StubBackend};
use super::config::ModelCacheConfig;

/// Builds the appropriate [`ModelBackend`] implementation for the config.
pub fn build_backend(config: &ModelCacheConfig) -> Arc<dyn ModelBackend> {
    if config.stub {
        warn!("Embedding model running in STUB mode (testing only)");
        Arc::new(StubBackend::new())
    } else {
        Arc::new(HubBackend::new(config))
    }
}
