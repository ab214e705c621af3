use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, parse_bool_from_env};
use crate::constants::{DEFAULT_HUB_URL, DEFAULT_MODEL_ID, DEFAULT_MODEL_REVISION};

/// Default capacity of the lifecycle event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
/// Default root data directory (the model cache lives under `models/`).
pub const DEFAULT_DATA_DIR: &str = "./.data";

#[derive(Debug, Clone)]
/// Where the embedding model comes from and where it is cached.
pub struct ModelCacheConfig {
    /// Hub repository id, e.g. `sentence-transformers/all-MiniLM-L6-v2`.
    pub model_id: String,
    /// Hub revision (branch, tag or commit).
    pub revision: String,
    /// Hub base URL.
    pub hub_url: String,
    /// Pre-bundled model directory, checked before the cache.
    pub bundled_dir: Option<PathBuf>,
    /// Directory holding downloaded models.
    pub cache_dir: PathBuf,
    /// If true, serve deterministic stub embeddings instead of a real model.
    pub stub: bool,
    /// Buffered lifecycle events per subscriber.
    pub event_capacity: usize,
}

impl Default for ModelCacheConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_MODEL_REVISION.to_string(),
            hub_url: DEFAULT_HUB_URL.to_string(),
            bundled_dir: None,
            cache_dir: PathBuf::from(DEFAULT_DATA_DIR).join("models"),
            stub: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ModelCacheConfig {
    const ENV_DATA_DIR: &'static str = "RETENTION_DATA_DIR";
    const ENV_MODEL_ID: &'static str = "RETENTION_MODEL_ID";
    const ENV_MODEL_REVISION: &'static str = "RETENTION_MODEL_REVISION";
    const ENV_HUB_URL: &'static str = "RETENTION_HUB_URL";
    const ENV_BUNDLED_MODEL_DIR: &'static str = "RETENTION_BUNDLED_MODEL_DIR";
    const ENV_MODEL_CACHE_DIR: &'static str = "RETENTION_MODEL_CACHE_DIR";
    const ENV_STUB_EMBEDDER: &'static str = "RETENTION_STUB_EMBEDDER";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_dir = non_empty_var(Self::ENV_MODEL_CACHE_DIR)
            .map(PathBuf::from)
            .or_else(|| non_empty_var(Self::ENV_DATA_DIR).map(|d| PathBuf::from(d).join("models")))
            .unwrap_or(defaults.cache_dir);

        Ok(Self {
            model_id: non_empty_var(Self::ENV_MODEL_ID).unwrap_or(defaults.model_id),
            revision: non_empty_var(Self::ENV_MODEL_REVISION).unwrap_or(defaults.revision),
            hub_url: non_empty_var(Self::ENV_HUB_URL)
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.hub_url),
            bundled_dir: non_empty_var(Self::ENV_BUNDLED_MODEL_DIR).map(PathBuf::from),
            cache_dir,
            stub: parse_bool_from_env(Self::ENV_STUB_EMBEDDER, defaults.stub)?,
            event_capacity: defaults.event_capacity,
        })
    }

    /// Creates a stub config rooted at `cache_dir` (no network, no model files).
    pub fn stub<P: Into<PathBuf>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            stub: true,
            ..Default::default()
        }
    }

    /// Sets the bundled model directory.
    pub fn with_bundled_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.bundled_dir = Some(dir.into());
        self
    }

    /// Directory the model is downloaded into: `{cache_dir}/{owner}--{name}`.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.model_id.replace('/', "--"))
    }

    /// Returns the bundled directory, if configured.
    pub fn bundled_dir(&self) -> Option<&Path> {
        self.bundled_dir.as_deref()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
