use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::backend::ModelBackend;
use super::config::ModelCacheConfig;
use super::error::{ModelError, ModelResult};
use super::events::{DownloadProgress, StatusReporter};
use super::factory::build_backend;
use super::types::{ModelCacheStatus, ModelEvent, ModelState};
use crate::config::ConfigError;
use crate::embedding::EmbeddingProvider;
use crate::once::InitOnce;

/// Shared handle to the loaded embedding model.
pub type SharedProvider = Arc<dyn EmbeddingProvider>;

/// Owns the embedding model: locates, downloads and loads it at most once.
///
/// Concurrent [`ensure_ready`](Self::ensure_ready) calls share a single load attempt. A
/// failed attempt leaves the cache empty so the next call retries.
pub struct ModelCacheManager {
    config: ModelCacheConfig,
    backend: Arc<dyn ModelBackend>,
    provider: InitOnce<SharedProvider, ModelError>,
    reporter: StatusReporter,
}

impl std::fmt::Debug for ModelCacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCacheManager")
            .field("model_id", &self.backend.model_id())
            .field("provider", &self.provider)
            .field("status", &self.reporter.snapshot())
            .finish()
    }
}

impl ModelCacheManager {
    /// Creates a manager with an explicit [`ModelBackend`].
    pub fn new(config: ModelCacheConfig, backend: Arc<dyn ModelBackend>) -> Self {
        let reporter = StatusReporter::new(config.event_capacity);
        Self {
            config,
            backend,
            provider: InitOnce::new(),
            reporter,
        }
    }

    /// Creates a manager using the backend selected by `config`.
    pub fn from_config(config: ModelCacheConfig) -> Self {
        let backend = build_backend(&config);
        Self::new(config, backend)
    }

    /// Creates a manager from environment configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_config(ModelCacheConfig::from_env()?))
    }

    /// Returns the active config.
    pub fn config(&self) -> &ModelCacheConfig {
        &self.config
    }

    /// Returns the loaded provider, loading it first if needed.
    pub async fn ensure_ready(&self) -> Result<SharedProvider, Arc<ModelError>> {
        if let Some(provider) = self.provider.get() {
            return Ok(provider);
        }

        let plan = LoadPlan {
            backend: Arc::clone(&self.backend),
            reporter: self.reporter.clone(),
            bundled_dir: self.config.bundled_dir().map(Path::to_path_buf),
            cache_dir: self.config.model_dir(),
        };
        self.provider.get_or_try_init(move || plan.run()).await
    }

    /// Loads the model, discarding the provider handle.
    pub async fn warm(&self) -> Result<(), Arc<ModelError>> {
        self.ensure_ready().await.map(|_| ())
    }

    /// Starts loading in the background; failures are logged.
    pub fn spawn_warm(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = manager.warm().await {
                warn!(error = %e, "Background model warm-up failed");
            }
        })
    }

    /// Returns the current status snapshot.
    pub fn status(&self) -> ModelCacheStatus {
        self.reporter.snapshot()
    }

    /// Subscribes to lifecycle events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.reporter.subscribe()
    }

    /// Returns `true` once a provider is loaded.
    pub fn is_ready(&self) -> bool {
        self.provider.is_initialized()
    }
}

/// Everything one load attempt needs, detached from the manager.
struct LoadPlan {
    backend: Arc<dyn ModelBackend>,
    reporter: StatusReporter,
    bundled_dir: Option<PathBuf>,
    cache_dir: PathBuf,
}

impl LoadPlan {
    async fn run(self) -> ModelResult<SharedProvider> {
        self.reporter.emit(
            ModelState::Initializing,
            format!("Preparing embedding model {}", self.backend.model_id()),
            Some(5),
        );

        match self.prepare().await {
            Ok(provider) => Ok(provider),
            Err(e) => {
                self.reporter.emit(
                    ModelState::Error,
                    format!("Failed to prepare embeddings: {e}"),
                    None,
                );
                Err(e)
            }
        }
    }

    async fn prepare(&self) -> ModelResult<SharedProvider> {
        if let Some(bundled) = self
            .bundled_dir
            .as_deref()
            .filter(|dir| self.backend.is_complete(dir))
        {
            self.reporter.emit(
                ModelState::Loading,
                "Loading bundled embedding model...",
                Some(50),
            );
            self.reporter.emit(
                ModelState::Initializing,
                "Initializing bundled model...",
                Some(75),
            );
            let provider = self.load(bundled).await?;
            self.reporter.emit(
                ModelState::Ready,
                "Bundled embedding model ready",
                Some(100),
            );
            return Ok(provider);
        }

        if self.backend.is_complete(&self.cache_dir) {
            debug!(dir = %self.cache_dir.display(), "Using cached embedding model");
            self.reporter.emit(
                ModelState::Loading,
                "Loading cached embedding model...",
                Some(60),
            );
            self.reporter.emit(
                ModelState::Initializing,
                "Validating cached embedding model...",
                Some(75),
            );
        } else {
            self.reporter.emit(
                ModelState::Downloading,
                "Downloading embedding model (first run may take a minute)...",
                Some(10),
            );
            let progress = DownloadProgress::new(self.reporter.clone());
            self.backend.download(&self.cache_dir, &progress).await?;
            self.reporter.emit(
                ModelState::Initializing,
                "Download complete, initializing model...",
                Some(95),
            );
        }

        let provider = self.load(&self.cache_dir).await?;
        info!(
            model = provider.name(),
            dim = provider.embedding_dim(),
            "Embedding provider loaded"
        );
        self.reporter
            .emit(ModelState::Ready, "Embedding model ready", Some(100));
        Ok(provider)
    }

    async fn load(&self, dir: &Path) -> ModelResult<SharedProvider> {
        let backend = Arc::clone(&self.backend);
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || backend.load(&dir)).await?
    }
}
