//! Scriptable [`ModelBackend`] for tests.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::backend::ModelBackend;
use super::error::{ModelError, ModelResult};
use super::events::DownloadProgress;
use crate::constants::MODEL_FILES;
use crate::embedding::{EmbeddingError, EmbeddingProvider, StubEmbedder};

/// Model id reported by [`MockModelBackend`].
pub const MOCK_MODEL_ID: &str = "test/mini-model";

/// Backend that writes placeholder files on download and serves stub vectors.
///
/// Counts downloads and loads; either step can be made to fail.
#[derive(Debug, Default)]
pub struct MockModelBackend {
    downloads: AtomicUsize,
    loads: AtomicUsize,
    fail_download: AtomicBool,
    fail_load: AtomicBool,
    load_delay: Option<Duration>,
    dim: Option<usize>,
}

impl MockModelBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks each load for `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            load_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    pub fn set_fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelBackend for MockModelBackend {
    fn model_id(&self) -> &str {
        MOCK_MODEL_ID
    }

    async fn download(&self, dest: &Path, progress: &DownloadProgress) -> ModelResult<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(ModelError::DownloadFailed {
                reason: "network unreachable".to_string(),
            });
        }

        // Byte-level updates: every percentage twice.
        for current in 0..=200u64 {
            progress.update(current / 2, 100);
        }

        write_placeholder_files(dest)?;
        Ok(())
    }

    fn load(&self, _dir: &Path) -> ModelResult<Arc<dyn EmbeddingProvider>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.load_delay {
            std::thread::sleep(delay);
        }
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(ModelError::Load(EmbeddingError::ModelLoadFailed {
                reason: "corrupt weights".to_string(),
            }));
        }
        Ok(Arc::new(StubEmbedder::new(self.dim.unwrap_or(8))))
    }
}

/// Creates `dir` with an empty JSON file for every required model file.
pub fn write_placeholder_files(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for file in MODEL_FILES {
        std::fs::write(dir.join(file), b"{}")?;
    }
    Ok(())
}
