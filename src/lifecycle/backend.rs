//! Model acquisition backends.
//!
//! `HubBackend` downloads from a Hugging Face compatible hub and loads a BERT encoder.
//! `StubBackend` needs neither network nor files.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::config::ModelCacheConfig;
use super::error::{ModelError, ModelResult};
use super::events::DownloadProgress;
use crate::constants::MODEL_FILES;
use crate::embedding::{EmbeddingProvider, MiniLmEmbedder, StubEmbedder};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
/// Operations the model cache needs to find, fetch and load a model.
pub trait ModelBackend: Send + Sync {
    /// Identifier used in log and status messages.
    fn model_id(&self) -> &str;

    /// Returns `true` if `dir` holds everything [`load`](Self::load) needs.
    fn is_complete(&self, dir: &Path) -> bool {
        MODEL_FILES.iter().all(|file| dir.join(file).is_file())
    }

    /// Fetches the model into `dest`, reporting byte progress.
    async fn download(&self, dest: &Path, progress: &DownloadProgress) -> ModelResult<()>;

    /// Loads a provider from `dir`. Blocking; called via `spawn_blocking`.
    fn load(&self, dir: &Path) -> ModelResult<Arc<dyn EmbeddingProvider>>;
}

/// Hugging Face hub download + candle BERT loader.
pub struct HubBackend {
    model_id: String,
    revision: String,
    hub_url: String,
    http: HttpClient,
}

impl std::fmt::Debug for HubBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubBackend")
            .field("model_id", &self.model_id)
            .field("revision", &self.revision)
            .field("hub_url", &self.hub_url)
            .finish()
    }
}

impl HubBackend {
    /// Creates a backend for the configured model.
    pub fn new(config: &ModelCacheConfig) -> Self {
        Self {
            model_id: config.model_id.clone(),
            revision: config.revision.clone(),
            hub_url: config.hub_url.trim_end_matches('/').to_string(),
            http: HttpClient::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
        }
    }

    /// Download URL for one file of the model repository.
    pub fn file_url(&self, file: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.hub_url, self.model_id, self.revision, file
        )
    }
}

#[async_trait]
impl ModelBackend for HubBackend {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn download(&self, dest: &Path, progress: &DownloadProgress) -> ModelResult<()> {
        tokio::fs::create_dir_all(dest).await?;

        // Open every response first so the total size is known before streaming.
        let mut responses = Vec::with_capacity(MODEL_FILES.len());
        for file in MODEL_FILES {
            let url = self.file_url(file);
            debug!(url = %url, "Requesting model file");
            let response = self.http.get(&url).send().await?.error_for_status()?;
            responses.push((file, response));
        }

        let total = combined_length(responses.iter().map(|(_, r)| r.content_length()));
        if total.is_none() {
            debug!("Model file sizes unknown, skipping percentage progress");
        }
        let mut downloaded = 0u64;
        if let Some(total) = total {
            progress.update(0, total);
        }

        for (file, mut response) in responses {
            let partial = dest.join(format!("{file}.part"));
            let mut out = tokio::fs::File::create(&partial).await?;

            while let Some(chunk) = response.chunk().await? {
                out.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
                if let Some(total) = total {
                    progress.update(downloaded, total);
                }
            }

            out.flush().await?;
            drop(out);
            tokio::fs::rename(&partial, dest.join(file)).await?;
            debug!(file, bytes = downloaded, "Model file downloaded");
        }

        if let Some(total) = total {
            progress.update(total, total);
        }

        if !self.is_complete(dest) {
            return Err(ModelError::DownloadFailed {
                reason: format!("incomplete model directory: {}", dest.display()),
            });
        }
        Ok(())
    }

    fn load(&self, dir: &Path) -> ModelResult<Arc<dyn EmbeddingProvider>> {
        let embedder = MiniLmEmbedder::load(dir, &self.model_id)?;
        Ok(Arc::new(embedder))
    }
}

/// Sum of all response sizes, or `None` if any size is unknown.
pub(crate) fn combined_length<I>(lengths: I) -> Option<u64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    lengths.into_iter().sum()
}

#[derive(Debug, Clone, Default)]
/// Backend that serves [`StubEmbedder`] vectors.
pub struct StubBackend {
    dim: Option<usize>,
}

impl StubBackend {
    /// Creates a stub backend with the default dimension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stub backend producing `dim`-dimensional vectors.
    pub fn with_dim(dim: usize) -> Self {
        Self { dim: Some(dim) }
    }
}

#[async_trait]
impl ModelBackend for StubBackend {
    fn model_id(&self) -> &str {
        "stub"
    }

    fn is_complete(&self, _dir: &Path) -> bool {
        true
    }

    async fn download(&self, _dest: &Path, progress: &DownloadProgress) -> ModelResult<()> {
        progress.update(1, 1);
        Ok(())
    }

    fn load(&self, _dir: &Path) -> ModelResult<Arc<dyn EmbeddingProvider>> {
        let embedder = match self.dim {
            Some(dim) => StubEmbedder::new(dim),
            None => StubEmbedder::default(),
        };
        Ok(Arc::new(embedder))
    }
}
