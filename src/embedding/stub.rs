use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::debug;

use super::error::EmbeddingError;
use super::provider::{EmbeddingProvider, l2_normalize};
use crate::constants::MINILM_EMBEDDING_DIM;

/// Deterministic embedder that needs no model files.
///
/// Identical texts map to identical vectors; different texts map to pseudo-random unit
/// vectors that are close to orthogonal. Intended for tests and offline development only.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(MINILM_EMBEDDING_DIM)
    }
}

impl StubEmbedder {
    /// Creates a stub producing `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.trim().to_lowercase().hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl EmbeddingProvider for StubEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(batch = texts.len(), "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "stub"
    }
}
