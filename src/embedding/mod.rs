//! Embedding provider capability and its backends.
//!
//! - [`EmbeddingProvider`] is the only interface the scorer depends on.
//! - [`MiniLmEmbedder`] runs a BERT sentence encoder on candle.
//! - [`StubEmbedder`] is deterministic and needs no model files.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// BERT sentence encoder.
pub mod minilm;
/// Provider trait and vector helpers.
pub mod provider;
/// Deterministic stub backend.
pub mod stub;
/// Tokenizer loading helpers.
pub mod utils;


pub use error::EmbeddingError;
pub use minilm::MiniLmEmbedder;
pub use provider::{
    EmbeddingProvider, dot, l2_normalize, normalized_similarity, rescale_similarity,
};
pub use stub::StubEmbedder;
