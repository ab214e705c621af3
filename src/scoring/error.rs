use std::sync::Arc;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::lifecycle::ModelError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(Arc<ModelError>),

    #[error("scoring computation failed: {reason}")]
    Compute { reason: String },
}

impl From<Arc<ModelError>> for ScoringError {
    fn from(err: Arc<ModelError>) -> Self {
        ScoringError::ModelUnavailable(err)
    }
}

impl From<EmbeddingError> for ScoringError {
    fn from(err: EmbeddingError) -> Self {
        ScoringError::Compute {
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ScoringError {
    fn from(err: tokio::task::JoinError) -> Self {
        ScoringError::Compute {
            reason: format!("encode task failed: {err}"),
        }
    }
}
