use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model download failed: {reason}")]
    DownloadFailed { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Load(#[from] EmbeddingError),

    #[error("model load task failed: {0}")]
    TaskFailed(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::DownloadFailed {
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ModelError {
    fn from(err: tokio::task::JoinError) -> Self {
        ModelError::TaskFailed(err.to_string())
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
