//! Domain-level error types.

use thiserror::Error;

use crate::ports::KvError;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Haiku not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] KvError),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Serialization(err.to_string())
    }
}
