use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::InvalidName(msg) => ApplicationError::InvalidName(msg),
            StorageError::NotFound(_) => ApplicationError::NotFound,
            StorageError::Io(e) => ApplicationError::StorageFailure(e.to_string()),
        }
    }
}
