use thiserror::Error;

use snipshelf_core::models::snippet::SnippetId;
use snipshelf_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("snippet not found: {id}")]
    NotFound { id: SnippetId },

    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
