//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using a key-value store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform a store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// The store is temporarily unavailable.
    #[error("Store unavailable")]
    Unavailable,
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::StoreError(e.to_string())
    }
}
