use std::path::PathBuf;

use shelf_types::RecordId;

/// Errors from collection backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The collection's backing storage does not exist and was required to.
    #[error("collection not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// No stored record has the requested identifier.
    #[error("item not found: {id}")]
    ItemNotFound { id: RecordId },

    /// Persisted content could not be decoded.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// A record could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
