//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No value is registered under the key.
    #[error("key not registered: {key}")]
    NotFound { key: String },
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
