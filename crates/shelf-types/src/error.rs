use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),

    #[error("record id must be non-zero")]
    ZeroRecordId,
}
