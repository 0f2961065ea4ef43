use shelf_store::StoreError;
use shelf_types::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("failed to load items: {source}")]
    Load { source: StoreError },

    #[error("item not found: {id}")]
    ItemNotFound { id: RecordId },

    #[error("record id space exhausted")]
    IdSpaceExhausted,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CollectionError {
    /// Whether the error means the targeted record does not exist, whether
    /// the registry or the backend noticed first.
    pub fn is_item_not_found(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound { .. } | Self::Store(StoreError::ItemNotFound { .. })
        )
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;
