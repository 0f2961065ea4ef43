use std::fmt;

use serde::{Deserialize, Serialize};
use shelf_types::{Record, RecordId};

use crate::error::StoreResult;

/// Physical layout used by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The whole collection is one JSON array in one file.
    SingleFile,
    /// One JSON file per record inside a directory.
    Directory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleFile => f.write_str("single-file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Durable storage for one collection of records.
///
/// All implementations must satisfy these invariants:
/// - Every successful mutation is durable before the call returns.
/// - Writes replace files atomically; a crash never leaves a truncated file
///   visible to readers.
/// - `update_item` and `delete_item` report [`StoreError::ItemNotFound`]
///   when targeting an identifier the backend has no record for, except that
///   the single-file backend treats deleting an absent identifier as a no-op.
/// - Errors are returned unchanged; backends never retry.
///
/// [`StoreError::ItemNotFound`]: crate::StoreError::ItemNotFound
pub trait Backend<T: Record> {
    /// Which layout this backend persists to.
    fn kind(&self) -> BackendKind;

    /// Read every stored record.
    ///
    /// When the backing storage is absent this returns
    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// `require_exist` is set, and an empty vector otherwise.
    fn read_all(&self, require_exist: bool) -> StoreResult<Vec<T>>;

    /// Persist a new record.
    fn create_item(&self, item: &T) -> StoreResult<()>;

    /// Replace the stored record sharing `item`'s identifier.
    fn update_item(&self, item: &T) -> StoreResult<()>;

    /// Remove the record with the given identifier.
    fn delete_item(&self, id: RecordId) -> StoreResult<()>;
}
