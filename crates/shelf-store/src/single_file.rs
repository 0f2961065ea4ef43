use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_types::{Record, RecordId};
use tracing::debug;

use crate::atomic::{decode_json, read_file, write_json_atomic};
use crate::config::WriteOptions;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Backend, BackendKind};

/// Backend that keeps the whole collection as one JSON array in one file.
///
/// Every mutation reads the full array, changes it in memory, and atomically
/// rewrites the file. The internal lock is held for the complete
/// read-modify-write span, so callers sharing one backend never lose each
/// other's writes. Separate backend instances over the same path do not share
/// the lock.
pub struct SingleFileBackend<T> {
    path: PathBuf,
    options: WriteOptions,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SingleFileBackend<T> {
    pub fn new(path: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self {
            path: path.into(),
            options,
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> SingleFileBackend<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Load the array without taking the lock.
    ///
    /// An empty file or a JSON `null` is an empty collection.
    fn load(&self, require_exist: bool) -> StoreResult<Vec<T>> {
        let Some(bytes) = read_file(&self.path)? else {
            if require_exist {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            return Ok(Vec::new());
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let items: Option<Vec<T>> = decode_json(&self.path, &bytes)?;
        Ok(items.unwrap_or_default())
    }

    fn store(&self, items: &[T]) -> StoreResult<()> {
        write_json_atomic(&self.path, items, self.options)?;
        debug!(path = %self.path.display(), count = items.len(), "collection file written");
        Ok(())
    }
}

impl<T> Backend<T> for SingleFileBackend<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn kind(&self) -> BackendKind {
        BackendKind::SingleFile
    }

    fn read_all(&self, require_exist: bool) -> StoreResult<Vec<T>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load(require_exist)
    }

    fn create_item(&self, item: &T) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load(false)?;
        items.push(item.clone());
        self.store(&items)
    }

    fn update_item(&self, item: &T) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load(false)?;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or(StoreError::ItemNotFound { id: item.id() })?;
        *slot = item.clone();
        self.store(&items)
    }

    fn delete_item(&self, id: RecordId) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load(false)?;
        items.retain(|existing| existing.id() != id);
        self.store(&items)
    }
}

impl<T> std::fmt::Debug for SingleFileBackend<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFileBackend")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}
