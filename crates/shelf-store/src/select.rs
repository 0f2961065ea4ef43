//! Backend selection.
//!
//! The layout is decided once, when a collection is opened, by inspecting the
//! path. [`StorageBackend`] is the closed set of layouts the factory can pick.

use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_types::{Record, RecordId};
use tracing::debug;

use crate::config::StoreConfig;
use crate::directory::DirectoryBackend;
use crate::error::StoreResult;
use crate::single_file::SingleFileBackend;
use crate::traits::{Backend, BackendKind};

/// One of the two on-disk layouts, chosen by [`open_backend`].
#[derive(Debug)]
pub enum StorageBackend<T> {
    SingleFile(SingleFileBackend<T>),
    Directory(DirectoryBackend<T>),
}

/// Decide which layout `path` designates.
///
/// - existing directory ⇒ [`BackendKind::Directory`]
/// - existing non-directory ⇒ [`BackendKind::SingleFile`]
/// - missing path ending in `.<collection_extension>` ⇒ single-file
/// - any other missing path ⇒ directory, created on first write
pub fn detect_kind(path: &Path, config: &StoreConfig) -> io::Result<BackendKind> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(BackendKind::Directory),
        Ok(_) => Ok(BackendKind::SingleFile),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Suffix match, so a bare `.json` also names a collection file.
            let suffix = format!(".{}", config.collection_extension);
            let is_collection_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&suffix));
            if is_collection_file {
                Ok(BackendKind::SingleFile)
            } else {
                Ok(BackendKind::Directory)
            }
        }
        Err(e) => Err(e),
    }
}

/// Open the backend `path` designates.
pub fn open_backend<T>(path: impl AsRef<Path>, config: &StoreConfig) -> StoreResult<StorageBackend<T>> {
    let path = path.as_ref();
    let kind = detect_kind(path, config)?;
    debug!(path = %path.display(), %kind, "backend selected");

    let options = config.write_options();
    Ok(match kind {
        BackendKind::SingleFile => StorageBackend::SingleFile(SingleFileBackend::new(path, options)),
        BackendKind::Directory => StorageBackend::Directory(DirectoryBackend::new(
            path,
            config.item_extension.clone(),
            options,
        )),
    })
}

impl<T> Backend<T> for StorageBackend<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn kind(&self) -> BackendKind {
        match self {
            Self::SingleFile(b) => b.kind(),
            Self::Directory(b) => b.kind(),
        }
    }

    fn read_all(&self, require_exist: bool) -> StoreResult<Vec<T>> {
        match self {
            Self::SingleFile(b) => b.read_all(require_exist),
            Self::Directory(b) => b.read_all(require_exist),
        }
    }

    fn create_item(&self, item: &T) -> StoreResult<()> {
        match self {
            Self::SingleFile(b) => b.create_item(item),
            Self::Directory(b) => b.create_item(item),
        }
    }

    fn update_item(&self, item: &T) -> StoreResult<()> {
        match self {
            Self::SingleFile(b) => b.update_item(item),
            Self::Directory(b) => b.update_item(item),
        }
    }

    fn delete_item(&self, id: RecordId) -> StoreResult<()> {
        match self {
            Self::SingleFile(b) => b.delete_item(id),
            Self::Directory(b) => b.delete_item(id),
        }
    }
}
