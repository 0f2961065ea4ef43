use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_types::{parse_record_id, record_key, Record, RecordId};
use tracing::{debug, warn};

use crate::atomic::{decode_json, read_file, write_json_atomic};
use crate::config::WriteOptions;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Backend, BackendKind};

/// Backend that stores each record in its own file, `<id>.<ext>`, inside a
/// base directory.
///
/// Enumeration is best-effort: files with a foreign extension, a stem that is
/// not the canonical spelling of a record identifier, undecodable content, or
/// a stored id that disagrees with the file name are skipped rather than
/// failing the whole read. The base directory is created on first create.
pub struct DirectoryBackend<T> {
    base_dir: PathBuf,
    extension: String,
    options: WriteOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DirectoryBackend<T> {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        options: WriteOptions,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: extension.into(),
            options,
            _marker: PhantomData,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File holding the record with the given identifier.
    pub fn item_path(&self, id: RecordId) -> PathBuf {
        self.base_dir.join(format!("{id}.{}", self.extension))
    }

    /// Identifier encoded in `path`'s file name, if it is one of ours.
    fn id_from_path(&self, path: &Path) -> Option<RecordId> {
        if path.extension()? != self.extension.as_str() {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        match parse_record_id(stem) {
            // Only the canonical spelling is addressable by `item_path`.
            Ok(id) if record_key(id) == stem => Some(id),
            Ok(id) => {
                warn!(path = %path.display(), id, "skipping non-canonical record file name");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file with unparseable id");
                None
            }
        }
    }
}

impl<T> DirectoryBackend<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn read_item(&self, path: &Path) -> StoreResult<T> {
        let bytes = read_file(path)?.ok_or_else(|| StoreError::NotFound {
            path: path.to_path_buf(),
        })?;
        decode_json(path, &bytes)
    }
}

impl<T> Backend<T> for DirectoryBackend<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn kind(&self) -> BackendKind {
        BackendKind::Directory
    }

    fn read_all(&self, require_exist: bool) -> StoreResult<Vec<T>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if require_exist {
                    return Err(StoreError::NotFound {
                        path: self.base_dir.clone(),
                    });
                }
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.base_dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping entry with unknown file type");
                    continue;
                }
            }
            let Some(id) = self.id_from_path(&path) else {
                continue;
            };
            match self.read_item(&path) {
                Ok(item) if item.id() == id => items.push((id, item)),
                Ok(item) => {
                    warn!(
                        path = %path.display(),
                        stored_id = item.id(),
                        "skipping record whose id does not match its file name"
                    );
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable record file");
                }
            }
        }

        // Directory order is unspecified; present records by file id.
        items.sort_by_key(|(id, _)| *id);
        debug!(dir = %self.base_dir.display(), count = items.len(), "directory enumerated");
        Ok(items.into_iter().map(|(_, item)| item).collect())
    }

    fn create_item(&self, item: &T) -> StoreResult<()> {
        fs::create_dir_all(&self.base_dir)?;
        write_json_atomic(&self.item_path(item.id()), item, self.options)
    }

    fn update_item(&self, item: &T) -> StoreResult<()> {
        let path = self.item_path(item.id());
        if !path.try_exists()? {
            return Err(StoreError::ItemNotFound { id: item.id() });
        }
        write_json_atomic(&path, item, self.options)
    }

    fn delete_item(&self, id: RecordId) -> StoreResult<()> {
        match fs::remove_file(self.item_path(id)) {
            Ok(()) => {
                debug!(id, dir = %self.base_dir.display(), "record file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::ItemNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }
}

impl<T> std::fmt::Debug for DirectoryBackend<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryBackend")
            .field("base_dir", &self.base_dir)
            .field("extension", &self.extension)
            .field("options", &self.options)
            .finish()
    }
}
