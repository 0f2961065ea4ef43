//! Whole-file JSON I/O with atomic replacement.
//!
//! Writes go to `<path>.tmp` and are then renamed over `<path>`, so a reader
//! sees either the previous content or the new content, never a prefix.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::WriteOptions;
use crate::error::{StoreError, StoreResult};

/// Sibling path used while a write is in flight.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Read a file's bytes, returning `Ok(None)` if it does not exist.
pub fn read_file(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Decode a JSON document read from `path`.
pub fn decode_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize `value` and atomically replace `path` with it.
///
/// Missing parent directories are created. If any step fails the temporary
/// file is removed and the destination is left untouched.
pub fn write_json_atomic<T>(path: &Path, value: &T, options: WriteOptions) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let payload = if options.pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|e| StoreError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    if let Err(e) = write_and_rename(&tmp, path, &payload, options.sync) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!(path = %path.display(), len = payload.len(), "atomic write");
    Ok(())
}

fn write_and_rename(tmp: &Path, dest: &Path, payload: &[u8], sync: bool) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(payload)?;
    if sync {
        file.sync_all()?;
    }
    drop(file);
    fs::rename(tmp, dest)
}
