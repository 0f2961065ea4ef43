use serde::{Deserialize, Serialize};

/// Configuration shared by both backend layouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Suffix that marks a not-yet-existing path as a single-file collection.
    pub collection_extension: String,
    /// Extension of per-record files in directory mode.
    pub item_extension: String,
    /// Pretty-print JSON on write.
    pub pretty: bool,
    /// `fsync` the temporary file before renaming it into place.
    pub sync_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection_extension: "json".into(),
            item_extension: "json".into(),
            pretty: true,
            sync_writes: false,
        }
    }
}

impl StoreConfig {
    pub(crate) fn write_options(&self) -> WriteOptions {
        WriteOptions {
            pretty: self.pretty,
            sync: self.sync_writes,
        }
    }
}

/// How a single JSON document is written to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub pretty: bool,
    pub sync: bool,
}
