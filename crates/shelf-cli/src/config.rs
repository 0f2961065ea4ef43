use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shelf_collection::SortOptions;
use shelf_store::StoreConfig;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Collection path used when `--store` is not given.
    pub path: PathBuf,
    /// Default sort key for `list`.
    pub sort_by: String,
    /// Default sort order for `list`.
    pub sort_order: String,
    pub store: StoreConfig,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("notes.json"),
            sort_by: "id".into(),
            sort_order: "asc".into(),
            store: StoreConfig::default(),
        }
    }
}

impl ShelfConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `./shelf.toml` is used if
    /// present and the defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Sort options for `list`, with per-invocation overrides.
    pub fn sort_options(&self, sort_by: Option<&str>, sort_order: Option<&str>) -> SortOptions {
        SortOptions::parse(
            sort_by.unwrap_or(&self.sort_by),
            sort_order.unwrap_or(&self.sort_order),
        )
    }
}
