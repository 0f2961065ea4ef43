use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a media asset associated with a record.
///
/// Assets are owned elsewhere; a collection only keeps these lightweight
/// references in its side-table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    /// Identifier of the asset in its owning library.
    pub id: u64,
    /// File name of the asset's primary resource.
    pub file_name: String,
}

impl AssetRef {
    pub fn new(id: u64, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{} ({})", self.id, self.file_name)
    }
}
