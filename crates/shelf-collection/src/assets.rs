use std::collections::HashMap;

use shelf_types::{AssetRef, RecordId};

/// Side-table associating records with media assets.
///
/// The table is populated by whoever owns the assets; collection CRUD never
/// writes to it, and deleting a record does not drop its entry.
#[derive(Clone, Debug, Default)]
pub struct AssetIndex {
    by_record: HashMap<RecordId, Vec<AssetRef>>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the assets recorded for `id`.
    pub fn set(&mut self, id: RecordId, assets: Vec<AssetRef>) {
        self.by_record.insert(id, assets);
    }

    /// Append one asset to `id`'s list.
    pub fn attach(&mut self, id: RecordId, asset: AssetRef) {
        self.by_record.entry(id).or_default().push(asset);
    }

    /// Assets recorded for `id`; empty when there are none.
    pub fn get(&self, id: RecordId) -> &[AssetRef] {
        self.by_record.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, id: RecordId) -> Option<Vec<AssetRef>> {
        self.by_record.remove(&id)
    }

    /// Number of records with at least one entry.
    pub fn len(&self) -> usize {
        self.by_record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_record.is_empty()
    }
}
