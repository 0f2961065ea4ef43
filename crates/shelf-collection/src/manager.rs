use std::path::Path;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_registry::Registry;
use shelf_store::{open_backend, Backend, BackendKind, StorageBackend, StoreConfig};
use shelf_types::{record_key, AssetRef, Record, RecordId};
use tracing::{debug, info};

use crate::assets::AssetIndex;
use crate::error::{CollectionError, CollectionResult};
use crate::sort::{sort_records, SortOptions};

/// A file-backed collection of records with an in-memory index.
///
/// The manager owns one backend and one registry. Mutations are written
/// through: the backend is updated first and the registry only after the
/// backend reports success, so a failed call leaves the registry exactly as
/// it was. Every read is served from the registry.
pub struct CollectionManager<T, B = StorageBackend<T>> {
    backend: B,
    items: Registry<T>,
    assets: AssetIndex,
}

impl<T> CollectionManager<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Open the collection at `path` with the default store configuration.
    ///
    /// An existing directory is read as one file per record, an existing file
    /// as a single JSON array. A missing path ending in `.json` becomes a
    /// single-file collection, any other missing path a directory.
    pub fn open(path: impl AsRef<Path>, require_exist: bool) -> CollectionResult<Self> {
        Self::open_with_config(path, require_exist, &StoreConfig::default())
    }

    pub fn open_with_config(
        path: impl AsRef<Path>,
        require_exist: bool,
        config: &StoreConfig,
    ) -> CollectionResult<Self> {
        let path = path.as_ref();
        let backend = open_backend(path, config).map_err(|source| CollectionError::Load { source })?;
        let manager = Self::with_backend(backend, require_exist)?;
        info!(
            path = %path.display(),
            kind = %manager.backend_kind(),
            count = manager.len(),
            "collection opened"
        );
        Ok(manager)
    }
}

impl<T, B> CollectionManager<T, B>
where
    T: Record,
    B: Backend<T>,
{
    /// Build a manager over an already constructed backend and load it.
    pub fn with_backend(backend: B, require_exist: bool) -> CollectionResult<Self> {
        let mut manager = Self {
            backend,
            items: Registry::new(),
            assets: AssetIndex::new(),
        };
        manager.load(require_exist)?;
        Ok(manager)
    }

    fn load(&mut self, require_exist: bool) -> CollectionResult<()> {
        let items = self
            .backend
            .read_all(require_exist)
            .map_err(|source| CollectionError::Load { source })?;
        self.items = items
            .into_iter()
            .map(|item| (record_key(item.id()), item))
            .collect();
        debug!(count = self.items.len(), "registry loaded");
        Ok(())
    }

    /// Discard the registry and rebuild it from the backend.
    ///
    /// On failure the previous registry is kept.
    pub fn reload(&mut self) -> CollectionResult<()> {
        self.load(false)
    }

    /// Identifier the next `create` will assign.
    pub fn next_id(&self) -> CollectionResult<RecordId> {
        self.items
            .values()
            .map(Record::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(CollectionError::IdSpaceExhausted)
    }

    /// Store a new record.
    ///
    /// The record receives the next identifier (one past the largest known,
    /// so deleted identifiers are never reused) and both timestamps are set
    /// to now. Returns the record as stored.
    pub fn create(&mut self, mut item: T) -> CollectionResult<T> {
        let now = Utc::now();
        item.set_id(self.next_id()?);
        item.set_creation_date(now);
        item.set_modification_date(now);

        self.backend.create_item(&item)?;
        self.items.register(record_key(item.id()), item.clone());
        debug!(id = item.id(), "record created");
        Ok(item)
    }

    /// Replace a stored record with `item`, stamping its modification date.
    ///
    /// The whole record is written; there is no field-level merge.
    pub fn update(&mut self, mut item: T) -> CollectionResult<T> {
        item.set_modification_date(Utc::now());

        self.backend.update_item(&item)?;
        self.items.update(record_key(item.id()), item.clone());
        debug!(id = item.id(), "record updated");
        Ok(item)
    }

    /// Delete the record with `id` from the backend, then from the index.
    pub fn delete(&mut self, id: RecordId) -> CollectionResult<()> {
        self.backend.delete_item(id)?;
        self.items.delete(&record_key(id));
        debug!(id, "record deleted");
        Ok(())
    }

    pub fn get(&self, id: RecordId) -> CollectionResult<T> {
        self.items
            .get(&record_key(id))
            .cloned()
            .map_err(|_| CollectionError::ItemNotFound { id })
    }

    /// Snapshot of every record, in unspecified order.
    pub fn get_all(&self) -> Vec<T> {
        self.items.get_all_values()
    }

    /// Snapshot of the records matching `filter`; `None` matches everything.
    pub fn get_list(&self, filter: Option<&dyn Fn(&T) -> bool>) -> Vec<T> {
        match filter {
            Some(keep) => self.items.values().filter(|item| keep(*item)).cloned().collect(),
            None => self.get_all(),
        }
    }

    /// Assets associated with `id` in the side-table.
    pub fn get_item_assets(&self, id: RecordId) -> &[AssetRef] {
        self.assets.get(id)
    }

    pub fn assets(&self) -> &AssetIndex {
        &self.assets
    }

    /// Mutable access for whoever populates the asset side-table.
    pub fn assets_mut(&mut self) -> &mut AssetIndex {
        &mut self.assets
    }

    /// Order `items` by `options`. The registry is not touched.
    pub fn sort_items(&self, items: Vec<T>, options: &SortOptions) -> Vec<T> {
        sort_records(items, options)
    }

    pub fn get_sorted_list(&self, filter: Option<&dyn Fn(&T) -> bool>, options: &SortOptions) -> Vec<T> {
        self.sort_items(self.get_list(filter), options)
    }

    pub fn get_all_sorted(&self, options: &SortOptions) -> Vec<T> {
        self.sort_items(self.get_all(), options)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<T, B: std::fmt::Debug> std::fmt::Debug for CollectionManager<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("backend", &self.backend)
            .field("items", &self.items.len())
            .field("assets", &self.assets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortKey, SortOrder};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use serde::Deserialize;
    use shelf_store::{StoreError, StoreResult};
    use shelf_types::Timestamp;
    use std::cell::Cell;
    use std::fs;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Message {
        id: RecordId,
        content: String,
        #[serde(default)]
        pinned: bool,
        creation_date: Timestamp,
        modification_date: Timestamp,
    }

    impl Record for Message {
        fn id(&self) -> RecordId {
            self.id
        }
        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
        fn creation_date(&self) -> Timestamp {
            self.creation_date
        }
        fn set_creation_date(&mut self, at: Timestamp) {
            self.creation_date = at;
        }
        fn modification_date(&self) -> Timestamp {
            self.modification_date
        }
        fn set_modification_date(&mut self, at: Timestamp) {
            self.modification_date = at;
        }
    }

    fn epoch() -> Timestamp {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    fn message(content: &str) -> Message {
        Message {
            id: 0,
            content: content.to_string(),
            pinned: false,
            creation_date: epoch(),
            modification_date: epoch(),
        }
    }

    fn by_id(mut items: Vec<Message>) -> Vec<Message> {
        items.sort_by_key(|m| m.id);
        items
    }

    /// Assert the registry matches a fresh read of the same path.
    fn assert_write_through(manager: &CollectionManager<Message>, path: &Path) {
        let fresh: CollectionManager<Message> = CollectionManager::open(path, true).unwrap();
        assert_eq!(by_id(manager.get_all()), by_id(fresh.get_all()));
    }

    /// Backend whose writes can be switched to fail.
    struct FlakyBackend {
        seed: Vec<Message>,
        fail_writes: Cell<bool>,
    }

    impl FlakyBackend {
        fn failure() -> StoreError {
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn check(&self) -> StoreResult<()> {
            if self.fail_writes.get() {
                Err(Self::failure())
            } else {
                Ok(())
            }
        }
    }

    impl Backend<Message> for FlakyBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::SingleFile
        }
        fn read_all(&self, _require_exist: bool) -> StoreResult<Vec<Message>> {
            Ok(self.seed.clone())
        }
        fn create_item(&self, _item: &Message) -> StoreResult<()> {
            self.check()
        }
        fn update_item(&self, _item: &Message) -> StoreResult<()> {
            self.check()
        }
        fn delete_item(&self, _id: RecordId) -> StoreResult<()> {
            self.check()
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();
        assert_eq!(manager.backend_kind(), BackendKind::SingleFile);

        let ids: Vec<RecordId> = ["a", "b", "c"]
            .iter()
            .map(|c| manager.create(message(c)).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages"), false).unwrap();
        manager.create(message("a")).unwrap();
        manager.create(message("b")).unwrap();
        manager.create(message("c")).unwrap();

        manager.delete(2).unwrap();
        assert_eq!(manager.create(message("d")).unwrap().id, 4);

        // Only the maximum matters: deleting the top id frees it.
        manager.delete(4).unwrap();
        assert_eq!(manager.next_id().unwrap(), 4);
    }

    #[test]
    fn create_stamps_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();

        let before = Utc::now();
        let stored = manager.create(message("hello")).unwrap();
        let after = Utc::now();

        assert!(stored.creation_date >= before && stored.creation_date <= after);
        assert_eq!(stored.creation_date, stored.modification_date);
        assert_eq!(manager.get(stored.id).unwrap(), stored);
    }

    #[test]
    fn update_restamps_modification_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();
        let stored = manager.create(message("draft")).unwrap();

        let mut edited = stored.clone();
        edited.content = "final".into();
        let updated = manager.update(edited).unwrap();

        assert_eq!(updated.creation_date, stored.creation_date);
        assert!(updated.modification_date >= stored.modification_date);
        assert_eq!(manager.get(stored.id).unwrap().content, "final");
    }

    #[test]
    fn update_missing_record_fails_on_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["messages.json", "messages"] {
            let mut manager: CollectionManager<Message> =
                CollectionManager::open(dir.path().join(name), false).unwrap();
            manager.create(message("only")).unwrap();

            let mut ghost = message("ghost");
            ghost.id = 99;
            let err = manager.update(ghost).unwrap_err();
            assert!(err.is_item_not_found(), "{name}: {err}");
            assert!(manager.get(99).is_err());
            assert_eq!(manager.len(), 1);
        }
    }

    #[test]
    fn delete_then_get_is_item_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages"), false).unwrap();
        let stored = manager.create(message("bye")).unwrap();

        manager.delete(stored.id).unwrap();
        let err = manager.get(stored.id).unwrap_err();
        assert!(matches!(err, CollectionError::ItemNotFound { id } if id == stored.id));
    }

    #[test]
    fn write_through_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        let mut manager: CollectionManager<Message> = CollectionManager::open(&path, false).unwrap();

        let a = manager.create(message("a")).unwrap();
        assert_write_through(&manager, &path);
        manager.create(message("b")).unwrap();
        assert_write_through(&manager, &path);

        let mut edited = a.clone();
        edited.pinned = true;
        manager.update(edited).unwrap();
        assert_write_through(&manager, &path);

        manager.delete(a.id).unwrap();
        assert_write_through(&manager, &path);
    }

    #[test]
    fn write_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages");
        let mut manager: CollectionManager<Message> = CollectionManager::open(&path, false).unwrap();
        assert_eq!(manager.backend_kind(), BackendKind::Directory);

        let a = manager.create(message("a")).unwrap();
        manager.create(message("b")).unwrap();
        assert_write_through(&manager, &path);

        let mut edited = a.clone();
        edited.content = "a2".into();
        manager.update(edited).unwrap();
        assert_write_through(&manager, &path);

        manager.delete(a.id).unwrap();
        assert_write_through(&manager, &path);
        assert!(!path.join("1.json").exists());
    }

    #[test]
    fn open_required_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["messages.json", "messages"] {
            let err = CollectionManager::<Message>::open(dir.path().join(name), true).unwrap_err();
            assert!(
                matches!(err, CollectionError::Load { source: StoreError::NotFound { .. } }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn open_optional_missing_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();
        assert!(manager.is_empty());
        assert!(manager.get_all().is_empty());
    }

    #[test]
    fn open_corrupt_single_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        fs::write(&path, b"{not json").unwrap();

        let err = CollectionManager::<Message>::open(&path, false).unwrap_err();
        assert!(matches!(err, CollectionError::Load { source: StoreError::Decode { .. } }));
    }

    #[test]
    fn reads_do_not_touch_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        let mut manager: CollectionManager<Message> = CollectionManager::open(&path, false).unwrap();
        let stored = manager.create(message("cached")).unwrap();

        fs::remove_file(&path).unwrap();
        assert_eq!(manager.get(stored.id).unwrap(), stored);
        assert_eq!(manager.get_all().len(), 1);

        manager.reload().unwrap();
        assert!(manager.is_empty());
    }

    #[test]
    fn failed_mutations_leave_registry_untouched() {
        let mut seeded = message("seed");
        seeded.id = 5;
        let backend = FlakyBackend {
            seed: vec![seeded.clone()],
            fail_writes: Cell::new(false),
        };
        let mut manager: CollectionManager<Message, FlakyBackend> =
            CollectionManager::with_backend(backend, true).unwrap();
        manager.backend().fail_writes.set(true);

        assert!(matches!(
            manager.create(message("new")),
            Err(CollectionError::Store(StoreError::Io(_)))
        ));
        let mut edited = seeded.clone();
        edited.content = "changed".into();
        assert!(manager.update(edited).is_err());
        assert!(manager.delete(5).is_err());

        assert_eq!(manager.get_all(), vec![seeded]);
        assert_eq!(manager.next_id().unwrap(), 6);

        manager.backend().fail_writes.set(false);
        assert_eq!(manager.create(message("new")).unwrap().id, 6);
    }

    #[test]
    fn get_list_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();
        for (content, pinned) in [("a", true), ("b", false), ("c", true)] {
            let mut m = message(content);
            m.pinned = pinned;
            manager.create(m).unwrap();
        }

        let pinned = manager.get_list(Some(&|m: &Message| m.pinned));
        let mut contents: Vec<String> = pinned.into_iter().map(|m| m.content).collect();
        contents.sort();
        assert_eq!(contents, vec!["a", "c"]);

        assert_eq!(manager.get_list(None).len(), 3);
    }

    #[test]
    fn sorted_variants() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages"), false).unwrap();
        for c in ["a", "b", "c", "d"] {
            manager.create(message(c)).unwrap();
        }

        let desc = manager.get_all_sorted(&SortOptions::new(SortKey::Id, SortOrder::Descending));
        let ids: Vec<RecordId> = desc.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let even = |m: &Message| m.id % 2 == 0;
        let asc = manager.get_sorted_list(Some(&even), &SortOptions::parse("id", "asc"));
        let ids: Vec<RecordId> = asc.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn item_assets_come_from_side_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager: CollectionManager<Message> =
            CollectionManager::open(dir.path().join("messages.json"), false).unwrap();
        let stored = manager.create(message("with photo")).unwrap();

        assert!(manager.get_item_assets(stored.id).is_empty());
        manager
            .assets_mut()
            .attach(stored.id, AssetRef::new(900, "IMG_0900.JPG"));
        assert_eq!(
            manager.get_item_assets(stored.id),
            &[AssetRef::new(900, "IMG_0900.JPG")]
        );

        // CRUD does not maintain the side-table.
        manager.delete(stored.id).unwrap();
        assert_eq!(manager.get_item_assets(stored.id).len(), 1);
    }

    #[test]
    fn loads_existing_directory_skipping_junk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages");
        fs::create_dir(&path).unwrap();
        let mut existing = message("kept");
        existing.id = 7;
        fs::write(path.join("7.json"), serde_json::to_vec(&existing).unwrap()).unwrap();
        fs::write(path.join("8.json"), b"garbage").unwrap();
        fs::write(path.join("readme.md"), b"# hi").unwrap();

        let mut manager: CollectionManager<Message> = CollectionManager::open(&path, true).unwrap();
        assert_eq!(manager.get_all(), vec![existing]);
        assert_eq!(manager.create(message("next")).unwrap().id, 8);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn sequential_creates_are_consecutive(n in 1usize..12, directory in any::<bool>()) {
            let dir = tempfile::tempdir().unwrap();
            let path = if directory {
                dir.path().join("messages")
            } else {
                dir.path().join("messages.json")
            };
            let mut manager: CollectionManager<Message> = CollectionManager::open(&path, false).unwrap();

            for expected in 1..=n as RecordId {
                let stored = manager.create(message("m")).unwrap();
                prop_assert_eq!(stored.id, expected);
            }
        }
    }
}
