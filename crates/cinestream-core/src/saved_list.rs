//! My List: the user's saved movies and TV shows.
//!
//! The list is an ordered set keyed by `(id, media_type)`. It is loaded once
//! from a [`KeyValueStore`], and every change that actually alters the list is
//! written back wholesale and announced to subscribers.
//!
//! Two stores writing the same key (two processes, say) do not merge: the last
//! write wins.

use cinestream_models::{CatalogItem, CatalogRecord, ItemKey, MediaType, SavedItem};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::subscription::{ListChange, Subscribers, Subscription};

/// Storage key My List is persisted under
pub const MY_LIST_KEY: &str = "cinestream-my-list";

pub struct SavedListStore<S: KeyValueStore> {
    storage: S,
    key: String,
    items: Vec<SavedItem>,
    index: HashSet<ItemKey>,
    subscribers: Subscribers,
    durable: bool,
}

impl<S: KeyValueStore> SavedListStore<S> {
    /// Open the list stored under [`MY_LIST_KEY`]
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, MY_LIST_KEY)
    }

    /// Open the list stored under `key`.
    ///
    /// Never fails: missing, unreadable or corrupt data yields an empty list.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded = load_items(&storage, &key);

        let mut items = Vec::with_capacity(loaded.len());
        let mut index = HashSet::with_capacity(loaded.len());
        let mut duplicates = 0;
        for item in loaded {
            if index.insert(item.key()) {
                items.push(item);
            } else {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            warn!(
                "My List '{}' contained {} duplicate entries; keeping the first of each",
                key, duplicates
            );
        }

        Self {
            storage,
            key,
            items,
            index,
            subscribers: Subscribers::default(),
            durable: true,
        }
    }

    /// Append `item` unless an entry with the same identity exists.
    ///
    /// Returns `true` if the list changed. An existing entry is left as is,
    /// even if `item` carries different fields.
    pub fn add(&mut self, item: CatalogItem) -> bool {
        let key = item.key();
        if self.index.contains(&key) {
            debug!("{} is already in My List", key);
            return false;
        }

        self.items.push(SavedItem::from(item));
        self.index.insert(key);
        self.commit(ListChange::Added(key));
        true
    }

    /// Classify an untagged record and add it
    pub fn add_record(&mut self, record: CatalogRecord) -> Result<bool, StoreError> {
        let item = CatalogItem::classify(record)?;
        Ok(self.add(item))
    }

    /// Add a raw JSON catalog record, rejecting values without a usable identity
    pub fn add_value(&mut self, value: Value) -> Result<bool, StoreError> {
        let item = CatalogItem::from_value(value)?;
        Ok(self.add(item))
    }

    /// Remove the entry with this identity. Returns `true` if one was removed.
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> bool {
        let key = ItemKey::new(id, media_type);
        if !self.index.remove(&key) {
            debug!("{} is not in My List, nothing to remove", key);
            return false;
        }

        match self.items.iter().position(|item| item.matches(id, media_type)) {
            // Vec::remove shifts the tail, keeping relative order
            Some(position) => {
                self.items.remove(position);
            }
            None => {
                warn!("My List index had {} but the list did not", key);
            }
        }
        self.commit(ListChange::Removed(key));
        true
    }

    /// Remove `item` if saved, add it otherwise. Returns whether it is now saved.
    pub fn toggle(&mut self, item: CatalogItem) -> bool {
        let key = item.key();
        if self.index.contains(&key) {
            self.remove(key.id, key.media_type);
            false
        } else {
            self.add(item)
        }
    }

    /// Remove everything. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        if removed == 0 {
            return 0;
        }

        self.items.clear();
        self.index.clear();
        self.commit(ListChange::Cleared { removed });
        removed
    }

    pub fn is_saved(&self, id: u64, media_type: MediaType) -> bool {
        self.index.contains(&ItemKey::new(id, media_type))
    }

    pub fn get(&self, id: u64, media_type: MediaType) -> Option<&SavedItem> {
        if !self.is_saved(id, media_type) {
            return None;
        }
        self.items.iter().find(|item| item.matches(id, media_type))
    }

    /// Snapshot of the list in insertion order
    pub fn list(&self) -> Vec<SavedItem> {
        self.items.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedItem> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.items.iter().map(SavedItem::key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Register `callback` to run after every change to the list
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ListChange) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// `false` when the last write failed and the stored list is behind memory
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, change: ListChange) {
        self.persist();
        debug!("My List {}", change);
        self.subscribers.notify(&change);
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize My List '{}': {}", self.key, e);
                self.durable = false;
                return;
            }
        };

        match self.storage.write(&self.key, &json) {
            Ok(()) => {
                debug!("Saved My List '{}' ({} items)", self.key, self.items.len());
                self.durable = true;
            }
            Err(e) => {
                error!(
                    "Failed to save My List '{}': {}. Changes are kept for this session only.",
                    self.key, e
                );
                self.durable = false;
            }
        }
    }
}

fn load_items<S: KeyValueStore>(storage: &S, key: &str) -> Vec<SavedItem> {
    let content = match storage.read(key) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("No saved My List under '{}', starting empty", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read My List '{}': {}. Starting with an empty list.", key, e);
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<SavedItem>>(&content) {
        Ok(items) => {
            info!("Loaded My List '{}' ({} items)", key, items.len());
            items
        }
        Err(e) => {
            warn!(
                "My List corruption detected under '{}': {}. Starting with an empty list.",
                key, e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::kv::{FileKeyValueStore, MemoryKeyValueStore};
    use cinestream_models::{CatalogFields, ModelError};
    use serde_json::json;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    fn movie(id: u64, title: &str) -> CatalogItem {
        CatalogItem::from_value(json!({"id": id, "media_type": "movie", "title": title})).unwrap()
    }

    fn show(id: u64, name: &str) -> CatalogItem {
        CatalogItem::from_value(json!({"id": id, "media_type": "tv", "name": name})).unwrap()
    }

    fn keys<S: KeyValueStore>(store: &SavedListStore<S>) -> Vec<ItemKey> {
        store.keys().collect()
    }

    fn record_changes<S: KeyValueStore>(
        store: &SavedListStore<S>,
    ) -> (Arc<Mutex<Vec<ListChange>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = store.subscribe(move |change: &ListChange| sink.lock().unwrap().push(change.clone()));
        (seen, sub)
    }

    /// Storage whose writes can be switched off
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        fail_writes: Cell<bool>,
        writes: Cell<usize>,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryKeyValueStore::new(),
                fail_writes: Cell::new(false),
                writes: Cell::new(0),
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes.get() {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.write(key, value)
        }
    }

    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_open_empty_storage() {
        let store = SavedListStore::open(MemoryKeyValueStore::new());
        assert!(store.is_empty());
        assert_eq!(store.storage_key(), MY_LIST_KEY);
        assert!(store.is_durable());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        assert!(store.add(movie(550, "Fight Club")));
        assert!(!store.add(movie(550, "Fight Club (again)")));

        let list = store.list();
        assert_eq!(list.len(), 1);
        // First write wins, the second add does not overwrite
        assert_eq!(list[0].title(), Some("Fight Club"));
    }

    #[test]
    fn test_duplicate_add_does_not_reorder() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        store.add(movie(1, "A"));
        store.add(movie(2, "B"));
        store.add(movie(1, "A"));
        assert_eq!(keys(&store), vec![ItemKey::movie(1), ItemKey::movie(2)]);
    }

    #[test]
    fn test_identity_stays_unique() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        for id in [3, 1, 3, 2, 1, 3] {
            store.add(movie(id, "x"));
            store.add(show(id, "y"));
        }
        let keys = keys(&store);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage = MemoryKeyValueStore::new();
        let mut store = SavedListStore::open(storage.clone());
        store.add(movie(550, "Fight Club"));
        let before = store.list();
        let persisted = storage.read(MY_LIST_KEY).unwrap();

        assert!(!store.remove(551, MediaType::Movie));
        assert!(!store.remove(550, MediaType::Tv));

        assert_eq!(store.list(), before);
        assert_eq!(storage.read(MY_LIST_KEY).unwrap(), persisted);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        store.add(movie(1, "A"));
        store.add(movie(2, "B"));
        store.add(movie(3, "C"));

        assert!(store.remove(2, MediaType::Movie));
        assert_eq!(keys(&store), vec![ItemKey::movie(1), ItemKey::movie(3)]);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = MemoryKeyValueStore::new();
        let mut store = SavedListStore::open(storage.clone());
        store.add(movie(550, "Fight Club"));
        store.add(show(1399, "Game of Thrones"));
        store.add(movie(13, "Forrest Gump"));
        store.remove(550, MediaType::Movie);
        let expected = store.list();
        drop(store);

        let reopened = SavedListStore::open(storage);
        assert_eq!(reopened.list(), expected);
        assert!(reopened.is_saved(1399, MediaType::Tv));
    }

    #[test]
    fn test_round_trip_through_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = SavedListStore::open(FileKeyValueStore::new(dir.path()));
        store.add(show(1399, "Game of Thrones"));
        store.add(movie(550, "Fight Club"));
        let expected = store.list();
        drop(store);

        let reopened = SavedListStore::open(FileKeyValueStore::new(dir.path()));
        assert_eq!(reopened.list(), expected);
    }

    #[test]
    fn test_corrupt_state_starts_empty() {
        for corrupt in ["{not json", "{\"id\": 1}", "[{\"id\": \"x\"}]", "[{\"id\": 1, \"media_type\": \"person\"}]", "42"] {
            let store = SavedListStore::open(MemoryKeyValueStore::with_entry(MY_LIST_KEY, corrupt));
            assert!(store.is_empty(), "expected empty list for {:?}", corrupt);
        }

        let blank = SavedListStore::open(MemoryKeyValueStore::with_entry(MY_LIST_KEY, "   "));
        assert!(blank.is_empty());

        let unreadable = SavedListStore::open(UnreadableStore);
        assert!(unreadable.is_empty());
    }

    #[test]
    fn test_corrupt_state_is_replaced_on_next_write() {
        let storage = MemoryKeyValueStore::with_entry(MY_LIST_KEY, "garbage");
        let mut store = SavedListStore::open(storage.clone());
        store.add(movie(550, "Fight Club"));

        let reopened = SavedListStore::open(storage);
        assert_eq!(keys(&reopened), vec![ItemKey::movie(550)]);
    }

    #[test]
    fn test_duplicates_in_storage_collapse_on_load() {
        let persisted = json!([
            {"id": 1, "media_type": "movie", "title": "first"},
            {"id": 1, "media_type": "tv", "name": "show"},
            {"id": 1, "media_type": "movie", "title": "second"}
        ]);
        let store = SavedListStore::open(MemoryKeyValueStore::with_entry(MY_LIST_KEY, persisted.to_string()));
        assert_eq!(keys(&store), vec![ItemKey::movie(1), ItemKey::tv(1)]);
        assert_eq!(store.get(1, MediaType::Movie).and_then(|i| i.title()), Some("first"));
    }

    #[test]
    fn test_media_type_is_part_of_identity() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        store
            .add_value(json!({"id": 550, "media_type": "movie", "title": "Fight Club", "vote_average": 8.4}))
            .unwrap();
        assert!(store.is_saved(550, MediaType::Movie));
        assert_eq!(store.list().len(), 1);

        store
            .add_value(json!({"id": 550, "media_type": "tv", "name": "Some Show"}))
            .unwrap();
        assert_eq!(store.list().len(), 2);

        store.remove(550, MediaType::Movie);
        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].media_type, MediaType::Tv);
    }

    #[test]
    fn test_persisted_blob_is_flat_array() {
        let storage = MemoryKeyValueStore::new();
        let mut store = SavedListStore::open_with_key(storage.clone(), "test-list");
        store.add(movie(550, "Fight Club"));

        let raw = storage.read("test-list").unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!([{"id": 550, "media_type": "movie", "title": "Fight Club"}]));
        assert_eq!(storage.read(MY_LIST_KEY).unwrap(), None);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        store.add(movie(1, "A"));
        let mut snapshot = store.list();
        snapshot.clear();
        snapshot.push(SavedItem::from(movie(2, "B")));
        assert_eq!(keys(&store), vec![ItemKey::movie(1)]);
    }

    #[test]
    fn test_add_value_rejects_contract_violations() {
        let storage = FlakyStore::new();
        let mut store = SavedListStore::open(&storage);

        let missing_id = store.add_value(json!({"title": "Nameless"}));
        assert!(matches!(missing_id, Err(StoreError::InvalidItem(ModelError::MissingId))));

        let person = store.add_value(json!({"id": 287, "media_type": "person"}));
        assert!(matches!(
            person,
            Err(StoreError::InvalidItem(ModelError::UnsupportedMediaType(_)))
        ));

        assert!(store.is_empty());
        assert_eq!(storage.writes.get(), 0);
    }

    #[test]
    fn test_add_record_derives_media_type() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        let record = CatalogRecord::new(1399)
            .with_field("name", "Game of Thrones")
            .with_field("first_air_date", "2011-04-17");
        assert!(store.add_record(record).unwrap());
        assert!(store.is_saved(1399, MediaType::Tv));
        assert!(!store.is_saved(1399, MediaType::Movie));
    }

    #[test]
    fn test_toggle() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        assert!(store.toggle(movie(550, "Fight Club")));
        assert!(store.is_saved(550, MediaType::Movie));
        assert!(!store.toggle(movie(550, "Fight Club")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let storage = MemoryKeyValueStore::new();
        let mut store = SavedListStore::open(storage.clone());
        assert_eq!(store.clear(), 0);
        store.add(movie(1, "A"));
        store.add(show(2, "B"));
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(SavedListStore::open(storage).is_empty());
    }

    #[test]
    fn test_subscribers_see_each_change_once() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        let (first, _first_sub) = record_changes(&store);
        let (second, _second_sub) = record_changes(&store);

        store.add(movie(1, "A"));
        store.add(movie(1, "A"));
        store.add(show(2, "B"));
        store.remove(3, MediaType::Movie);
        store.remove(1, MediaType::Movie);
        store.clear();
        store.clear();

        let expected = vec![
            ListChange::Added(ItemKey::movie(1)),
            ListChange::Added(ItemKey::tv(2)),
            ListChange::Removed(ItemKey::movie(1)),
            ListChange::Cleared { removed: 1 },
        ];
        assert_eq!(*first.lock().unwrap(), expected);
        assert_eq!(*second.lock().unwrap(), expected);
    }

    #[test]
    fn test_notification_follows_update() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        let storage = store.storage().clone();
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let _sub = store.subscribe(move |_: &ListChange| {
            *sink.lock().unwrap() = storage.read(MY_LIST_KEY).unwrap();
        });

        store.add(movie(550, "Fight Club"));

        let persisted = observed.lock().unwrap().clone().unwrap();
        assert!(persisted.contains("Fight Club"));
    }

    #[test]
    fn test_unsubscribed_callbacks_are_not_called() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        let (seen, sub) = record_changes(&store);
        store.add(movie(1, "A"));
        sub.unsubscribe();
        store.add(movie(2, "B"));

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_remove_tolerates_stale_index_entry() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        store.add(movie(1, "A"));
        store.index.insert(ItemKey::tv(9));

        assert!(store.remove(9, MediaType::Tv));
        assert!(!store.is_saved(9, MediaType::Tv));
        assert_eq!(keys(&store), vec![ItemKey::movie(1)]);
    }

    #[test]
    fn test_callback_can_unsubscribe_itself() {
        let mut store = SavedListStore::open(MemoryKeyValueStore::new());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&calls);
        let own = Arc::clone(&slot);
        let sub = store.subscribe(move |change: &ListChange| {
            sink.lock().unwrap().push(change.clone());
            own.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(sub);
        let (others, _other_sub) = record_changes(&store);

        assert!(store.add(movie(1, "A")));
        assert_eq!(store.subscriber_count(), 1);
        assert!(store.add(movie(2, "B")));

        assert_eq!(*calls.lock().unwrap(), vec![ListChange::Added(ItemKey::movie(1))]);
        assert_eq!(others.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_write_failure_keeps_change() {
        let storage = FlakyStore::new();
        let mut store = SavedListStore::open(&storage);
        let (seen, _sub) = record_changes(&store);

        storage.fail_writes.set(true);
        assert!(store.add(movie(550, "Fight Club")));
        assert!(store.is_saved(550, MediaType::Movie));
        assert!(!store.is_durable());
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(storage.inner.read(MY_LIST_KEY).unwrap(), None);

        storage.fail_writes.set(false);
        store.add(movie(13, "Forrest Gump"));
        assert!(store.is_durable());
        let reopened = SavedListStore::open(&storage);
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_noops_do_not_write() {
        let storage = FlakyStore::new();
        let mut store = SavedListStore::open(&storage);
        store.add(movie(1, "A"));
        assert_eq!(storage.writes.get(), 1);

        store.add(movie(1, "A"));
        store.remove(2, MediaType::Movie);
        store.is_saved(1, MediaType::Movie);
        store.list();
        assert_eq!(storage.writes.get(), 1);
    }
}
