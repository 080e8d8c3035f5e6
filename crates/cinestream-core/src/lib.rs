pub mod error;
pub mod kv;
pub mod saved_list;
pub mod subscription;

pub use error::{StorageError, StoreError};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use saved_list::{SavedListStore, MY_LIST_KEY};
pub use subscription::{ListChange, Subscription};
