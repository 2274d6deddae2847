//! Key-value persistence for basket
//!
//! A small JSON-backed key-value store plus the pieces every domain store
//! uses to stay in step with its slot.
//!
//! # Features
//!
//! - [`KeyValueStore`]: async get/set of string values by string key
//! - [`FileStore`]: every key in one JSON file under the platform config dir
//! - [`MemoryStore`]: in-process store with fault injection
//! - [`Synced`]: load-once, save-on-demand binding of a record to a key
//!
//! # Example
//!
//! ```ignore
//! use basket_kv::{AppName, FileStore, KeyValueStore, Synced};
//! use std::sync::Arc;
//!
//! let app_name = AppName::new("com", "basket", "basket");
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&app_name));
//!
//! let mut tags: Synced<Vec<String>> = Synced::new(store, "@tags");
//! tags.load().await?;
//! tags.value_mut()?.push("groceries".into());
//! tags.save()?.run().await?;
//! ```

mod app_name;
mod error;
mod helpers;
mod memory;
mod storage;
mod sync;

pub use app_name::AppName;
pub use error::{Rejected, StorageError, SyncError};
pub use helpers::{read_json, write_json};
pub use memory::MemoryStore;
pub use storage::{FileStore, KeyValueStore};
pub use sync::{
    Alert, AlertLevel, Alerts, LoadState, PendingLoad, PendingSave, Synced, WriteOrder,
};
