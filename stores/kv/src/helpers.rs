//! Typed one-shot access to a store
//!
//! These functions read or write a single slot without going through a
//! [`Synced`](crate::Synced) record. Useful for scripts, migrations and
//! tests that need to seed or inspect persisted state.

use crate::error::SyncError;
use crate::storage::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};

/// Read and deserialize a value
///
/// Returns `Ok(None)` when the slot is empty.
///
/// # Errors
///
/// Fails if the slot cannot be read or its JSON does not match `T`.
///
/// # Example
///
/// ```ignore
/// use basket_kv::{MemoryStore, read_json};
///
/// let store = MemoryStore::with_slots([("@tags", r#"["groceries"]"#)]);
/// let tags: Option<Vec<String>> = read_json(&store, "@tags").await?;
/// assert_eq!(tags, Some(vec!["groceries".to_string()]));
/// ```
pub async fn read_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, SyncError>
where
    T: DeserializeOwned,
{
    let Some(raw) = store.read(key).await.map_err(SyncError::Read)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| SyncError::Deserialize {
            key: key.to_string(),
            source,
        })
}

/// Serialize and write a value
///
/// # Errors
///
/// Fails if the value cannot be serialized or the slot cannot be written.
pub async fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), SyncError>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|source| SyncError::Serialize {
        key: key.to_string(),
        source,
    })?;

    store.write(key, raw).await.map_err(SyncError::Write)
}
