//! The key-value adapter and its on-disk implementation

use crate::app_name::AppName;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Durable string-to-string persistence
///
/// Values are opaque strings (JSON blobs in practice). There is no
/// transactionality and no multi-key atomicity: every call touches exactly
/// one slot and the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if the slot is empty
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    async fn write(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Key-value store persisted as a single JSON object on disk
///
/// The whole file is re-read and rewritten on every write. Writes from the
/// same process are serialised so concurrent saves of different keys cannot
/// drop each other's slot, and reads never overlap a write. A write lands in
/// a sibling temp file that is renamed over the store, so the store file is
/// never seen half-written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Store located in the platform config directory for `app_name`
    pub fn new(app_name: &AppName) -> Self {
        Self::at(app_name.store_file())
    }

    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every slot from disk
    ///
    /// A missing or empty file holds no slots.
    async fn load_slots(&self, key: &str) -> Result<HashMap<String, String>, StorageError> {
        if !fs::try_exists(&self.path)
            .await
            .map_err(|e| StorageError::read(key, e))?
        {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::read(key, format!("failed to read store file: {}", e)))?;

        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::read(key, format!("failed to parse store file: {}", e)))
    }

    async fn save_slots(
        &self,
        key: &str,
        slots: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::write(key, format!("failed to create storage directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(slots)
            .map_err(|e| StorageError::write(key, format!("failed to serialize store: {}", e)))?;

        let staging = self.staging_path();
        fs::write(&staging, contents)
            .await
            .map_err(|e| StorageError::write(key, format!("failed to write store file: {}", e)))?;

        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(StorageError::write(
                key,
                format!("failed to replace store file: {}", e),
            ));
        }
        Ok(())
    }

    /// Sibling of the store file that writes are staged in
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.read().await;
        let mut slots = self.load_slots(key).await?;
        Ok(slots.remove(key))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;

        // A corrupt file must not be silently replaced by a single slot.
        let mut slots = self
            .load_slots(key)
            .await
            .map_err(|e| StorageError::write(key, e))?;
        slots.insert(key.to_string(), value);

        self.save_slots(key, &slots).await?;
        tracing::trace!(key, path = %self.path.display(), "slot written");
        Ok(())
    }
}
