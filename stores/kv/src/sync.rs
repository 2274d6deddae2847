//! Keeping an in-memory record in step with one key-value slot
//!
//! Every domain store follows the same life cycle:
//!
//! ```text
//! Uninitialized --begin_load--> Loading --finish_load--> Ready
//! ```
//!
//! Loads and saves are handed out as owned [`PendingLoad`] / [`PendingSave`]
//! values so that synchronous update code can give the actual I/O to an
//! executor (an iced `Task`, a tokio task, or a plain `.await` in tests) and
//! feed the result back later.

use crate::error::{Rejected, StorageError, SyncError};
use crate::storage::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Where a store is in its initial load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// A read of one slot that has not run yet
pub struct PendingLoad {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl PendingLoad {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn run(self) -> Result<Option<String>, StorageError> {
        self.store.read(self.key).await
    }
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad").field("key", &self.key).finish()
    }
}

/// Orders the writes issued for one slot
///
/// Every write takes a generation when it is created and writes run one at a
/// time. A write that gets its turn after a newer one has landed is dropped,
/// so the slot always ends up holding the newest snapshot.
#[derive(Debug, Default)]
pub struct WriteOrder {
    issued: AtomicU64,
    landed: Mutex<u64>,
}

impl WriteOrder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// A write of one slot that has not run yet
///
/// The value is serialized when the write is created, so later in-memory
/// changes do not leak into it.
#[derive(Clone)]
pub struct PendingSave {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    value: String,
    order: Arc<WriteOrder>,
    generation: u64,
}

impl PendingSave {
    /// A write that is not ordered against any other
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str, value: String) -> Self {
        Self::ordered(&WriteOrder::new(), store, key, value)
    }

    /// The next write in `order`
    pub fn ordered(
        order: &Arc<WriteOrder>,
        store: Arc<dyn KeyValueStore>,
        key: &'static str,
        value: String,
    ) -> Self {
        Self {
            store,
            key,
            value,
            generation: order.issue(),
            order: Arc::clone(order),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The serialized value that will be written
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Write the snapshot unless a newer one already landed
    pub async fn run(self) -> Result<(), StorageError> {
        let mut landed = self.order.landed.lock().await;
        if *landed > self.generation {
            tracing::debug!(
                key = self.key,
                generation = self.generation,
                landed = *landed,
                "skipping superseded write"
            );
            return Ok(());
        }

        self.store.write(self.key, self.value).await?;
        *landed = self.generation;
        Ok(())
    }
}

impl fmt::Debug for PendingSave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSave")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("len", &self.value.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Alerts raised by a store, oldest first
#[derive(Debug, Clone, Default)]
pub struct Alerts(Vec<Alert>);

impl Alerts {
    pub fn push(&mut self, alert: Alert) {
        self.0.push(alert);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.0.iter()
    }

    /// Hand every queued alert to the caller
    pub fn take(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.0)
    }
}

/// An in-memory record bound to one key-value slot
pub struct Synced<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    value: T,
    state: LoadState,
    writes: Arc<WriteOrder>,
}

impl<T> Synced<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Unloaded record holding `T::default()`
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            value: T::default(),
            state: LoadState::Uninitialized,
            writes: WriteOrder::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access, only once the initial load has completed
    pub fn value_mut(&mut self) -> Result<&mut T, Rejected> {
        if !self.is_ready() {
            return Err(Rejected::NotReady);
        }
        Ok(&mut self.value)
    }

    /// Start the one initial load
    ///
    /// Returns `None` once a load has been started.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        if self.state != LoadState::Uninitialized {
            return None;
        }
        self.state = LoadState::Loading;
        tracing::debug!(key = self.key, "loading");
        Some(PendingLoad {
            store: Arc::clone(&self.store),
            key: self.key,
        })
    }

    /// Apply the outcome of the initial load
    ///
    /// The store is Ready afterwards whatever happened: a failed read or a
    /// malformed value leaves the default record in place and is returned so
    /// the caller can tell the user. Results arriving outside `Loading` are
    /// stale and ignored.
    pub fn finish_load(
        &mut self,
        result: Result<Option<String>, StorageError>,
    ) -> Result<(), SyncError> {
        if self.state != LoadState::Loading {
            tracing::debug!(key = self.key, state = ?self.state, "ignoring stale load result");
            return Ok(());
        }
        self.state = LoadState::Ready;

        let outcome = match result {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    self.value = value;
                    Ok(())
                }
                Err(source) => Err(SyncError::Deserialize {
                    key: self.key.to_string(),
                    source,
                }),
            },
            Ok(None) => {
                tracing::debug!(key = self.key, "nothing stored, using defaults");
                self.value = T::default();
                Ok(())
            }
            Err(e) => Err(SyncError::Read(e)),
        };

        if let Err(e) = &outcome {
            tracing::error!(key = self.key, error = %e, "load failed, using defaults");
            self.value = T::default();
        }
        outcome
    }

    /// Run the initial load to completion
    pub async fn load(&mut self) -> Result<(), SyncError> {
        match self.begin_load() {
            Some(pending) => {
                let result = pending.run().await;
                self.finish_load(result)
            }
            None => Ok(()),
        }
    }

    /// Snapshot the current value into a write
    ///
    /// Writes from one record are ordered: whatever order the executor runs
    /// them in, the slot ends up holding the latest snapshot.
    pub fn save(&self) -> Result<PendingSave, SyncError> {
        let value = serde_json::to_string(&self.value).map_err(|source| SyncError::Serialize {
            key: self.key.to_string(),
            source,
        })?;
        tracing::debug!(key = self.key, bytes = value.len(), "saving");
        Ok(PendingSave::ordered(
            &self.writes,
            Arc::clone(&self.store),
            self.key,
            value,
        ))
    }

    /// Log the outcome of a write
    pub fn finish_save(&self, result: Result<(), StorageError>) -> Result<(), SyncError> {
        result.map_err(|e| {
            tracing::error!(key = self.key, error = %e, "save failed");
            SyncError::Write(e)
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Synced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synced")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("value", &self.value)
            .finish()
    }
}
