//! Error types shared by every basket store

use thiserror::Error;

/// Failure reported by a [`KeyValueStore`](crate::KeyValueStore) backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not read the slot (I/O failure, corrupt file, ...)
    #[error("failed to read `{key}`: {reason}")]
    ReadFailed { key: String, reason: String },
    /// The backend could not persist the slot
    #[error("failed to write `{key}`: {reason}")]
    WriteFailed { key: String, reason: String },
}

impl StorageError {
    pub fn read(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::ReadFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::WriteFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure while synchronising a store with its key-value slot
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Read(StorageError),
    #[error(transparent)]
    Write(StorageError),
    /// The persisted JSON does not match the record type
    #[error("malformed value under `{key}`: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize value for `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a user intent was ignored
///
/// Rejections never change state and are never shown to the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejected {
    #[error("store has not finished loading")]
    NotReady,
    #[error("item name is blank")]
    BlankName,
    #[error("no item with that id")]
    UnknownItem,
    #[error("profile is not being edited")]
    NotEditing,
    #[error("no deletion is awaiting confirmation")]
    NoPendingDelete,
}
