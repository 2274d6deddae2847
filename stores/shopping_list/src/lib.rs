//! Shopping list store
//!
//! An ordered list of items persisted under `@shopping_list_items`. Every
//! accepted change autosaves: mutations return the [`PendingSave`] for the
//! new list, which the caller runs and reports back via
//! [`ShoppingList::finish_save`].
//!
//! ```ignore
//! let mut list = ShoppingList::new(store);
//! list.load().await;
//!
//! if let Some(save) = list.add_item("Milk")? {
//!     list.finish_save(save.run().await);
//! }
//! ```

use basket_kv::{
    Alert, Alerts, KeyValueStore, LoadState, PendingLoad, PendingSave, Rejected, StorageError,
    Synced,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "@shopping_list_items";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// Answer to a delete confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug)]
pub struct ShoppingList {
    items: Synced<Vec<ShoppingItem>>,
    pending_delete: Option<String>,
    last_id: i64,
    alerts: Alerts,
}

impl ShoppingList {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: Synced::new(store, STORAGE_KEY),
            pending_delete: None,
            last_id: 0,
            alerts: Alerts::default(),
        }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        self.items.value()
    }

    pub fn load_state(&self) -> LoadState {
        self.items.load_state()
    }

    pub fn is_ready(&self) -> bool {
        self.items.is_ready()
    }

    /// Items not yet ticked off
    pub fn remaining(&self) -> usize {
        self.items().iter().filter(|item| !item.completed).count()
    }

    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        self.items.begin_load()
    }

    pub fn finish_load(&mut self, result: Result<Option<String>, StorageError>) {
        if self.items.finish_load(result).is_err() {
            self.alerts.push(Alert::error(
                "Error",
                "Something went wrong while loading the shopping list.",
            ));
        }
        self.last_id = self
            .items()
            .iter()
            .filter_map(|item| item.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
    }

    pub async fn load(&mut self) {
        if let Some(pending) = self.begin_load() {
            let result = pending.run().await;
            self.finish_load(result);
        }
    }

    /// Append a new, not yet completed item
    ///
    /// Names are trimmed; a blank name is rejected without touching the list.
    /// The returned write is `None` only if the list could not be serialized,
    /// in which case an alert is queued.
    pub fn add_item(&mut self, name: &str) -> Result<Option<PendingSave>, Rejected> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejected::BlankName);
        }
        if !self.is_ready() {
            return Err(Rejected::NotReady);
        }

        let id = self.next_id();
        self.items.value_mut()?.push(ShoppingItem {
            id,
            name: name.to_string(),
            completed: false,
        });
        Ok(self.autosave())
    }

    /// Flip the completed flag of one item
    pub fn toggle_item(&mut self, id: &str) -> Result<Option<PendingSave>, Rejected> {
        let item = self
            .items
            .value_mut()?
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(Rejected::UnknownItem)?;
        item.completed = !item.completed;
        Ok(self.autosave())
    }

    /// Ask for confirmation before deleting an item
    ///
    /// Nothing is removed until [`resolve_delete`](Self::resolve_delete) is
    /// called with [`Confirmation::Confirmed`]. A new request replaces an
    /// unanswered one.
    pub fn request_delete(&mut self, id: &str) -> Result<(), Rejected> {
        if !self.items.value_mut()?.iter().any(|item| item.id == id) {
            return Err(Rejected::UnknownItem);
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    /// The item awaiting delete confirmation, if any
    pub fn pending_delete(&self) -> Option<&ShoppingItem> {
        let id = self.pending_delete.as_deref()?;
        self.items().iter().find(|item| item.id == id)
    }

    /// Answer the delete prompt
    ///
    /// Returns the autosave write when an item was removed.
    pub fn resolve_delete(
        &mut self,
        confirmation: Confirmation,
    ) -> Result<Option<PendingSave>, Rejected> {
        let id = self.pending_delete.take().ok_or(Rejected::NoPendingDelete)?;

        match confirmation {
            Confirmation::Declined => Ok(None),
            Confirmation::Confirmed => {
                let items = self.items.value_mut()?;
                let before = items.len();
                items.retain(|item| item.id != id);
                if items.len() == before {
                    return Err(Rejected::UnknownItem);
                }
                Ok(self.autosave())
            }
        }
    }

    /// Report the outcome of an autosave
    ///
    /// The in-memory list is kept either way.
    pub fn finish_save(&mut self, result: Result<(), StorageError>) {
        if self.items.finish_save(result).is_err() {
            self.alerts.push(Alert::error(
                "Error",
                "Something went wrong while saving the shopping list.",
            ));
        }
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.alerts.take()
    }

    fn autosave(&mut self) -> Option<PendingSave> {
        match self.items.save() {
            Ok(pending) => Some(pending),
            Err(e) => {
                tracing::error!(error = %e, "could not snapshot shopping list");
                self.alerts.push(Alert::error(
                    "Error",
                    "Something went wrong while saving the shopping list.",
                ));
                None
            }
        }
    }

    /// Millisecond timestamp, bumped past the newest id handed out
    ///
    /// Once ids reach `i64::MAX` the search wraps back to the current time
    /// and takes the first free id from there.
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let start = now.max(self.last_id.saturating_add(1));
        let id = (start..=i64::MAX)
            .chain(now..start)
            .map(|id| id.to_string())
            .find(|id| !self.items().iter().any(|item| &item.id == id))
            .unwrap_or_else(|| start.to_string());
        if let Ok(numeric) = id.parse::<i64>() {
            self.last_id = self.last_id.max(numeric);
        }
        id
    }
}
