//! User profile store
//!
//! A single record persisted under `@user_profile`. Unlike the shopping
//! list, edits stay in memory until the user saves: an edit session is
//! opened with [`ProfileStore::toggle_editing`], fields are changed with
//! [`ProfileStore::update_field`], and [`ProfileStore::save`] writes the
//! whole record at once.

use basket_kv::{
    Alert, Alerts, KeyValueStore, LoadState, PendingLoad, PendingSave, Rejected, StorageError,
    Synced,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "@user_profile";

/// Stored profile record
///
/// Missing fields deserialize to their defaults. Older records may carry a
/// `preferences.darkMode` flag; it is ignored, the theme lives in its own
/// slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
        }
    }
}

impl UserProfile {
    /// Name to show in the header
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "No name set"
        } else {
            &self.name
        }
    }

    /// Avatar letter: the uppercased first character of the name, or `?`
    pub fn initial(&self) -> String {
        match self.name.chars().next() {
            Some(first) => first.to_uppercase().collect(),
            None => "?".to_string(),
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Address => &self.address,
        }
    }

    fn field_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Address => &mut self.address,
        }
    }
}

/// Editable text fields of the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Address,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Address,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Full name",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
            ProfileField::Address => "Address",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ProfileField::Name => "Enter your name",
            ProfileField::Email => "Enter your email address",
            ProfileField::Phone => "Enter your phone number",
            ProfileField::Address => "Enter your address",
        }
    }
}

#[derive(Debug)]
pub struct ProfileStore {
    profile: Synced<UserProfile>,
    editing: bool,
    alerts: Alerts,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profile: Synced::new(store, STORAGE_KEY),
            editing: false,
            alerts: Alerts::default(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        self.profile.value()
    }

    pub fn load_state(&self) -> LoadState {
        self.profile.load_state()
    }

    pub fn is_ready(&self) -> bool {
        self.profile.is_ready()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        self.profile.begin_load()
    }

    pub fn finish_load(&mut self, result: Result<Option<String>, StorageError>) {
        if self.profile.finish_load(result).is_err() {
            self.alerts.push(Alert::error(
                "Error",
                "Something went wrong while loading your profile.",
            ));
        }
    }

    pub async fn load(&mut self) {
        if let Some(pending) = self.begin_load() {
            let result = pending.run().await;
            self.finish_load(result);
        }
    }

    /// Open or close the edit session
    ///
    /// Closing without saving keeps the edited values in memory.
    pub fn toggle_editing(&mut self) -> Result<bool, Rejected> {
        if !self.is_ready() {
            return Err(Rejected::NotReady);
        }
        self.editing = !self.editing;
        Ok(self.editing)
    }

    pub fn update_field(
        &mut self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<(), Rejected> {
        if !self.editing {
            return Err(Rejected::NotEditing);
        }
        *self.profile.value_mut()?.field_mut(field) = value.into();
        Ok(())
    }

    /// Flip the notifications preference in memory
    ///
    /// Persisted with the next [`save`](Self::save).
    pub fn toggle_notifications(&mut self) -> Result<bool, Rejected> {
        let preferences = &mut self.profile.value_mut()?.preferences;
        preferences.notifications = !preferences.notifications;
        Ok(preferences.notifications)
    }

    /// Write the whole record
    ///
    /// The edit session stays open until [`finish_save`](Self::finish_save)
    /// reports success.
    pub fn save(&mut self) -> Result<Option<PendingSave>, Rejected> {
        if !self.is_ready() {
            return Err(Rejected::NotReady);
        }
        match self.profile.save() {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                tracing::error!(error = %e, "could not snapshot profile");
                self.alerts.push(save_failed());
                Ok(None)
            }
        }
    }

    pub fn finish_save(&mut self, result: Result<(), StorageError>) {
        match self.profile.finish_save(result) {
            Ok(()) => {
                self.editing = false;
                self.alerts
                    .push(Alert::info("Saved", "Your profile information was saved."));
            }
            Err(_) => self.alerts.push(save_failed()),
        }
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.alerts.take()
    }
}

fn save_failed() -> Alert {
    Alert::error("Error", "Your profile information could not be saved.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_kv::{AlertLevel, MemoryStore};

    async fn ready_store(store: &Arc<MemoryStore>) -> ProfileStore {
        let mut profile = ProfileStore::new(Arc::clone(store) as Arc<dyn KeyValueStore>);
        profile.load().await;
        assert!(profile.is_ready());
        profile
    }

    #[tokio::test]
    async fn empty_store_loads_default_profile() {
        let store = Arc::new(MemoryStore::new());
        let profile = ready_store(&store).await;

        assert_eq!(profile.load_state(), LoadState::Ready);
        assert_eq!(
            profile.profile(),
            &UserProfile {
                name: String::new(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                preferences: Preferences {
                    notifications: true
                },
            }
        );
        assert!(!profile.is_editing());
        assert!(profile.alerts().is_empty());
    }

    #[tokio::test]
    async fn loads_stored_profile_and_ignores_dark_mode() {
        let store = Arc::new(MemoryStore::with_slots([(
            STORAGE_KEY,
            r#"{"name":"Ada","email":"ada@example.com","phone":"","address":"",
               "preferences":{"notifications":false,"darkMode":true}}"#,
        )]));
        let profile = ready_store(&store).await;

        assert_eq!(profile.profile().name, "Ada");
        assert!(!profile.profile().preferences.notifications);
    }

    #[tokio::test]
    async fn partial_record_fills_defaults() {
        let store = Arc::new(MemoryStore::with_slots([(STORAGE_KEY, r#"{"name":"Ada"}"#)]));
        let profile = ready_store(&store).await;

        assert_eq!(profile.profile().name, "Ada");
        assert_eq!(profile.profile().email, "");
        assert!(profile.profile().preferences.notifications);
    }

    #[tokio::test]
    async fn failed_load_alerts_and_uses_default() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(true);
        let mut profile = ready_store(&store).await;

        assert_eq!(profile.profile(), &UserProfile::default());
        assert_eq!(profile.take_alerts()[0].level, AlertLevel::Error);
    }

    #[tokio::test]
    async fn fields_change_only_while_editing() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ready_store(&store).await;

        assert_eq!(
            profile.update_field(ProfileField::Name, "Ada").unwrap_err(),
            Rejected::NotEditing
        );
        assert_eq!(profile.profile().name, "");

        assert!(profile.toggle_editing().unwrap());
        profile.update_field(ProfileField::Name, "Ada").unwrap();
        profile.update_field(ProfileField::Phone, "555-0100").unwrap();

        assert_eq!(profile.profile().field(ProfileField::Name), "Ada");
        assert_eq!(profile.profile().field(ProfileField::Phone), "555-0100");
        // nothing persisted before an explicit save
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn save_persists_whole_record_and_ends_editing() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ready_store(&store).await;
        profile.toggle_editing().unwrap();
        profile.update_field(ProfileField::Email, "ada@example.com").unwrap();
        profile.toggle_notifications().unwrap();

        let save = profile.save().unwrap().unwrap();
        assert!(profile.is_editing());
        profile.finish_save(save.run().await);

        assert!(!profile.is_editing());
        let stored: UserProfile = serde_json::from_str(&store.get(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(&stored, profile.profile());
        let alerts = profile.take_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Info);
    }

    #[tokio::test]
    async fn failed_save_keeps_edits_and_editing() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ready_store(&store).await;
        profile.toggle_editing().unwrap();
        profile.update_field(ProfileField::Name, "Ada").unwrap();
        store.fail_writes(true);

        let save = profile.save().unwrap().unwrap();
        profile.finish_save(save.run().await);

        assert_eq!(profile.profile().name, "Ada");
        assert!(profile.is_editing());
        let alerts = profile.take_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Error);
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn notifications_toggle_without_editing() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ready_store(&store).await;

        assert!(!profile.toggle_notifications().unwrap());
        assert!(profile.toggle_notifications().unwrap());
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn closing_edit_session_keeps_edits() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ready_store(&store).await;
        profile.toggle_editing().unwrap();
        profile.update_field(ProfileField::Address, "1 Main St").unwrap();

        assert!(!profile.toggle_editing().unwrap());

        assert_eq!(profile.profile().address, "1 Main St");
    }

    #[test]
    fn intents_wait_for_load() {
        let store = Arc::new(MemoryStore::new());
        let mut profile = ProfileStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        assert_eq!(profile.toggle_editing().unwrap_err(), Rejected::NotReady);
        assert_eq!(profile.toggle_notifications().unwrap_err(), Rejected::NotReady);
        assert_eq!(profile.save().unwrap_err(), Rejected::NotReady);
    }

    #[test]
    fn header_helpers() {
        let mut profile = UserProfile::default();
        assert_eq!(profile.display_name(), "No name set");
        assert_eq!(profile.initial(), "?");

        profile.name = "ada lovelace".to_string();
        assert_eq!(profile.display_name(), "ada lovelace");
        assert_eq!(profile.initial(), "A");
    }

    #[test]
    fn profile_json_round_trips() {
        let profile = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            preferences: Preferences {
                notifications: false,
            },
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["preferences"], serde_json::json!({"notifications": false}));

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
