//! Application identity used to locate the store file

use std::path::PathBuf;

/// Application identifier used to determine storage location
///
/// Resolved through [`directories::ProjectDirs`], so the file follows the
/// XDG conventions on Linux and the usual per-user config folders elsewhere.
///
/// # Example
///
/// ```
/// use basket_kv::AppName;
///
/// let app_name = AppName::new("com", "basket", "basket");
/// assert!(app_name.store_file().ends_with("basket.json"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppName {
    pub qualifier: String,
    pub organization: String,
    pub application: String,
}

impl AppName {
    /// Create a new application name
    ///
    /// * `qualifier` - Typically a reverse domain name (e.g., "com", "org")
    /// * `organization` - Your organization or username
    /// * `application` - The application name, also used as the file stem
    pub fn new(
        qualifier: impl Into<String>,
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            qualifier: qualifier.into(),
            organization: organization.into(),
            application: application.into(),
        }
    }

    /// Directory holding the store file
    ///
    /// - Linux: `$XDG_CONFIG_HOME/<app>/store` or `~/.config/<app>/store`
    /// - macOS: `~/Library/Application Support/<reverse-domain>/store`
    /// - Windows: `%LOCALAPPDATA%\<org>\<app>\config\store`
    ///
    /// Falls back to `./store` when no home directory can be determined.
    pub fn storage_dir(&self) -> PathBuf {
        directories::ProjectDirs::from(
            self.qualifier.as_str(),
            self.organization.as_str(),
            self.application.as_str(),
        )
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("store")
    }

    /// Full path of the JSON file backing every key
    pub fn store_file(&self) -> PathBuf {
        self.storage_dir().join(format!("{}.json", self.application))
    }
}
