//! Runtime configuration

use basket_kv::AppName;
use std::path::PathBuf;

/// Overrides the location of the store file
pub const STORE_ENV: &str = "BASKET_STORE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    pub fn app_name() -> AppName {
        AppName::new("com", "basket", "basket")
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let store_path = lookup(STORE_ENV)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| Self::app_name().store_file());
        Self { store_path }
    }
}
