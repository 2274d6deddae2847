//! Light/dark theme preference shared by every screen
//!
//! [`ThemeContext`] is created once at startup and cloned into whoever
//! needs it; all clones see the same mode. The preference is stored under
//! `@theme_preference` as the plain string `"light"` or `"dark"`.

use basket_kv::{KeyValueStore, PendingSave, WriteOrder};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

pub const STORAGE_KEY: &str = "@theme_preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` is light
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Inner {
    mode: RwLock<ThemeMode>,
    store: Arc<dyn KeyValueStore>,
    writes: Arc<WriteOrder>,
}

/// Shared handle to the current theme
///
/// Only obtainable through [`ThemeContext::load`], so the mode is always
/// known by the time anything can render with it.
#[derive(Clone)]
pub struct ThemeContext {
    inner: Arc<Inner>,
}

impl ThemeContext {
    /// Read the stored preference
    ///
    /// A failed read is logged and falls back to light.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mode = match store.read(STORAGE_KEY).await {
            Ok(value) => ThemeMode::from_stored(value.as_deref()),
            Err(e) => {
                tracing::error!(error = %e, "failed to load theme preference");
                ThemeMode::Light
            }
        };
        tracing::debug!(%mode, "theme loaded");

        Self {
            inner: Arc::new(Inner {
                mode: RwLock::new(mode),
                store,
                writes: WriteOrder::new(),
            }),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        *self
            .inner
            .mode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_dark(&self) -> bool {
        self.mode() == ThemeMode::Dark
    }

    /// Flip the theme for everyone holding this context
    ///
    /// The new mode is visible immediately. The returned future persists it
    /// and resolves to the new mode; a failed write is only logged. Writes
    /// from quick successive toggles are ordered, so the stored preference
    /// ends up matching the last toggle.
    pub fn toggle(&self) -> impl Future<Output = ThemeMode> + Send + 'static {
        let mode = {
            let mut mode = self
                .inner
                .mode
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *mode = mode.toggled();
            *mode
        };

        let save = PendingSave::ordered(
            &self.inner.writes,
            Arc::clone(&self.inner.store),
            STORAGE_KEY,
            mode.as_str().to_string(),
        );
        async move {
            if let Err(e) = save.run().await {
                tracing::warn!(error = %e, %mode, "failed to save theme preference");
            }
            mode
        }
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("mode", &self.mode())
            .finish()
    }
}
