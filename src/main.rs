//! Basket: a shopping list and profile app
//!
//! All state is kept in one JSON key-value file (see [`config`]). The theme
//! preference is read before the window opens so the first frame already
//! uses it; the list and profile load asynchronously once the app is up.

mod app;
mod config;
mod screens;

use app::App;
use basket_kv::{FileStore, KeyValueStore};
use basket_theme::ThemeContext;
use config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("basket=info,basket_kv=info,basket_theme=info")
            }),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(path = %config.store_path.display(), "using store");

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::at(&config.store_path));
    let theme = load_theme(Arc::clone(&store))?;

    iced::application(
        move || App::new(Arc::clone(&store), theme.clone()),
        App::update,
        App::view,
    )
    .title("Basket")
    .theme(App::theme)
    .run()?;

    Ok(())
}

/// Load the theme preference (blocking version for pre-app initialization)
fn load_theme(store: Arc<dyn KeyValueStore>) -> std::io::Result<ThemeContext> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(ThemeContext::load(store)))
}
