// PvPRoom Launcher - settings and news pages
//
// This is the library crate containing the settings bindings, the API hot
// reload coordinator and the page models. The binary crate (main.rs) provides
// the interactive entry point.

pub mod api;
pub mod binding;
pub mod config;
pub mod logging;
pub mod models;
pub mod pages;
pub mod reload;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use binding::{Binding, ChangeOutcome, ConfigField, FieldValue, SettingsStore};
pub use config::ConfigManager;
pub use models::{LauncherConfig, Metadata};
pub use reload::{HotReloader, ReloadObserver, ReloadOutcome};
pub use state::{LauncherEvent, SessionStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
