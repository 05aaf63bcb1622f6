//! Data models for the launcher.
//!
//! - [`LauncherConfig`]: user settings persisted to `launcher.yaml`, edited through
//!   the bindings in [`crate::binding`]
//! - [`Metadata`]: remote launcher metadata (blog posts, alert) shown on the news page
//! - [`Language`]: launcher language, compared by identity in choice controls

pub mod config;
pub mod metadata;

pub use config::{ApiConfig, GameConfig, Language, LauncherConfig, ResizeConfig};
pub use metadata::{Alert, Blogpost, Metadata};
