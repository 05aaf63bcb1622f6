// Launcher pages
//
// - SettingsPage: every settings control bound to its config field
// - NewsPage: news feed rebuilt from the live API metadata

pub mod news;
pub mod settings;

pub use news::{NewsCard, NewsPage};
pub use settings::{EditError, SettingsPage, format_ram, is_valid_version, theme_choices};
