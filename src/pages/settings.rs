use crate::binding::{
    AutoSave, Binding, BindingError, ChangeOutcome, CheckBox, ComboBox, ConfigField, Control,
    FieldValue, SettingsStore, Slider, Spinner, TextField,
};
use crate::models::Language;
use camino::Utf8Path;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;
use thiserror::Error;

/// Themes shipped with the launcher
pub const BUILTIN_THEMES: [&str; 3] = ["dark", "light", "unset"];

pub const MAX_THREADS_RANGE: (i64, i64) = (1, 256);
pub const RESIZE_RANGE: (i64, i64) = (10, 5000);

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[a-zA-Z0-9\-]+)?$").expect("Invalid version regex")
});

/// Errors from editing a setting through its text representation
#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("'{input}' is not a valid {expected} for {field}")]
    InvalidInput {
        field: ConfigField,
        input: String,
        expected: &'static str,
    },

    #[error("'{input}' is not one of the choices for {field}")]
    UnknownChoice { field: ConfigField, input: String },
}

/// Every bound control of the settings page.
///
/// Folder and file pickers (installation dir, game dir, JRE) are not bound
/// here; their values are persisted as-is.
pub struct SettingsPage {
    pub theme: Binding<ComboBox<String>>,
    pub language: Binding<ComboBox<Language>>,
    pub max_threads: Binding<Spinner>,
    pub open_discord: Binding<CheckBox>,
    pub api_address: Binding<TextField>,
    pub wrapper: Binding<TextField>,
    pub ram: Binding<Slider>,
    pub resize_width: Binding<Spinner>,
    pub resize_height: Binding<Spinner>,
}

impl SettingsPage {
    /// Bind every control to the store's configuration.
    ///
    /// Integer fields outside their control's bounds are clamped and written
    /// back first, so every control shows the field's actual value.
    ///
    /// # Arguments
    /// * `store` - Holder of the loaded launcher configuration
    /// * `themes` - Theme choices, usually from [`theme_choices`]
    /// * `total_memory_mb` - Upper bound of the RAM slider
    pub fn build(
        store: &mut SettingsStore,
        mut themes: Vec<String>,
        total_memory_mb: i64,
    ) -> Result<Self, BindingError> {
        let (threads_min, threads_max) = MAX_THREADS_RANGE;
        let (resize_min, resize_max) = RESIZE_RANGE;
        let ram_max = total_memory_mb.max(0);

        for (field, min, max) in [
            (ConfigField::MaxThreads, threads_min, threads_max),
            (ConfigField::ResizeWidth, resize_min, resize_max),
            (ConfigField::ResizeHeight, resize_min, resize_max),
            (ConfigField::GameRam, 0, ram_max),
        ] {
            fit_to_bounds(store, field, min, max)?;
        }

        let config = store.config();
        if !themes.contains(&config.theme) {
            tracing::warn!(
                "Configured theme {} is not installed, keeping it selectable",
                config.theme
            );
            themes.push(config.theme.clone());
        }

        let page = Self {
            theme: Binding::bind(ComboBox::new(themes), ConfigField::Theme, config)?,
            language: Binding::bind(
                ComboBox::new(Language::ALL.to_vec()),
                ConfigField::Language,
                config,
            )?,
            max_threads: Binding::bind(
                Spinner::new(threads_min, threads_max, 1),
                ConfigField::MaxThreads,
                config,
            )?,
            open_discord: Binding::bind(
                CheckBox::new("Open Discord on start"),
                ConfigField::OpenDiscordOnStart,
                config,
            )?,
            api_address: Binding::bind(TextField::new(), ConfigField::ApiAddress, config)?
                .with_hook(trim_text),
            wrapper: Binding::bind(TextField::new(), ConfigField::GameWrapper, config)?,
            ram: Binding::bind(
                Slider::new(0, ram_max, format_ram),
                ConfigField::GameRam,
                config,
            )?,
            resize_width: Binding::bind(
                Spinner::new(resize_min, resize_max, 1),
                ConfigField::ResizeWidth,
                config,
            )?,
            resize_height: Binding::bind(
                Spinner::new(resize_min, resize_max, 1),
                ConfigField::ResizeHeight,
                config,
            )?,
        };

        tracing::debug!("Settings page bound to {} fields", ConfigField::ALL.len());
        Ok(page)
    }

    /// The value a field's control currently shows
    pub fn displayed(&self, field: ConfigField) -> FieldValue {
        match field {
            ConfigField::ApiAddress => self.api_address.control().value(),
            ConfigField::Theme => self.theme.control().value(),
            ConfigField::Language => self.language.control().value(),
            ConfigField::MaxThreads => self.max_threads.control().value(),
            ConfigField::OpenDiscordOnStart => self.open_discord.control().value(),
            ConfigField::GameRam => self.ram.control().value(),
            ConfigField::GameWrapper => self.wrapper.control().value(),
            ConfigField::ResizeWidth => self.resize_width.control().value(),
            ConfigField::ResizeHeight => self.resize_height.control().value(),
        }
    }

    /// Drive a field's control the way a user would, from text input.
    ///
    /// Text fields are typed into and submitted, spinners set, the slider
    /// dragged and released, the checkbox clicked when the state differs,
    /// and choices selected by key (theme name or language code).
    pub fn edit(
        &mut self,
        store: &mut SettingsStore,
        field: ConfigField,
        raw: &str,
    ) -> Result<ChangeOutcome, EditError> {
        let outcome = match field {
            ConfigField::ApiAddress => self.api_address.interact(store, |text| {
                text.type_text(raw);
                text.submit()
            }),
            ConfigField::GameWrapper => self.wrapper.interact(store, |text| {
                text.type_text(raw);
                text.submit()
            }),
            ConfigField::Theme => {
                if !self.theme.control().items().iter().any(|theme| theme == raw) {
                    return Err(EditError::UnknownChoice {
                        field,
                        input: raw.to_string(),
                    });
                }
                self.theme.interact(store, |combo| combo.select_key(raw))
            }
            ConfigField::Language => {
                if Language::from_code(raw).is_none() {
                    return Err(EditError::UnknownChoice {
                        field,
                        input: raw.to_string(),
                    });
                }
                self.language.interact(store, |combo| combo.select_key(raw))
            }
            ConfigField::OpenDiscordOnStart => {
                let wanted = parse_flag(field, raw)?;
                self.open_discord.interact(store, |check| {
                    if check.is_checked() == wanted {
                        None
                    } else {
                        check.click()
                    }
                })
            }
            ConfigField::MaxThreads => {
                let value = parse_integer(field, raw)?;
                self.max_threads.interact(store, |spinner| spinner.set_value(value))
            }
            ConfigField::ResizeWidth => {
                let value = parse_integer(field, raw)?;
                self.resize_width.interact(store, |spinner| spinner.set_value(value))
            }
            ConfigField::ResizeHeight => {
                let value = parse_integer(field, raw)?;
                self.resize_height.interact(store, |spinner| spinner.set_value(value))
            }
            ConfigField::GameRam => {
                let value = parse_integer(field, raw)?;
                self.ram.interact(store, |slider| slider.drag_to(value));
                self.ram.interact(store, Slider::release)
            }
        };

        Ok(outcome)
    }
}

fn fit_to_bounds(
    store: &mut SettingsStore,
    field: ConfigField,
    min: i64,
    max: i64,
) -> Result<(), BindingError> {
    if let FieldValue::Integer(value) = field.get(store.config()) {
        let fitted = value.clamp(min, max);
        if fitted != value {
            tracing::warn!(
                "{} = {} is outside {}..={}, using {}",
                field,
                value,
                min,
                max,
                fitted
            );
            store.correct(field, FieldValue::Integer(fitted))?;
        }
    }
    Ok(())
}

fn trim_text(save: &mut AutoSave) {
    if let FieldValue::Text(text) = save.value() {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            let trimmed = trimmed.to_string();
            save.set_value(FieldValue::Text(trimmed));
        }
    }
}

fn parse_integer(field: ConfigField, raw: &str) -> Result<i64, EditError> {
    raw.trim().parse().map_err(|_| EditError::InvalidInput {
        field,
        input: raw.to_string(),
        expected: "number",
    })
}

fn parse_flag(field: ConfigField, raw: &str) -> Result<bool, EditError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(EditError::InvalidInput {
            field,
            input: raw.to_string(),
            expected: "yes/no value",
        }),
    }
}

/// Built-in themes followed by the `*.json` files in `themes_dir`
pub fn theme_choices(themes_dir: &Utf8Path) -> Vec<String> {
    let mut themes: Vec<String> = BUILTIN_THEMES.iter().map(|t| t.to_string()).collect();

    let entries = match fs::read_dir(themes_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to list themes in {}: {}", themes_dir, e);
            return themes;
        }
    };

    let mut custom: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    custom.sort();

    themes.extend(custom);
    themes
}

/// Format a RAM amount in megabytes as gigabytes, e.g. `1536` -> `1.5 GB`
pub fn format_ram(megabytes: i64) -> String {
    let gigabytes = format!("{:.2}", megabytes as f64 / 1024.0);
    let gigabytes = gigabytes.trim_end_matches('0').trim_end_matches('.');
    format!("{} GB", gigabytes)
}

/// Whether `version` looks like `1.2.3` or `1.2.3-alpha`
pub fn is_valid_version(version: &str) -> bool {
    VERSION_PATTERN.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LauncherConfig;
    use tempfile::TempDir;

    fn page_and_store() -> (SettingsPage, SettingsStore) {
        let mut store = SettingsStore::new(LauncherConfig::default());
        let page = SettingsPage::build(&mut store, theme_list(), 16384).unwrap();
        (page, store)
    }

    fn theme_list() -> Vec<String> {
        BUILTIN_THEMES.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_build_displays_config() {
        let (page, store) = page_and_store();
        for field in ConfigField::ALL {
            assert_eq!(page.displayed(field), field.get(store.config()), "{}", field);
        }
        assert_eq!(page.ram.control().label(), "3 GB");
    }

    #[test]
    fn test_build_keeps_missing_theme() {
        let mut config = LauncherConfig::default();
        config.theme = "removed.json".to_string();

        let mut store = SettingsStore::new(config);
        let page = SettingsPage::build(&mut store, theme_list(), 8192).unwrap();
        assert_eq!(page.theme.control().selected(), Some(&"removed.json".to_string()));
    }

    #[test]
    fn test_build_fits_out_of_range_threads() {
        let mut config = LauncherConfig::default();
        config.max_threads = 1000;
        let mut store = SettingsStore::new(config);

        let mut page = SettingsPage::build(&mut store, theme_list(), 16384).unwrap();

        assert_eq!(store.config().max_threads, 256);
        assert_eq!(page.displayed(ConfigField::MaxThreads), FieldValue::Integer(256));

        let outcome = page.edit(&mut store, ConfigField::MaxThreads, "8").unwrap();
        assert_eq!(outcome, ChangeOutcome::Committed(FieldValue::Integer(8)));
    }

    #[test]
    fn test_build_fits_ram_to_total_memory() {
        let mut config = LauncherConfig::default();
        config.game.ram = 12288;
        let mut store = SettingsStore::new(config);

        let page = SettingsPage::build(&mut store, theme_list(), 8192).unwrap();

        assert_eq!(store.config().game.ram, 8192);
        assert_eq!(page.displayed(ConfigField::GameRam), FieldValue::Integer(8192));
        assert_eq!(page.ram.control().label(), "8 GB");
    }

    #[test]
    fn test_edit_address_trims_whitespace() {
        let (mut page, mut store) = page_and_store();

        let outcome = page
            .edit(&mut store, ConfigField::ApiAddress, "  https://api.example.com ")
            .unwrap();

        assert_eq!(
            outcome,
            ChangeOutcome::Committed(FieldValue::Text("https://api.example.com".to_string()))
        );
        assert_eq!(store.config().api.address, "https://api.example.com");
        assert_eq!(page.api_address.control().text(), "https://api.example.com");
    }

    #[test]
    fn test_edit_spinner_clamps() {
        let (mut page, mut store) = page_and_store();

        page.edit(&mut store, ConfigField::MaxThreads, "1000").unwrap();
        assert_eq!(store.config().max_threads, 256);

        page.edit(&mut store, ConfigField::ResizeWidth, "2").unwrap();
        assert_eq!(store.config().game.resize.width, 10);
    }

    #[test]
    fn test_edit_flag_only_clicks_on_difference() {
        let (mut page, mut store) = page_and_store();

        assert_eq!(
            page.edit(&mut store, ConfigField::OpenDiscordOnStart, "no").unwrap(),
            ChangeOutcome::Pending
        );
        assert_eq!(
            page.edit(&mut store, ConfigField::OpenDiscordOnStart, "yes").unwrap(),
            ChangeOutcome::Committed(FieldValue::Flag(true))
        );
        assert!(store.config().open_discord_on_start);
    }

    #[test]
    fn test_edit_ram_commits_on_release() {
        let (mut page, mut store) = page_and_store();

        let outcome = page.edit(&mut store, ConfigField::GameRam, "6144").unwrap();

        assert_eq!(outcome, ChangeOutcome::Committed(FieldValue::Integer(6144)));
        assert_eq!(store.config().game.ram, 6144);
        assert_eq!(page.ram.control().label(), "6 GB");
    }

    #[test]
    fn test_edit_rejects_bad_input() {
        let (mut page, mut store) = page_and_store();

        assert!(matches!(
            page.edit(&mut store, ConfigField::MaxThreads, "lots"),
            Err(EditError::InvalidInput { .. })
        ));
        assert!(matches!(
            page.edit(&mut store, ConfigField::Language, "klingon"),
            Err(EditError::UnknownChoice { .. })
        ));
        assert!(matches!(
            page.edit(&mut store, ConfigField::Theme, "neon.json"),
            Err(EditError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn test_edit_language_by_code() {
        let (mut page, mut store) = page_and_store();
        page.edit(&mut store, ConfigField::Language, "zh_TW").unwrap();
        assert_eq!(store.config().language, Language::ChineseTaiwan);
    }

    #[test]
    fn test_theme_choices_lists_json_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = camino::Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::write(dir.join("ocean.json"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();
        fs::create_dir(dir.join("folder.json")).unwrap();

        let themes = theme_choices(&dir);
        assert_eq!(themes, vec!["dark", "light", "unset", "ocean.json"]);
    }

    #[test]
    fn test_format_ram() {
        assert_eq!(format_ram(4096), "4 GB");
        assert_eq!(format_ram(1536), "1.5 GB");
        assert_eq!(format_ram(1000), "0.98 GB");
        assert_eq!(format_ram(0), "0 GB");
    }

    #[test]
    fn test_is_valid_version() {
        assert!(is_valid_version("1.2.3"));
        assert!(is_valid_version("10.0.1-alpha-2"));
        assert!(!is_valid_version("1.2"));
        assert!(!is_valid_version("v1.2.3"));
        assert!(!is_valid_version("1.2.3-"));
    }
}
