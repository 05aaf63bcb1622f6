use crate::models::{Language, LauncherConfig};
use std::fmt;
use thiserror::Error;

/// Owning object of a bindable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Launcher,
    Api,
    Game,
    Resize,
}

impl ConfigSection {
    /// Type name of the owning config object, as written to the logs
    pub fn type_name(self) -> &'static str {
        match self {
            ConfigSection::Launcher => "LauncherConfig",
            ConfigSection::Api => "ApiConfig",
            ConfigSection::Game => "GameConfig",
            ConfigSection::Resize => "ResizeConfig",
        }
    }
}

/// Kind of value a field holds or a control displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Flag,
    Integer,
    Language,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Flag => "flag",
            ValueKind::Integer => "integer",
            ValueKind::Language => "language",
        };
        f.write_str(name)
    }
}

/// A value read from or written to a config field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Language(Language),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Flag(_) => ValueKind::Flag,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Language(_) => ValueKind::Language,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{:?}", text),
            FieldValue::Flag(flag) => write!(f, "{}", flag),
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Language(lang) => write!(f, "{}", lang.code()),
        }
    }
}

/// Errors raised while binding a control to a field.
///
/// These are programming errors: they surface while building a page, never
/// in response to user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("No bindable field named '{0}'")]
    UnknownField(String),

    #[error("Field {field} holds {expected} values, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Value {value} does not fit field {field}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("Value {value} is not one of the choices for {field}")]
    NotInChoices { field: &'static str, value: String },
}

/// Descriptor table of every field a settings control can bind to.
///
/// Each variant knows its owning section, its name and typed accessors, so
/// nothing is looked up by reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    ApiAddress,
    Theme,
    Language,
    MaxThreads,
    OpenDiscordOnStart,
    GameRam,
    GameWrapper,
    ResizeWidth,
    ResizeHeight,
}

impl ConfigField {
    pub const ALL: [ConfigField; 9] = [
        ConfigField::ApiAddress,
        ConfigField::Theme,
        ConfigField::Language,
        ConfigField::MaxThreads,
        ConfigField::OpenDiscordOnStart,
        ConfigField::GameRam,
        ConfigField::GameWrapper,
        ConfigField::ResizeWidth,
        ConfigField::ResizeHeight,
    ];

    pub fn section(self) -> ConfigSection {
        match self {
            ConfigField::ApiAddress => ConfigSection::Api,
            ConfigField::Theme
            | ConfigField::Language
            | ConfigField::MaxThreads
            | ConfigField::OpenDiscordOnStart => ConfigSection::Launcher,
            ConfigField::GameRam | ConfigField::GameWrapper => ConfigSection::Game,
            ConfigField::ResizeWidth | ConfigField::ResizeHeight => ConfigSection::Resize,
        }
    }

    /// Field name within its section
    pub fn name(self) -> &'static str {
        match self {
            ConfigField::ApiAddress => "address",
            ConfigField::Theme => "theme",
            ConfigField::Language => "language",
            ConfigField::MaxThreads => "maxThreads",
            ConfigField::OpenDiscordOnStart => "openDiscordOnStart",
            ConfigField::GameRam => "ram",
            ConfigField::GameWrapper => "wrapper",
            ConfigField::ResizeWidth => "width",
            ConfigField::ResizeHeight => "height",
        }
    }

    /// Dotted path from the config root, e.g. `game.resize.width`
    pub fn path(self) -> &'static str {
        match self {
            ConfigField::ApiAddress => "api.address",
            ConfigField::Theme => "theme",
            ConfigField::Language => "language",
            ConfigField::MaxThreads => "maxThreads",
            ConfigField::OpenDiscordOnStart => "openDiscordOnStart",
            ConfigField::GameRam => "game.ram",
            ConfigField::GameWrapper => "game.wrapper",
            ConfigField::ResizeWidth => "game.resize.width",
            ConfigField::ResizeHeight => "game.resize.height",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            ConfigField::ApiAddress | ConfigField::Theme | ConfigField::GameWrapper => {
                ValueKind::Text
            }
            ConfigField::Language => ValueKind::Language,
            ConfigField::OpenDiscordOnStart => ValueKind::Flag,
            ConfigField::MaxThreads
            | ConfigField::GameRam
            | ConfigField::ResizeWidth
            | ConfigField::ResizeHeight => ValueKind::Integer,
        }
    }

    /// Resolve a field from its dotted path
    pub fn from_path(path: &str) -> Result<Self, BindingError> {
        Self::ALL
            .into_iter()
            .find(|field| field.path() == path)
            .ok_or_else(|| BindingError::UnknownField(path.to_string()))
    }

    pub fn get(self, config: &LauncherConfig) -> FieldValue {
        match self {
            ConfigField::ApiAddress => FieldValue::Text(config.api.address.clone()),
            ConfigField::Theme => FieldValue::Text(config.theme.clone()),
            ConfigField::Language => FieldValue::Language(config.language),
            ConfigField::MaxThreads => FieldValue::Integer(config.max_threads.into()),
            ConfigField::OpenDiscordOnStart => FieldValue::Flag(config.open_discord_on_start),
            ConfigField::GameRam => FieldValue::Integer(config.game.ram.into()),
            ConfigField::GameWrapper => FieldValue::Text(config.game.wrapper.clone()),
            ConfigField::ResizeWidth => FieldValue::Integer(config.game.resize.width.into()),
            ConfigField::ResizeHeight => FieldValue::Integer(config.game.resize.height.into()),
        }
    }

    /// Write a value into the field. The config is left untouched on error.
    pub fn set(self, config: &mut LauncherConfig, value: FieldValue) -> Result<(), BindingError> {
        let found = value.kind();
        let mismatch = BindingError::TypeMismatch {
            field: self.path(),
            expected: self.kind(),
            found,
        };

        match (self, value) {
            (ConfigField::ApiAddress, FieldValue::Text(text)) => config.api.address = text,
            (ConfigField::Theme, FieldValue::Text(text)) => config.theme = text,
            (ConfigField::GameWrapper, FieldValue::Text(text)) => config.game.wrapper = text,
            (ConfigField::Language, FieldValue::Language(lang)) => config.language = lang,
            (ConfigField::OpenDiscordOnStart, FieldValue::Flag(flag)) => {
                config.open_discord_on_start = flag
            }
            (ConfigField::MaxThreads, FieldValue::Integer(value)) => {
                config.max_threads = self.to_u32(value)?
            }
            (ConfigField::GameRam, FieldValue::Integer(value)) => {
                config.game.ram = self.to_u32(value)?
            }
            (ConfigField::ResizeWidth, FieldValue::Integer(value)) => {
                config.game.resize.width = self.to_u32(value)?
            }
            (ConfigField::ResizeHeight, FieldValue::Integer(value)) => {
                config.game.resize.height = self.to_u32(value)?
            }
            _ => return Err(mismatch),
        }

        Ok(())
    }

    fn to_u32(self, value: i64) -> Result<u32, BindingError> {
        u32::try_from(value).map_err(|_| BindingError::OutOfRange {
            field: self.path(),
            value,
        })
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_round_trips() {
        let mut config = LauncherConfig::default();

        for field in ConfigField::ALL {
            let value = field.get(&config);
            assert_eq!(value.kind(), field.kind(), "kind of {}", field);
            field.set(&mut config, value.clone()).unwrap();
            assert_eq!(field.get(&config), value);
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(ConfigField::from_path("api.address"), Ok(ConfigField::ApiAddress));
        assert_eq!(
            ConfigField::from_path("game.resize.height"),
            Ok(ConfigField::ResizeHeight)
        );
        assert_eq!(
            ConfigField::from_path("address"),
            Err(BindingError::UnknownField("address".to_string()))
        );
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut config = LauncherConfig::default();
        let result = ConfigField::MaxThreads.set(&mut config, FieldValue::Text("8".to_string()));

        assert_eq!(
            result,
            Err(BindingError::TypeMismatch {
                field: "maxThreads",
                expected: ValueKind::Integer,
                found: ValueKind::Text,
            })
        );
        assert_eq!(config.max_threads, 16);
    }

    #[test]
    fn test_set_rejects_negative_integer() {
        let mut config = LauncherConfig::default();
        let result = ConfigField::GameRam.set(&mut config, FieldValue::Integer(-1));

        assert!(matches!(result, Err(BindingError::OutOfRange { value: -1, .. })));
        assert_eq!(config.game.ram, 3072);
    }

    #[test]
    fn test_api_address_identity() {
        let field = ConfigField::ApiAddress;
        assert_eq!(field.section(), ConfigSection::Api);
        assert_eq!(field.name(), "address");
        assert_eq!(field.section().type_name(), "ApiConfig");
    }
}
