use serde::{Deserialize, Serialize};
use std::fmt;

/// Launcher configuration persisted to `launcher.yaml`.
///
/// Every field the settings page can edit lives here. Sections mirror the
/// owning objects that [`ConfigField`](crate::binding::ConfigField) reports
/// as the target of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_max_threads")]
    pub max_threads: u32,

    #[serde(default)]
    pub installation_dir: String,

    /// Custom Java executable, empty when the bundled one is used
    #[serde(default)]
    pub jre: String,

    #[serde(default)]
    pub open_discord_on_start: bool,

    #[serde(default)]
    pub game: GameConfig,
}

/// Remote API endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_address")]
    pub address: String,

    /// Upper bound for connecting and fetching metadata during a hot reload
    #[serde(default = "default_reload_timeout")]
    pub reload_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Heap size in megabytes
    #[serde(default = "default_ram")]
    pub ram: u32,

    #[serde(default)]
    pub wrapper: String,

    #[serde(default)]
    pub game_dir: String,

    #[serde(default)]
    pub vm_args: Vec<String>,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub resize: ResizeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

/// Launcher UI language.
///
/// Several languages intentionally share a display name, so choice controls
/// must compare variants rather than labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh_CN")]
    ChineseSimplified,
    #[serde(rename = "zh_TW")]
    ChineseTaiwan,
    #[serde(rename = "zh_HK")]
    ChineseHongKong,
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::ChineseSimplified,
        Language::ChineseTaiwan,
        Language::ChineseHongKong,
        Language::Turkish,
        Language::Japanese,
    ];

    /// Stable locale code, also used as the serialized form
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::ChineseSimplified => "zh_CN",
            Language::ChineseTaiwan => "zh_TW",
            Language::ChineseHongKong => "zh_HK",
            Language::Turkish => "tr",
            Language::Japanese => "ja",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::ChineseSimplified => "简体中文",
            Language::ChineseTaiwan | Language::ChineseHongKong => "繁體中文",
            Language::Turkish => "Türkçe",
            Language::Japanese => "日本語",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            theme: default_theme(),
            language: Language::default(),
            max_threads: default_max_threads(),
            installation_dir: String::new(),
            jre: String::new(),
            open_discord_on_start: false,
            game: GameConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_api_address(),
            reload_timeout_secs: default_reload_timeout(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ram: default_ram(),
            wrapper: String::new(),
            game_dir: String::new(),
            vm_args: Vec::new(),
            args: Vec::new(),
            resize: ResizeConfig::default(),
        }
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_max_threads() -> u32 {
    16
}

fn default_api_address() -> String {
    "https://api.lunarclientprod.com".to_string()
}

fn default_reload_timeout() -> u64 {
    10
}

fn default_ram() -> u32 {
    3072
}

fn default_width() -> u32 {
    854
}

fn default_height() -> u32 {
    480
}
