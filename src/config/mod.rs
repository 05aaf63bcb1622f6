use crate::models::LauncherConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Prefix of environment variables overriding config values,
/// e.g. `PVPLAUNCHER_API__ADDRESS`
pub const ENV_PREFIX: &str = "PVPLAUNCHER";

const CONFIG_FILE_NAME: &str = "launcher.yaml";

/// Shortest reload timeout accepted from the config
pub const MIN_RELOAD_TIMEOUT_SECS: u64 = 1;

/// Configuration manager for the launcher's data directory.
///
/// Layout:
/// - `launcher.yaml`: user settings ([`LauncherConfig`])
/// - `themes/`: custom theme files (`*.json`)
/// - `logs/`: rolling log files
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
    themes_dir: Utf8PathBuf,
    log_dir: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager rooted at `config_dir`, creating the directory
    /// tree if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();
        let themes_dir = config_dir.join("themes");
        let log_dir = config_dir.join("logs");

        for dir in [&config_dir, &themes_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir))?;
            }
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            themes_dir,
            log_dir,
            config_dir,
        })
    }

    /// Load the launcher configuration.
    ///
    /// Sources, lowest precedence first: built-in defaults, `launcher.yaml`
    /// (optional), `PVPLAUNCHER_*` environment variables.
    pub fn load_config(&self) -> Result<LauncherConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Launcher config not found at {}, using defaults",
                self.config_path
            );
        }

        let defaults = Config::try_from(&LauncherConfig::default())
            .context("Failed to build default launcher config")?;

        let mut config: LauncherConfig = Config::builder()
            .add_source(defaults)
            .add_source(
                File::new(self.config_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read launcher config: {}", self.config_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse launcher config: {}", self.config_path))?;

        if config.api.reload_timeout_secs < MIN_RELOAD_TIMEOUT_SECS {
            tracing::warn!(
                "api.reload_timeout_secs = {} is too short, using {}",
                config.api.reload_timeout_secs,
                MIN_RELOAD_TIMEOUT_SECS
            );
            config.api.reload_timeout_secs = MIN_RELOAD_TIMEOUT_SECS;
        }

        tracing::info!("Loaded launcher config from {}", self.config_path);
        Ok(config)
    }

    pub fn save_config(&self, config: &LauncherConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize launcher config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write launcher config: {}", self.config_path))?;

        tracing::debug!("Saved launcher config to {}", self.config_path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    pub fn themes_dir(&self) -> &Utf8Path {
        &self.themes_dir
    }

    pub fn log_dir(&self) -> &Utf8Path {
        &self.log_dir
    }
}
