//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution. Keyboard
//! settings and presets are stored next to the config file by [`crate::store`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_DIR_ENV;
use crate::store::file::write_atomic;

/// Speech backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Text-to-speech program (auto-detected when unset)
    #[serde(default)]
    pub program: Option<String>,
    /// Extra arguments passed before the text
    #[serde(default)]
    pub args: Vec<String>,
    /// Voice language (e.g., "en", "es")
    #[serde(default = "default_language")]
    pub language: String,
}

/// Default speech language
fn default_language() -> String {
    "en".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            language: default_language(),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key help line in the status bar
    #[serde(default = "default_show_help")]
    pub show_help: bool,
    /// Log filter directive (e.g., "info", "dwellboard=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_show_help() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help: default_show_help(),
            log_level: default_log_level(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Dwellboard/config.toml`
/// - macOS: `~/Library/Application Support/Dwellboard/config.toml`
/// - Windows: `%APPDATA%\Dwellboard\config.toml`
///
/// The directory can be overridden with `DWELLBOARD_CONFIG_DIR`.
///
/// # Validation
///
/// - `speech.language` must be non-empty
/// - `speech.program`, when set, must be non-empty
/// - `ui.log_level` must be non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Speech backend
    #[serde(default)]
    pub speech: SpeechConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Uses `DWELLBOARD_CONFIG_DIR` when set, otherwise:
    /// - Linux: `~/.config/Dwellboard/`
    /// - macOS: `~/Library/Application Support/Dwellboard/`
    /// - Windows: `%APPDATA%\Dwellboard\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Dwellboard");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads and validates the config at `path`, or the defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Validates and writes the config to `path`. Invalid configs are never written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        write_atomic(path, &content)
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.speech.language.trim().is_empty() {
            anyhow::bail!("Speech language cannot be empty");
        }

        if let Some(program) = &self.speech.program {
            if program.trim().is_empty() {
                anyhow::bail!("Speech program cannot be empty when set");
            }
        }

        if self.ui.log_level.trim().is_empty() {
            anyhow::bail!("Log level cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.speech.program, None);
        assert_eq!(config.speech.language, "en");
        assert!(config.ui.show_help);
        assert_eq!(config.ui.log_level, "info");
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());

        config.speech.language = " ".to_string();
        assert!(config.validate().is_err());

        config.speech.language = "es".to_string();
        config.speech.program = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_toml() {
        let config: Config = toml::from_str("[speech]\nprogram = \"say\"\n").unwrap();
        assert_eq!(config.speech.program.as_deref(), Some("say"));
        assert_eq!(config.speech.language, "en");
        assert!(config.ui.show_help);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::new();
        config.speech.args = vec!["--punct".to_string()];
        config.ui.show_help = false;

        let content = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::new());

        let mut config = Config::new();
        config.ui.show_help = false;
        config.speech.language = "es".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_invalid_config_not_saved() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::new();
        config.ui.log_level = String::new();
        assert!(config.save_to(&path).is_err());
        assert!(!path.exists());
    }
}
