//! JSON file stores in the config directory.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PresetStore, SettingsStore};
use crate::config::Config;
use crate::models::{KeyboardSettings, Preset};

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Presets file name inside the config directory.
pub const PRESETS_FILE: &str = "presets.json";

/// Writes `contents` to `path` through a sibling temp file and a rename,
/// creating the parent directory if needed.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(format!(
            "Failed to create directory: {}",
            parent.display()
        ))?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).context(format!(
        "Failed to write temp file: {}",
        temp_path.display()
    ))?;

    fs::rename(&temp_path, path).context(format!(
        "Failed to rename temp file to: {}",
        path.display()
    ))?;

    Ok(())
}

/// Writes `value` as pretty JSON atomically.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    write_atomic(path, &content)
}

/// Settings persisted to `settings.json`.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the config directory.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join(SETTINGS_FILE)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<KeyboardSettings> {
        if !self.path.exists() {
            return Ok(KeyboardSettings::default());
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read settings file: {}",
            self.path.display()
        ))?;

        let settings: KeyboardSettings = serde_json::from_str(&content).context(format!(
            "Failed to parse settings file: {}",
            self.path.display()
        ))?;

        settings.validate().context(format!(
            "Invalid settings in {}",
            self.path.display()
        ))?;

        Ok(settings)
    }

    fn save(&mut self, settings: &KeyboardSettings) -> Result<()> {
        settings.validate()?;
        write_json_atomic(&self.path, settings)?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// User presets persisted to `presets.json`.
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    path: PathBuf,
}

impl FilePresetStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the config directory.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join(PRESETS_FILE)))
    }
}

impl PresetStore for FilePresetStore {
    fn load_user_presets(&self) -> Result<Vec<Preset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read presets file: {}",
            self.path.display()
        ))?;

        serde_json::from_str(&content).context(format!(
            "Failed to parse presets file: {}",
            self.path.display()
        ))
    }

    fn store_user_presets(&mut self, presets: &[Preset]) -> Result<()> {
        write_json_atomic(&self.path, presets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyOrdering, PackingMode};
    use tempfile::TempDir;

    #[test]
    fn test_settings_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(temp_dir.path().join(SETTINGS_FILE));
        assert_eq!(store.load().unwrap(), KeyboardSettings::default());
    }

    #[test]
    fn test_settings_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileSettingsStore::new(temp_dir.path().join("nested").join(SETTINGS_FILE));

        let settings = KeyboardSettings {
            hold_time: 0.8,
            layout: KeyOrdering::Abc,
            packing: PackingMode::RowCount,
            row_count: 3,
            ..KeyboardSettings::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_settings_partial_file_is_merged_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"instant_input": true, "legacy_field": "x"}"#).unwrap();

        let loaded = FileSettingsStore::new(&path).load().unwrap();
        assert!(loaded.instant_input);
        assert!((loaded.hold_time - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_settings_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(FileSettingsStore::new(&path).load().is_err());
    }

    #[test]
    fn test_settings_save_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        let mut store = FileSettingsStore::new(&path);
        let invalid = KeyboardSettings {
            row_count: 0,
            ..KeyboardSettings::default()
        };
        assert!(store.save(&invalid).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_presets_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PRESETS_FILE);

        let mut store = FilePresetStore::new(&path);
        store.add("Evening", &KeyboardSettings::default()).unwrap();

        let reopened = FilePresetStore::new(&path);
        let names: Vec<String> = reopened.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Full size", "QWERTY 75/25", "Evening"]);

        // Built-ins are never written to disk
        let on_disk = reopened.load_user_presets().unwrap();
        assert_eq!(on_disk.len(), 1);
    }
}
