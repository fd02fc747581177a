//! Settings and preset persistence.
//!
//! Stores are synchronous. The file-backed stores keep JSON documents in the
//! config directory; the in-memory stores back tests and headless runs.
//!
//! Preset names are unique within a store: [`PresetStore::add`] rejects a
//! name that is already taken, [`PresetStore::replace`] overwrites it. The
//! built-in presets are listed first and can be neither replaced nor removed.

pub mod file;
pub mod memory;

use anyhow::Result;

use crate::models::{builtin_presets, KeyboardSettings, Preset};

pub use file::{FilePresetStore, FileSettingsStore};
pub use memory::{MemoryPresetStore, MemorySettingsStore};

/// Persistence of the current settings record.
pub trait SettingsStore {
    /// Loads the saved settings, filling missing fields with defaults.
    ///
    /// Returns the defaults when nothing has been saved yet.
    fn load(&self) -> Result<KeyboardSettings>;

    /// Validates and saves `settings`.
    fn save(&mut self, settings: &KeyboardSettings) -> Result<()>;
}

/// Persistence of named settings snapshots.
///
/// Implementors only provide raw access to the user presets; naming rules
/// and the built-in presets are handled by the provided methods.
pub trait PresetStore {
    /// Reads the user presets, in insertion order.
    fn load_user_presets(&self) -> Result<Vec<Preset>>;

    /// Replaces the stored user presets.
    fn store_user_presets(&mut self, presets: &[Preset]) -> Result<()>;

    /// Built-in presets followed by user presets.
    fn list(&self) -> Result<Vec<Preset>> {
        let mut presets = builtin_presets();
        presets.extend(self.load_user_presets()?);
        Ok(presets)
    }

    /// Looks up a preset by name.
    fn get(&self, name: &str) -> Result<Option<Preset>> {
        let name = Preset::normalize_name(name)?;
        Ok(self.list()?.into_iter().find(|p| p.name == name))
    }

    /// Saves a new preset. Fails if the name is already taken.
    fn add(&mut self, name: &str, settings: &KeyboardSettings) -> Result<Preset> {
        settings.validate()?;
        let preset = Preset::new(name, settings.clone())?;

        if self.list()?.iter().any(|p| p.name == preset.name) {
            anyhow::bail!("Preset '{}' already exists", preset.name);
        }

        let mut presets = self.load_user_presets()?;
        presets.push(preset.clone());
        self.store_user_presets(&presets)?;
        tracing::info!("Saved preset '{}'", preset.name);
        Ok(preset)
    }

    /// Saves a preset, overwriting a user preset with the same name.
    fn replace(&mut self, name: &str, settings: &KeyboardSettings) -> Result<Preset> {
        settings.validate()?;
        let preset = Preset::new(name, settings.clone())?;

        if builtin_presets().iter().any(|p| p.name == preset.name) {
            anyhow::bail!("Built-in preset '{}' cannot be overwritten", preset.name);
        }

        let mut presets = self.load_user_presets()?;
        if let Some(existing) = presets.iter_mut().find(|p| p.name == preset.name) {
            *existing = preset.clone();
        } else {
            presets.push(preset.clone());
        }
        self.store_user_presets(&presets)?;
        tracing::info!("Saved preset '{}' (replace)", preset.name);
        Ok(preset)
    }

    /// Removes a user preset.
    fn remove(&mut self, name: &str) -> Result<()> {
        let name = Preset::normalize_name(name)?;

        if builtin_presets().iter().any(|p| p.name == name) {
            anyhow::bail!("Built-in preset '{}' cannot be removed", name);
        }

        let mut presets = self.load_user_presets()?;
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            anyhow::bail!("Preset '{}' not found", name);
        }

        self.store_user_presets(&presets)?;
        tracing::info!("Removed preset '{}'", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_listed_first() {
        let store = MemoryPresetStore::new();
        let presets = store.list().unwrap();
        assert_eq!(presets.len(), 2);
        assert!(presets.iter().all(Preset::is_builtin));
    }

    #[test]
    fn test_add_and_get() {
        let mut store = MemoryPresetStore::new();
        let settings = KeyboardSettings {
            hold_time: 0.6,
            ..KeyboardSettings::default()
        };
        store.add("  Slow  ", &settings).unwrap();

        let preset = store.get("Slow").unwrap().unwrap();
        assert_eq!(preset.settings, settings);
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_add_rejects_duplicate_names() {
        let mut store = MemoryPresetStore::new();
        store.add("Slow", &KeyboardSettings::default()).unwrap();
        assert!(store.add("Slow", &KeyboardSettings::default()).is_err());
        assert!(store.add("Full size", &KeyboardSettings::default()).is_err());
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_replace_overwrites() {
        let mut store = MemoryPresetStore::new();
        store.add("Slow", &KeyboardSettings::default()).unwrap();

        let slower = KeyboardSettings {
            hold_time: 1.5,
            ..KeyboardSettings::default()
        };
        store.replace("Slow", &slower).unwrap();

        let presets = store.list().unwrap();
        assert_eq!(presets.len(), 3);
        assert_eq!(store.get("Slow").unwrap().unwrap().settings, slower);
        assert!(store.replace("Full size", &slower).is_err());
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryPresetStore::new();
        store.add("Slow", &KeyboardSettings::default()).unwrap();

        store.remove("Slow").unwrap();
        assert!(store.get("Slow").unwrap().is_none());
        assert!(store.remove("Slow").is_err());
        assert!(store.remove("QWERTY 75/25").is_err());
    }

    #[test]
    fn test_add_rejects_invalid_settings() {
        let mut store = MemoryPresetStore::new();
        let invalid = KeyboardSettings {
            hold_time: 10.0,
            ..KeyboardSettings::default()
        };
        assert!(store.add("Broken", &invalid).is_err());
    }
}
