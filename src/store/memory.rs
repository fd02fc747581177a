//! In-memory stores.

use anyhow::Result;

use super::{PresetStore, SettingsStore};
use crate::models::{KeyboardSettings, Preset};

/// Settings store that keeps the record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Option<KeyboardSettings>,
}

impl MemorySettingsStore {
    /// Creates an empty store (loads return defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<KeyboardSettings> {
        Ok(self.settings.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &KeyboardSettings) -> Result<()> {
        settings.validate()?;
        self.settings = Some(settings.clone());
        Ok(())
    }
}

/// Preset store that keeps user presets in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPresetStore {
    presets: Vec<Preset>,
}

impl MemoryPresetStore {
    /// Creates a store with no user presets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresetStore for MemoryPresetStore {
    fn load_user_presets(&self) -> Result<Vec<Preset>> {
        Ok(self.presets.clone())
    }

    fn store_user_presets(&mut self, presets: &[Preset]) -> Result<()> {
        self.presets = presets.to_vec();
        Ok(())
    }
}
