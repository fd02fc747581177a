//! Keyboard session: settings, presets, packed layout and the dwell
//! controller wired together for an interactive front end.

use std::time::Instant;

use anyhow::Result;

use crate::feedback::Feedback;
use crate::models::{Key, KeyGrid, KeyboardSettings, Preset};
use crate::services::{pack, Commit, DwellController};
use crate::store::{PresetStore, SettingsStore};

/// One interactive keyboard session.
///
/// Settings changes go through [`KeyboardSession::update_settings`], which
/// validates, repacks the layout and persists. A failed save is logged and
/// the session continues with the in-memory settings.
pub struct KeyboardSession {
    settings: KeyboardSettings,
    grid: KeyGrid,
    controller: DwellController,
    settings_store: Box<dyn SettingsStore>,
    preset_store: Box<dyn PresetStore>,
}

impl KeyboardSession {
    /// Opens a session, loading saved settings.
    ///
    /// Unreadable or invalid saved settings are logged and replaced by the
    /// defaults.
    pub fn open(
        settings_store: Box<dyn SettingsStore>,
        preset_store: Box<dyn PresetStore>,
        feedback: Feedback,
    ) -> Self {
        let settings = settings_store.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {:#}", e);
            KeyboardSettings::default()
        });

        let grid = pack_or_template(&settings);

        Self {
            settings,
            grid,
            controller: DwellController::new(feedback),
            settings_store,
            preset_store,
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &KeyboardSettings {
        &self.settings
    }

    /// Current key grid.
    #[must_use]
    pub const fn grid(&self) -> &KeyGrid {
        &self.grid
    }

    /// The dwell controller.
    #[must_use]
    pub const fn controller(&self) -> &DwellController {
        &self.controller
    }

    /// Mutable access to the dwell controller (listeners, text edits).
    pub fn controller_mut(&mut self) -> &mut DwellController {
        &mut self.controller
    }

    /// Text typed so far.
    #[must_use]
    pub fn text(&self) -> &str {
        self.controller.text().as_str()
    }

    /// Starts a press using the live settings.
    pub fn press(&mut self, key: Key, now: Instant) -> Option<Commit> {
        let dwell = self.settings.dwell();
        self.controller.press(key, now, &dwell)
    }

    /// Ends a press using the live settings.
    pub fn release(&mut self, key: Key, now: Instant) -> Option<Commit> {
        let dwell = self.settings.dwell();
        self.controller.release(key, now, &dwell)
    }

    /// Commits a key directly.
    pub fn activate(&mut self, key: Key, now: Instant) -> Commit {
        let dwell = self.settings.dwell();
        self.controller.activate(key, now, &dwell)
    }

    /// Speaks the whole text.
    pub fn read_aloud(&mut self) -> bool {
        let dwell = self.settings.dwell();
        self.controller.read_aloud(&dwell)
    }

    /// Applies new settings.
    ///
    /// Invalid settings are rejected and leave the session unchanged.
    pub fn update_settings(&mut self, settings: KeyboardSettings) -> Result<()> {
        settings.validate()?;
        let grid = pack(settings.layout, settings.packing, settings.row_count)?;

        if let Err(e) = self.settings_store.save(&settings) {
            tracing::warn!("Failed to save settings: {:#}", e);
        }

        if grid != self.grid {
            // Keys may have moved under a held pointer
            self.controller.release_all();
        }

        self.settings = settings;
        self.grid = grid;
        Ok(())
    }

    /// Restores the default settings.
    pub fn reset_settings(&mut self) -> Result<()> {
        self.update_settings(KeyboardSettings::default())
    }

    /// Lists built-in and user presets.
    pub fn presets(&self) -> Result<Vec<Preset>> {
        self.preset_store.list()
    }

    /// Saves the current settings as a new preset.
    pub fn save_preset(&mut self, name: &str) -> Result<Preset> {
        self.preset_store.add(name, &self.settings)
    }

    /// Applies the named preset.
    pub fn load_preset(&mut self, name: &str) -> Result<()> {
        let preset = self
            .preset_store
            .get(name)?
            .ok_or_else(|| anyhow::anyhow!("Preset '{}' not found", name.trim()))?;
        self.update_settings(preset.settings)
    }

    /// Deletes a user preset.
    pub fn delete_preset(&mut self, name: &str) -> Result<()> {
        self.preset_store.remove(name)
    }
}

fn pack_or_template(settings: &KeyboardSettings) -> KeyGrid {
    pack(settings.layout, settings.packing, settings.row_count).unwrap_or_else(|e| {
        tracing::warn!("Invalid packing parameters, using template: {:#}", e);
        crate::services::packer::template(settings.layout, false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyOrdering, PackingMode};
    use crate::store::{MemoryPresetStore, MemorySettingsStore};
    use std::time::Duration;

    struct FailingSettingsStore;

    impl SettingsStore for FailingSettingsStore {
        fn load(&self) -> Result<KeyboardSettings> {
            anyhow::bail!("disk unavailable")
        }

        fn save(&mut self, _settings: &KeyboardSettings) -> Result<()> {
            anyhow::bail!("disk unavailable")
        }
    }

    fn session() -> KeyboardSession {
        KeyboardSession::open(
            Box::new(MemorySettingsStore::new()),
            Box::new(MemoryPresetStore::new()),
            Feedback::silent(),
        )
    }

    #[test]
    fn test_open_with_defaults() {
        let session = session();
        assert_eq!(session.settings(), &KeyboardSettings::default());
        assert_eq!(session.grid().row_count(), 4);
    }

    #[test]
    fn test_update_settings_repacks() {
        let mut session = session();
        let settings = KeyboardSettings {
            layout: KeyOrdering::Abc,
            packing: PackingMode::RowCount,
            row_count: 3,
            ..KeyboardSettings::default()
        };
        session.update_settings(settings).unwrap();

        assert_eq!(session.grid().rows()[0].first(), Some(&Key::Char('A')));
        assert_eq!(session.grid().row_count(), 4);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut session = session();
        let invalid = KeyboardSettings {
            hold_time: -1.0,
            ..KeyboardSettings::default()
        };
        assert!(session.update_settings(invalid).is_err());
        assert_eq!(session.settings(), &KeyboardSettings::default());
    }

    #[test]
    fn test_persistence_failure_keeps_session_running() {
        let mut session = KeyboardSession::open(
            Box::new(FailingSettingsStore),
            Box::new(MemoryPresetStore::new()),
            Feedback::silent(),
        );
        let settings = KeyboardSettings {
            hold_time: 0.5,
            ..KeyboardSettings::default()
        };
        session.update_settings(settings.clone()).unwrap();
        assert_eq!(session.settings(), &settings);

        let t0 = Instant::now();
        session.press(Key::Char('A'), t0);
        session.release(Key::Char('A'), t0 + Duration::from_millis(500));
        assert_eq!(session.text(), "A");
    }

    #[test]
    fn test_presets_round_trip() {
        let mut session = session();
        let slow = KeyboardSettings {
            hold_time: 1.0,
            ..KeyboardSettings::default()
        };
        session.update_settings(slow.clone()).unwrap();
        session.save_preset("Slow").unwrap();
        session.reset_settings().unwrap();
        assert_eq!(session.settings(), &KeyboardSettings::default());

        session.load_preset("Slow").unwrap();
        assert_eq!(session.settings(), &slow);

        session.delete_preset("Slow").unwrap();
        assert!(session.load_preset("Slow").is_err());
    }

    #[test]
    fn test_hold_time_comes_from_live_settings() {
        let mut session = session();
        session
            .update_settings(KeyboardSettings {
                hold_time: 0.3,
                ..KeyboardSettings::default()
            })
            .unwrap();

        let t0 = Instant::now();
        session.press(Key::Char('B'), t0);
        assert!(session.release(Key::Char('B'), t0 + Duration::from_millis(200)).is_none());
        session.press(Key::Char('B'), t0);
        assert!(session.release(Key::Char('B'), t0 + Duration::from_millis(300)).is_some());
    }
}
