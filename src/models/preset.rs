//! Named settings snapshots.

use crate::models::settings::{KeyOrdering, KeyboardSettings, PackingMode};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum preset name length in characters.
pub const MAX_PRESET_NAME_LEN: usize = 60;

/// A named, persisted snapshot of the full settings record.
///
/// # Validation
///
/// - name is trimmed; must be non-empty and at most 60 characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, unique within a preset store
    pub name: String,
    /// Settings snapshot
    pub settings: KeyboardSettings,
    /// When the preset was saved (absent for built-ins)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Preset {
    /// Creates a user preset stamped with the current time.
    pub fn new(name: &str, settings: KeyboardSettings) -> Result<Self> {
        let name = Self::normalize_name(name)?;
        Ok(Self {
            name,
            settings,
            saved_at: Some(Utc::now()),
        })
    }

    /// Trims and validates a preset name.
    pub fn normalize_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Preset name cannot be empty");
        }

        let len = trimmed.chars().count();
        if len > MAX_PRESET_NAME_LEN {
            anyhow::bail!(
                "Preset name '{}' exceeds maximum length of {} characters (got {})",
                trimmed,
                MAX_PRESET_NAME_LEN,
                len
            );
        }

        Ok(trimmed.to_string())
    }

    /// Returns true for presets that ship with the application.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.saved_at.is_none() && builtin_presets().iter().any(|p| p.name == self.name)
    }
}

/// Presets that are always available and cannot be removed.
#[must_use]
pub fn builtin_presets() -> Vec<Preset> {
    let base = KeyboardSettings::default();
    vec![
        Preset {
            name: "Full size".to_string(),
            settings: KeyboardSettings {
                font_size: 100,
                textarea_font_size: 10,
                layout: KeyOrdering::Qwerty,
                packing: PackingMode::Template,
                ..base.clone()
            },
            saved_at: None,
        },
        Preset {
            name: "QWERTY 75/25".to_string(),
            settings: KeyboardSettings {
                font_size: 75,
                textarea_font_size: 25,
                layout: KeyOrdering::Qwerty,
                packing: PackingMode::Template,
                ..base
            },
            saved_at: None,
        },
    ]
}
