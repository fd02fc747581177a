//! Keyboard settings record and the subsets handed to the core engine.
//!
//! `KeyboardSettings` is the persisted, JSON-serializable record edited by the
//! settings panel and the `settings` CLI command. The dwell controller and the
//! layout packer never read it directly; they receive [`DwellSettings`] and
//! the packing parameters as plain arguments.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Valid hold-time range in seconds.
pub const HOLD_TIME_RANGE: (f64, f64) = (0.1, 3.0);
/// Valid key font size range (percent of key size).
pub const FONT_SIZE_RANGE: (u8, u8) = (1, 100);
/// Valid text area font size range (pixels).
pub const TEXTAREA_FONT_SIZE_RANGE: (u16, u16) = (8, 142);
/// Maximum key spacing.
pub const MAX_SPACING: u8 = 10;
/// Valid speech rate range.
pub const VOICE_RATE_RANGE: (f64, f64) = (0.1, 3.0);
/// Valid speech volume range.
pub const VOICE_VOLUME_RANGE: (f64, f64) = (0.0, 1.0);
/// Valid speech pitch range.
pub const VOICE_PITCH_RANGE: (f64, f64) = (0.0, 2.0);

/// Alphabet ordering of the regular keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum KeyOrdering {
    /// QWERTY-like ordering
    #[default]
    Qwerty,
    /// Plain alphabetic ordering
    Abc,
}

impl KeyOrdering {
    /// Regular (non-special) keys of this ordering, in reading order.
    #[must_use]
    pub const fn letters(self) -> &'static str {
        match self {
            Self::Qwerty => "QWERTYUIOPASDFGHJKLÑZXCVBNM",
            Self::Abc => "ABCDEFGHIJKLMNÑOPQRSTUVWXYZ",
        }
    }

    /// Number of regular keys in this ordering.
    #[must_use]
    pub fn regular_key_count(self) -> usize {
        self.letters().chars().count()
    }

    /// Cycles to the other ordering.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Qwerty => Self::Abc,
            Self::Abc => Self::Qwerty,
        }
    }
}

/// How the key rows are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PackingMode {
    /// Fixed template with space and backspace on a bottom row
    #[default]
    Template,
    /// Fixed template with space and backspace at both ends of the last row
    Sides,
    /// Regular keys repacked into `row_count` rows
    RowCount,
}

impl PackingMode {
    /// Next mode in the settings panel cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Template => Self::Sides,
            Self::Sides => Self::RowCount,
            Self::RowCount => Self::Template,
        }
    }
}

/// Visual theme of the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    /// Dark keys on a light background
    #[default]
    Light,
    /// Light keys on a dark background
    Dark,
    /// Black on yellow, maximum contrast
    HighContrast,
}

impl ThemeMode {
    /// Next theme in the settings panel cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::HighContrast,
            Self::HighContrast => Self::Light,
        }
    }
}

macro_rules! impl_kebab_str {
    ($ty:ty, $what:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $(Self::$variant => $name),+
                };
                f.pad(name)
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => anyhow::bail!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $what,
                        s,
                        [$($name),+].join(", ")
                    ),
                }
            }
        }
    };
}

impl_kebab_str!(KeyOrdering, "key ordering", [Qwerty => "qwerty", Abc => "abc"]);
impl_kebab_str!(PackingMode, "packing mode", [
    Template => "template",
    Sides => "sides",
    RowCount => "row-count",
]);
impl_kebab_str!(ThemeMode, "theme", [
    Light => "light",
    Dark => "dark",
    HighContrast => "high-contrast",
]);

/// Full keyboard settings record.
///
/// # Persistence
///
/// Stored as JSON. Every field falls back to its default when missing, and
/// unknown fields are ignored, so records written by older or newer builds
/// still load.
///
/// # Validation
///
/// See [`KeyboardSettings::validate`] for the accepted ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    /// Minimum hold duration in seconds for a press to commit
    pub hold_time: f64,
    /// Speak committed keys
    pub sound_enabled: bool,
    /// Haptic pulse on commit
    pub vibration_enabled: bool,
    /// Commit on press instead of on a qualifying release
    pub instant_input: bool,
    /// Visual theme
    pub theme: ThemeMode,
    /// Key label size as a percentage of the key size
    pub font_size: u8,
    /// Text area font size in pixels
    pub textarea_font_size: u16,
    /// Gap between keys
    pub spacing: u8,
    /// Alphabet ordering
    pub layout: KeyOrdering,
    /// Row arrangement
    pub packing: PackingMode,
    /// Row count used by [`PackingMode::RowCount`]
    pub row_count: usize,
    /// Speech rate
    pub voice_rate: f64,
    /// Speech volume
    pub voice_volume: f64,
    /// Speech pitch
    pub voice_pitch: f64,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            hold_time: 0.1,
            sound_enabled: true,
            vibration_enabled: true,
            instant_input: false,
            theme: ThemeMode::Light,
            font_size: 50,
            textarea_font_size: 16,
            spacing: 2,
            layout: KeyOrdering::Qwerty,
            packing: PackingMode::Template,
            row_count: 4,
            voice_rate: 2.0,
            voice_volume: 0.8,
            voice_pitch: 1.0,
        }
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        anyhow::bail!("{} must be between {} and {} (got {})", name, min, max, value);
    }
    Ok(())
}

impl KeyboardSettings {
    /// Validates every field against its accepted range.
    ///
    /// Checks:
    /// - `hold_time` within 0.1 ..= 3.0 seconds
    /// - `font_size` within 1 ..= 100
    /// - `textarea_font_size` within 8 ..= 142
    /// - `spacing` at most 10
    /// - `row_count` between 1 and the number of regular keys of `layout`
    /// - voice rate, volume and pitch within their ranges
    pub fn validate(&self) -> Result<()> {
        check_range("Hold time", self.hold_time, HOLD_TIME_RANGE)?;

        if self.font_size < FONT_SIZE_RANGE.0 || self.font_size > FONT_SIZE_RANGE.1 {
            anyhow::bail!(
                "Font size must be between {} and {} (got {})",
                FONT_SIZE_RANGE.0,
                FONT_SIZE_RANGE.1,
                self.font_size
            );
        }

        if self.textarea_font_size < TEXTAREA_FONT_SIZE_RANGE.0
            || self.textarea_font_size > TEXTAREA_FONT_SIZE_RANGE.1
        {
            anyhow::bail!(
                "Text area font size must be between {} and {} (got {})",
                TEXTAREA_FONT_SIZE_RANGE.0,
                TEXTAREA_FONT_SIZE_RANGE.1,
                self.textarea_font_size
            );
        }

        if self.spacing > MAX_SPACING {
            anyhow::bail!(
                "Spacing must be at most {} (got {})",
                MAX_SPACING,
                self.spacing
            );
        }

        let max_rows = self.layout.regular_key_count();
        if self.row_count == 0 || self.row_count > max_rows {
            anyhow::bail!(
                "Row count must be between 1 and {} for the {} layout (got {})",
                max_rows,
                self.layout,
                self.row_count
            );
        }

        check_range("Voice rate", self.voice_rate, VOICE_RATE_RANGE)?;
        check_range("Voice volume", self.voice_volume, VOICE_VOLUME_RANGE)?;
        check_range("Voice pitch", self.voice_pitch, VOICE_PITCH_RANGE)?;

        Ok(())
    }

    /// Extracts the subset of settings the dwell controller needs.
    #[must_use]
    pub fn dwell(&self) -> DwellSettings {
        DwellSettings {
            hold_time: Duration::from_millis((self.hold_time.max(0.0) * 1000.0).round() as u64),
            instant_input: self.instant_input,
            sound_enabled: self.sound_enabled,
            vibration_enabled: self.vibration_enabled,
            voice: VoiceSettings {
                rate: self.voice_rate,
                volume: self.voice_volume,
                pitch: self.voice_pitch,
            },
        }
    }
}

/// Speech parameters forwarded with every utterance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    /// Speech rate (1.0 = normal)
    pub rate: f64,
    /// Volume (0.0 ..= 1.0)
    pub volume: f64,
    /// Pitch (1.0 = normal)
    pub pitch: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 2.0,
            volume: 0.8,
            pitch: 1.0,
        }
    }
}

/// Live settings read by the dwell controller on every press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellSettings {
    /// Minimum hold duration for a release to commit (inclusive)
    pub hold_time: Duration,
    /// Commit on press instead of release
    pub instant_input: bool,
    /// Speak committed keys
    pub sound_enabled: bool,
    /// Haptic pulse on commit
    pub vibration_enabled: bool,
    /// Speech parameters
    pub voice: VoiceSettings,
}

impl Default for DwellSettings {
    fn default() -> Self {
        KeyboardSettings::default().dwell()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(KeyboardSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut settings = KeyboardSettings {
            hold_time: 0.0,
            ..KeyboardSettings::default()
        };
        assert!(settings.validate().is_err());

        settings.hold_time = 0.5;
        settings.row_count = 0;
        assert!(settings.validate().is_err());

        settings.row_count = 28;
        assert!(settings.validate().is_err());

        settings.row_count = 27;
        assert!(settings.validate().is_ok());

        settings.voice_volume = 1.5;
        assert!(settings.validate().is_err());

        settings.voice_volume = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_fields_default_filled() {
        let settings: KeyboardSettings =
            serde_json::from_str(r#"{"hold_time": 0.4, "layout": "abc", "unknown": 1}"#).unwrap();

        assert!((settings.hold_time - 0.4).abs() < f64::EPSILON);
        assert_eq!(settings.layout, KeyOrdering::Abc);
        assert_eq!(settings.packing, PackingMode::Template);
        assert!(settings.sound_enabled);
        assert_eq!(settings.textarea_font_size, 16);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = KeyboardSettings {
            hold_time: 0.7,
            instant_input: true,
            theme: ThemeMode::HighContrast,
            packing: PackingMode::RowCount,
            row_count: 3,
            ..KeyboardSettings::default()
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""theme":"high-contrast""#));
        assert!(json.contains(r#""packing":"row-count""#));

        let loaded: KeyboardSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("QWERTY".parse::<KeyOrdering>().unwrap(), KeyOrdering::Qwerty);
        assert_eq!("row-count".parse::<PackingMode>().unwrap(), PackingMode::RowCount);
        assert_eq!(
            "high-contrast".parse::<ThemeMode>().unwrap(),
            ThemeMode::HighContrast
        );
        assert!("dvorak".parse::<KeyOrdering>().is_err());
        assert_eq!(PackingMode::RowCount.to_string(), "row-count");
    }

    #[test]
    fn test_dwell_subset() {
        let settings = KeyboardSettings {
            hold_time: 0.25,
            sound_enabled: false,
            ..KeyboardSettings::default()
        };
        let dwell = settings.dwell();
        assert_eq!(dwell.hold_time, Duration::from_millis(250));
        assert!(!dwell.sound_enabled);
        assert!(dwell.vibration_enabled);
    }
}
