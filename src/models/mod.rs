//! Data models for keys, settings, presets, and packed layouts.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of UI and business logic.

pub mod grid;
pub mod key;
pub mod preset;
pub mod settings;
pub mod text;

// Re-export all model types
pub use grid::KeyGrid;
pub use key::{Key, TextAction};
pub use preset::{builtin_presets, Preset};
pub use settings::{
    DwellSettings, KeyOrdering, KeyboardSettings, PackingMode, ThemeMode, VoiceSettings,
};
pub use text::TextBuffer;
