//! CLI command handlers for Dwellboard.
//!
//! This module provides headless, scriptable access to the layout packer,
//! the saved settings and presets, and the dwell controller.

pub mod common;
pub mod layout;
pub mod preset;
pub mod settings;
pub mod simulate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use layout::LayoutArgs;
pub use preset::PresetArgs;
pub use settings::SettingsArgs;
pub use simulate::SimulateArgs;
