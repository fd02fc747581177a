//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the fixed timing intervals of the
//! dwell engine.

use std::time::Duration;

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Dwellboard";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "dwellboard";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "DWELLBOARD_CONFIG_DIR";

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "DWELLBOARD_LOG";

/// Glyph shown on the space key.
pub const SPACE_GLYPH: char = '␣';

/// Glyph shown on the backspace key.
pub const BACKSPACE_GLYPH: char = '⌫';

/// Minimum interval between two announcements of the same special key.
pub const GRACE_PERIOD: Duration = Duration::from_millis(500);

/// How long the commit flash stays visible.
pub const FLASH_DURATION: Duration = Duration::from_millis(150);

/// Haptic pulse length requested on every commit.
pub const VIBRATION_DURATION: Duration = Duration::from_millis(50);
