//! Theme system for consistent UI colors across light, dark and
//! high-contrast modes.

use ratatui::style::Color;

use crate::models::ThemeMode;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Primary color for borders, titles, and emphasis
    pub primary: Color,
    /// Accent color for highlights, selections, and focus states
    pub accent: Color,
    /// Success state color for confirmations
    pub success: Color,
    /// Error state color for errors and destructive actions
    pub error: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Muted text color for help text and dim content
    pub text_muted: Color,

    // Backgrounds
    /// Main background color
    pub background: Color,
    /// Highlight/selection background color
    pub highlight_bg: Color,

    // Keys
    /// Key face color
    pub key_bg: Color,
    /// Key border color
    pub key_border: Color,
    /// Held key face color
    pub active: Color,
    /// Keyboard border color while a commit flash is visible
    pub flash: Color,
}

impl Theme {
    /// Returns the theme for a settings theme mode.
    #[must_use]
    pub const fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::HighContrast => Self::high_contrast(),
        }
    }

    /// Dark keys, white background.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0), // Dark orange for visibility
            success: Color::Rgb(0, 128, 0),
            error: Color::Red,

            text: Color::Black,
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),

            key_bg: Color::Rgb(250, 250, 250),
            key_border: Color::Rgb(200, 200, 200),
            active: Color::Rgb(190, 215, 255),
            flash: Color::Blue,
        }
    }

    /// Light keys, dark background.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,

            text: Color::White,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,

            key_bg: Color::Rgb(55, 65, 81),
            key_border: Color::Rgb(75, 85, 99),
            active: Color::Rgb(30, 90, 160),
            flash: Color::Cyan,
        }
    }

    /// Black text on yellow keys.
    #[must_use]
    pub const fn high_contrast() -> Self {
        Self {
            primary: Color::Yellow,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::LightRed,

            text: Color::Black,
            text_muted: Color::Yellow,

            background: Color::Black,
            highlight_bg: Color::Rgb(60, 60, 0),

            key_bg: Color::Rgb(253, 224, 71),
            key_border: Color::Rgb(250, 204, 21),
            active: Color::White,
            flash: Color::White,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
