//! Key identity and the text action each key resolves to.

use crate::constants::{BACKSPACE_GLYPH, SPACE_GLYPH};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key on the on-screen keyboard.
///
/// Keys carry no state of their own; the dwell controller tracks timers by
/// key value. The two special keys are the space and backspace sentinels.
///
/// Keys serialize as their display glyph (`"A"`, `"␣"`, `"⌫"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Key {
    /// A literal character key
    Char(char),
    /// Appends a single space
    Space,
    /// Removes the last character
    Backspace,
}

/// Mutation of the output text produced by a committed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "char", rename_all = "kebab-case")]
pub enum TextAction {
    /// Append a literal character
    Append(char),
    /// Append a single space
    AppendSpace,
    /// Remove the last character (no-op on empty text)
    DeleteLast,
}

impl Key {
    /// Returns true for the space and backspace sentinels.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Space | Self::Backspace)
    }

    /// Glyph drawn on the key face.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Char(c) => c,
            Self::Space => SPACE_GLYPH,
            Self::Backspace => BACKSPACE_GLYPH,
        }
    }

    /// Semantic name announced by speech feedback.
    #[must_use]
    pub fn spoken_name(self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Space => "space".to_string(),
            Self::Backspace => "delete".to_string(),
        }
    }

    /// Accessible label for screen readers and help text.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Char(c) => format!("Key {c}"),
            Self::Space => "Space key".to_string(),
            Self::Backspace => "Delete key".to_string(),
        }
    }

    /// Resolves the text mutation this key performs when committed.
    #[must_use]
    pub const fn action(self) -> TextAction {
        match self {
            Self::Char(c) => TextAction::Append(c),
            Self::Space => TextAction::AppendSpace,
            Self::Backspace => TextAction::DeleteLast,
        }
    }

    /// Parses a key from its glyph or from a special key name.
    ///
    /// Accepts a single character, the glyphs `␣` / `⌫`, or the names
    /// `space`, `backspace`, `delete` and `bksp` (case-insensitive).
    /// Single letters are upper-cased to match the key faces.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed.to_lowercase().as_str() {
            "space" => return Ok(Self::Space),
            "backspace" | "delete" | "bksp" => return Ok(Self::Backspace),
            _ => {}
        }

        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(SPACE_GLYPH), None) => Ok(Self::Space),
            (Some(BACKSPACE_GLYPH), None) => Ok(Self::Backspace),
            (Some(c), None) if !c.is_control() && !c.is_whitespace() => {
                let mut upper = c.to_uppercase();
                match (upper.next(), upper.next()) {
                    (Some(u), None) => Ok(Self::Char(u)),
                    _ => Ok(Self::Char(c)),
                }
            }
            _ => anyhow::bail!(
                "Invalid key '{}': expected a single character, 'space' or 'backspace'",
                input
            ),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.glyph().to_string()
    }
}

impl TryFrom<String> for Key {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}
