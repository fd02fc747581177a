//! Output text buffer mutated by committed keys.

use crate::models::key::TextAction;

/// The text typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Creates a buffer holding `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Applies a committed text action.
    pub fn apply(&mut self, action: TextAction) {
        match action {
            TextAction::Append(c) => self.text.push(c),
            TextAction::AppendSpace => self.text.push(' '),
            TextAction::DeleteLast => {
                self.text.pop();
            }
        }
    }

    /// Current text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true when nothing has been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clears the text.
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
