//! Packed key grid.

use crate::models::key::Key;
use serde::Serialize;

/// An ordered sequence of key rows.
///
/// Grids are derived views: the packer rebuilds them from scratch whenever
/// the ordering or packing parameters change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyGrid {
    rows: Vec<Vec<Key>>,
}

impl KeyGrid {
    /// Wraps already packed rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<Vec<Key>>) -> Self {
        Self { rows }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// All keys in reading order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Key at `(row, col)`, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Key> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Position of `key` in the grid.
    #[must_use]
    pub fn position_of(&self, key: Key) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row_idx, row)| {
            row.iter()
                .position(|k| *k == key)
                .map(|col_idx| (row_idx, col_idx))
        })
    }

    /// Renders the grid as lines of space-separated glyphs.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|k| k.glyph().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KeyGrid {
        KeyGrid::from_rows(vec![
            vec![Key::Char('A'), Key::Char('B')],
            vec![Key::Char('C'), Key::Backspace, Key::Space],
        ])
    }

    #[test]
    fn test_dimensions() {
        let grid = sample();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.max_row_len(), 3);
        assert_eq!(grid.keys().count(), 5);
    }

    #[test]
    fn test_lookup() {
        let grid = sample();
        assert_eq!(grid.get(1, 1), Some(Key::Backspace));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.position_of(Key::Space), Some((1, 2)));
        assert_eq!(grid.position_of(Key::Char('Z')), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(sample().to_text(), "A B\nC ⌫ ␣");
    }
}
