//! Layout packing: turns a key ordering into rows of keys.
//!
//! Two policies are supported. Template modes return hand-authored grids for
//! each ordering. Row-count mode slices the ordering's regular keys into a
//! caller-chosen number of rows and then places backspace and space, using
//! spare capacity in the last row before opening a trailing row.

use anyhow::Result;

use crate::models::{Key, KeyGrid, KeyOrdering, PackingMode};

const QWERTY_BOTTOM: &[&str] = &["QWERTYUIOP", "ASDFGHJKLÑ", "ZXCVBNM", "␣⌫"];
const QWERTY_SIDES: &[&str] = &["QWERTYUIOP", "ASDFGHJKLÑ", "␣ZXCVBNM⌫"];
const ABC_BOTTOM: &[&str] = &["ABCDEFGHI", "JKLMNÑOPQ", "RSTUVWXYZ", "␣⌫"];
const ABC_SIDES: &[&str] = &["ABCDEFGHI", "JKLMNÑOPQ", "␣RSTUVWXYZ⌫"];

fn key_from_glyph(c: char) -> Key {
    match c {
        crate::constants::SPACE_GLYPH => Key::Space,
        crate::constants::BACKSPACE_GLYPH => Key::Backspace,
        other => Key::Char(other),
    }
}

fn grid_from_template(rows: &[&str]) -> KeyGrid {
    KeyGrid::from_rows(
        rows.iter()
            .map(|row| row.chars().map(key_from_glyph).collect())
            .collect(),
    )
}

/// Returns the fixed template grid for an ordering.
///
/// `sides` selects the variant with space and backspace flanking the last
/// letter row instead of sitting on their own bottom row.
#[must_use]
pub fn template(ordering: KeyOrdering, sides: bool) -> KeyGrid {
    let rows = match (ordering, sides) {
        (KeyOrdering::Qwerty, false) => QWERTY_BOTTOM,
        (KeyOrdering::Qwerty, true) => QWERTY_SIDES,
        (KeyOrdering::Abc, false) => ABC_BOTTOM,
        (KeyOrdering::Abc, true) => ABC_SIDES,
    };
    grid_from_template(rows)
}

/// Flat sequence of the regular (non-special) keys of an ordering.
#[must_use]
pub fn regular_keys(ordering: KeyOrdering) -> Vec<Key> {
    ordering.letters().chars().map(Key::Char).collect()
}

/// Packs `ordering` according to `mode`.
///
/// `row_count` is only consulted in [`PackingMode::RowCount`].
///
/// # Errors
///
/// Returns an error in row-count mode when `row_count` is zero.
pub fn pack(ordering: KeyOrdering, mode: PackingMode, row_count: usize) -> Result<KeyGrid> {
    match mode {
        PackingMode::Template => Ok(template(ordering, false)),
        PackingMode::Sides => Ok(template(ordering, true)),
        PackingMode::RowCount => pack_rows(&regular_keys(ordering), row_count),
    }
}

/// Repacks regular keys into at most `row_count` rows and places the special
/// keys.
///
/// Each row holds `per_row = ceil(n / row_count)` keys except possibly the
/// last. If the last row has room, backspace is appended to it, followed by
/// space if room remains. Special keys that do not fit form one trailing row,
/// backspace first.
///
/// There are `ceil(n / per_row)` letter rows, which can be fewer than
/// `row_count`: for 27 keys, `row_count` 20 gives 2 keys per row and so 14
/// letter rows. The grid has that many rows, plus one when a special key
/// overflows.
///
/// # Errors
///
/// Returns an error if `row_count` is zero, `keys` is empty, or `keys`
/// already contains a special key.
pub fn pack_rows(keys: &[Key], row_count: usize) -> Result<KeyGrid> {
    anyhow::ensure!(row_count > 0, "Row count must be at least 1 (got 0)");
    anyhow::ensure!(!keys.is_empty(), "Cannot pack an empty key ordering");
    if let Some(special) = keys.iter().find(|k| k.is_special()) {
        anyhow::bail!(
            "Key ordering must contain regular keys only, found special key {}",
            special
        );
    }

    let per_row = keys.len().div_ceil(row_count);
    let mut rows: Vec<Vec<Key>> = keys.chunks(per_row).map(<[Key]>::to_vec).collect();

    let mut overflow = Vec::new();
    if let Some(last) = rows.last_mut() {
        for special in [Key::Backspace, Key::Space] {
            if last.len() < per_row {
                last.push(special);
            } else {
                overflow.push(special);
            }
        }
    }

    if !overflow.is_empty() {
        rows.push(overflow);
    }

    Ok(KeyGrid::from_rows(rows))
}
