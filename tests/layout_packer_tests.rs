//! Integration tests for the layout packer.

use dwellboard::models::{Key, KeyGrid, KeyOrdering, PackingMode};
use dwellboard::services::{pack, pack_rows, regular_keys};

fn chars(s: &str) -> Vec<Key> {
    s.chars().map(Key::Char).collect()
}

fn regular_in_order(grid: &KeyGrid) -> Vec<Key> {
    grid.keys().filter(|k| !k.is_special()).collect()
}

fn count(grid: &KeyGrid, key: Key) -> usize {
    grid.keys().filter(|k| *k == key).count()
}

#[test]
fn test_nine_keys_three_rows() {
    let grid = pack_rows(&chars("ABCDEFGHI"), 3).unwrap();
    assert_eq!(
        grid.rows(),
        &[
            chars("ABC"),
            chars("DEF"),
            chars("GHI"),
            vec![Key::Backspace, Key::Space],
        ]
    );
}

#[test]
fn test_every_row_count_keeps_all_keys_in_order() {
    for ordering in [KeyOrdering::Qwerty, KeyOrdering::Abc] {
        let keys = regular_keys(ordering);
        for rows in 1..=keys.len() {
            let grid = pack(ordering, PackingMode::RowCount, rows).unwrap();
            assert_eq!(regular_in_order(&grid), keys, "{ordering} with {rows} rows");
            assert_eq!(count(&grid, Key::Space), 1);
            assert_eq!(count(&grid, Key::Backspace), 1);

            let per_row = keys.len().div_ceil(rows);
            assert!(grid.rows().iter().all(|row| row.len() <= per_row.max(2)));
        }
    }
}

#[test]
fn test_row_count_contract_for_any_key_count() {
    let alphabet: Vec<Key> = chars("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789ÁÉÍÓ");
    for n in 1..=alphabet.len() {
        let keys = &alphabet[..n];
        for rows in 1..=n {
            let grid = pack_rows(keys, rows).unwrap();
            assert_eq!(regular_in_order(&grid), keys, "n={n} rows={rows}");

            let per_row = n.div_ceil(rows);
            let letter_rows = n.div_ceil(per_row);
            let last_row_len = n - (letter_rows - 1) * per_row;
            let specials_overflow = per_row - last_row_len < 2;
            let expected = letter_rows + usize::from(specials_overflow);

            assert!(letter_rows <= rows, "n={n} rows={rows}");
            assert_eq!(grid.row_count(), expected, "n={n} rows={rows}");
            assert_eq!(grid.rows()[letter_rows - 1][0], keys[(letter_rows - 1) * per_row]);
        }
    }
}

#[test]
fn test_specials_fill_last_row_before_new_row() {
    // 27 keys in 4 rows: 7, 7, 7, 6 -> one free slot for backspace
    let grid = pack(KeyOrdering::Abc, PackingMode::RowCount, 4).unwrap();
    assert_eq!(grid.row_count(), 5);
    assert_eq!(grid.rows()[3].last(), Some(&Key::Backspace));
    assert_eq!(grid.rows()[4], vec![Key::Space]);

    // 27 keys in 2 rows: 14, 13 -> backspace fits, space does not
    let grid = pack(KeyOrdering::Abc, PackingMode::RowCount, 2).unwrap();
    assert_eq!(grid.rows()[1].len(), 14);
    assert_eq!(grid.rows()[1].last(), Some(&Key::Backspace));
    assert_eq!(grid.rows()[2], vec![Key::Space]);
}

#[test]
fn test_one_row_per_key() {
    let grid = pack(KeyOrdering::Qwerty, PackingMode::RowCount, 27).unwrap();
    assert_eq!(grid.row_count(), 28);
    assert!(grid.rows()[..27].iter().all(|row| row.len() == 1));
    assert_eq!(grid.rows()[27], vec![Key::Backspace, Key::Space]);
}

#[test]
fn test_single_row() {
    let grid = pack(KeyOrdering::Qwerty, PackingMode::RowCount, 1).unwrap();
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.rows()[0].len(), 27);
    assert_eq!(grid.rows()[1], vec![Key::Backspace, Key::Space]);
}

#[test]
fn test_template_ignores_row_count() {
    for ordering in [KeyOrdering::Qwerty, KeyOrdering::Abc] {
        for mode in [PackingMode::Template, PackingMode::Sides] {
            let expected = pack(ordering, mode, 1).unwrap();
            for rows in [0, 2, 4, 100] {
                assert_eq!(pack(ordering, mode, rows).unwrap(), expected);
            }
            assert_eq!(regular_in_order(&expected), regular_keys(ordering));
        }
    }
}

#[test]
fn test_templates_are_two_fixed_grids() {
    let qwerty = pack(KeyOrdering::Qwerty, PackingMode::Template, 4).unwrap();
    let abc = pack(KeyOrdering::Abc, PackingMode::Template, 4).unwrap();
    assert_ne!(qwerty, abc);
    assert_eq!(qwerty.to_text().lines().next(), Some("Q W E R T Y U I O P"));
    assert_eq!(abc.to_text().lines().next(), Some("A B C D E F G H I"));
    assert_eq!(qwerty.rows().last().unwrap(), &vec![Key::Space, Key::Backspace]);
}

#[test]
fn test_sides_template_flanks_last_row() {
    let grid = pack(KeyOrdering::Qwerty, PackingMode::Sides, 4).unwrap();
    let last = grid.rows().last().unwrap();
    assert_eq!(last.first(), Some(&Key::Space));
    assert_eq!(last.last(), Some(&Key::Backspace));
}

#[test]
fn test_pack_is_idempotent() {
    for mode in [PackingMode::Template, PackingMode::Sides, PackingMode::RowCount] {
        assert_eq!(
            pack(KeyOrdering::Abc, mode, 5).unwrap(),
            pack(KeyOrdering::Abc, mode, 5).unwrap()
        );
    }
}

#[test]
fn test_invalid_inputs_fail_fast() {
    assert!(pack(KeyOrdering::Qwerty, PackingMode::RowCount, 0).is_err());
    assert!(pack_rows(&[], 3).is_err());
    assert!(pack_rows(&[Key::Char('A'), Key::Space], 1).is_err());
}
