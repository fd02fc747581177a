//! Print the packed key grid.

use crate::cli::common::{load_settings, print_json, settings_store, CliError, CliResult};
use crate::models::{KeyGrid, KeyOrdering, PackingMode};
use crate::services::pack;
use clap::Args;
use serde::Serialize;

/// Print the packed keyboard layout
#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Key ordering (qwerty, abc). Defaults to the saved setting
    #[arg(long, value_name = "ORDERING")]
    pub ordering: Option<KeyOrdering>,

    /// Packing mode (template, sides, row-count). Defaults to the saved setting
    #[arg(long, value_name = "MODE")]
    pub mode: Option<PackingMode>,

    /// Number of rows for row-count packing. Implies --mode row-count when
    /// no mode is given
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output of the layout command
#[derive(Debug, Serialize)]
struct LayoutOutput<'a> {
    ordering: KeyOrdering,
    mode: PackingMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_count: Option<usize>,
    key_count: usize,
    rows: &'a KeyGrid,
}

impl LayoutArgs {
    /// Execute the layout command
    pub fn execute(&self) -> CliResult<()> {
        let saved = load_settings(&settings_store()?)?;

        let ordering = self.ordering.unwrap_or(saved.layout);
        let mode = match (self.mode, self.rows) {
            (Some(mode), _) => mode,
            (None, Some(_)) => PackingMode::RowCount,
            (None, None) => saved.packing,
        };
        let row_count = self.rows.unwrap_or(saved.row_count);

        if mode != PackingMode::RowCount && self.rows.is_some() {
            return Err(CliError::validation(format!(
                "--rows only applies to row-count packing (got --mode {mode})"
            )));
        }

        let max_rows = ordering.regular_key_count();
        if mode == PackingMode::RowCount && (row_count == 0 || row_count > max_rows) {
            return Err(CliError::validation(format!(
                "Row count must be between 1 and {max_rows} for the {ordering} layout (got {row_count})"
            )));
        }

        let grid = pack(ordering, mode, row_count)
            .map_err(|e| CliError::validation(format!("Failed to pack layout: {e:#}")))?;
        tracing::debug!("Packed {} rows for {} / {}", grid.row_count(), ordering, mode);

        if self.json {
            print_json(&LayoutOutput {
                ordering,
                mode,
                row_count: (mode == PackingMode::RowCount).then_some(row_count),
                key_count: grid.keys().count(),
                rows: &grid,
            })
        } else {
            println!("{}", grid.to_text());
            Ok(())
        }
    }
}
