//! Shared CLI error type and exit codes.

use std::fmt;

use crate::models::KeyboardSettings;
use crate::store::{FileSettingsStore, SettingsStore};

/// Process exit codes used by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or rejected operation
    Validation = 1,
    /// Filesystem or serialization failure
    Io = 2,
    /// Named item does not exist
    NotFound = 3,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code to terminate with
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Invalid input or rejected operation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// Filesystem or serialization failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Named item does not exist.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::NotFound,
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize output to JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Opens the settings file in the configuration directory.
pub fn settings_store() -> CliResult<FileSettingsStore> {
    FileSettingsStore::in_config_dir()
        .map_err(|e| CliError::io(format!("Failed to locate configuration directory: {e:#}")))
}

/// Loads the saved settings.
///
/// A corrupt or invalid settings file is reported as a validation error so
/// the user can run `settings reset`.
pub fn load_settings(store: &FileSettingsStore) -> CliResult<KeyboardSettings> {
    store.load().map_err(|e| {
        CliError::validation(format!(
            "Failed to load settings from {}: {e:#}",
            store.path().display()
        ))
    })
}
