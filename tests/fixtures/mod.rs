//! Shared test fixtures for the integration and E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use dwellboard::feedback::{Feedback, RecordingHaptics, RecordingSpeech};
use dwellboard::models::DwellSettings;
use dwellboard::services::DwellController;
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;
use tempfile::TempDir;

/// Path to the dwellboard binary
pub fn dwellboard_bin() -> &'static str {
    env!("CARGO_BIN_EXE_dwellboard")
}

/// Creates a Command with an isolated config directory.
/// Pass the same directory to share state between commands in one test.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(dwellboard_bin());
    cmd.env("DWELLBOARD_CONFIG_DIR", config_dir);
    cmd.env_remove("DWELLBOARD_LOG");
    cmd.args(args);
    cmd
}

/// Runs the binary with an isolated config directory.
pub fn run(args: &[&str], config_dir: &Path) -> Output {
    isolated_command(args, config_dir)
        .output()
        .expect("Failed to execute command")
}

/// Fresh temporary config directory.
pub fn temp_config_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Asserts a successful exit, showing stderr otherwise.
pub fn assert_success(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(0),
        "Command should succeed. stderr: {}",
        stderr(output)
    );
}

/// Parses stdout as JSON.
pub fn parse_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("Should parse JSON output")
}

/// Milliseconds.
pub const fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Dwell settings with the given hold time and defaults otherwise.
pub fn dwell(hold_ms: u64) -> DwellSettings {
    DwellSettings {
        hold_time: ms(hold_ms),
        ..DwellSettings::default()
    }
}

/// Dwell settings in instant mode.
pub fn instant() -> DwellSettings {
    DwellSettings {
        instant_input: true,
        ..DwellSettings::default()
    }
}

/// Controller wired to recording feedback backends.
pub fn recorded_controller() -> (DwellController, RecordingSpeech, RecordingHaptics) {
    let speech = RecordingSpeech::new();
    let haptics = RecordingHaptics::new();
    let controller = DwellController::new(Feedback::new(
        Box::new(speech.clone()),
        Box::new(haptics.clone()),
    ));
    (controller, speech, haptics)
}
