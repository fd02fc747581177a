//! Dwellboard - dwell-activated on-screen keyboard for the terminal
//!
//! Keys commit only after being held for a configurable time, so unsteady
//! pointing does not produce accidental input.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dwellboard::cli::{CliResult, LayoutArgs, PresetArgs, SettingsArgs, SimulateArgs};
use dwellboard::config::Config;
use dwellboard::constants::APP_BINARY_NAME;
use dwellboard::logging::{self, LogTarget};

/// Dwellboard - dwell-activated on-screen keyboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Start with the text area hidden
    #[arg(long)]
    hide_text: bool,

    /// Headless command (runs the terminal keyboard when omitted)
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the packed keyboard layout
    Layout(LayoutArgs),
    /// Show or change keyboard settings
    Settings(SettingsArgs),
    /// Manage settings presets
    Preset(PresetArgs),
    /// Replay key events through the dwell controller
    Simulate(SimulateArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Layout(args) => args.execute(),
            Self::Settings(args) => args.execute(),
            Self::Preset(args) => args.execute(),
            Self::Simulate(args) => args.execute(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        // stdout carries command output; diagnostics go to stderr
        if let Err(e) = logging::init("warn", LogTarget::Stderr) {
            eprintln!("Warning: failed to initialize logging: {e:#}");
        }

        if let Err(e) = command.execute() {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!();
            eprintln!("Fix or remove the configuration file, or run with a clean config directory:");
            eprintln!("  DWELLBOARD_CONFIG_DIR=/tmp/dwellboard {APP_BINARY_NAME}");
            std::process::exit(1);
        }
    };

    dwellboard::app::run_keyboard_terminal(&config, !cli.hide_text)
}
