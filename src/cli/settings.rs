//! Keyboard settings CLI commands.

use crate::cli::common::{load_settings, print_json, settings_store, CliError, CliResult};
use crate::models::{KeyOrdering, KeyboardSettings, PackingMode, ThemeMode};
use crate::store::SettingsStore;
use clap::{Args, Subcommand};

/// Keyboard settings commands
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Display current settings
    Show(SettingsShowArgs),
    /// Change one or more settings
    Set(SettingsSetArgs),
    /// Restore default settings
    Reset,
}

/// Display current settings
#[derive(Args, Debug)]
pub struct SettingsShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Change one or more settings
#[derive(Args, Debug, Default)]
pub struct SettingsSetArgs {
    /// Hold time in seconds (0.1 - 3.0)
    #[arg(long, value_name = "SECONDS")]
    hold_time: Option<f64>,

    /// Commit keys on press instead of after the hold time
    #[arg(long, value_name = "BOOL")]
    instant: Option<bool>,

    /// Speak committed keys
    #[arg(long, value_name = "BOOL")]
    sound: Option<bool>,

    /// Haptic pulse on commit
    #[arg(long, value_name = "BOOL")]
    vibration: Option<bool>,

    /// Theme (light, dark, high-contrast)
    #[arg(long, value_name = "THEME")]
    theme: Option<ThemeMode>,

    /// Key label size in percent (1 - 100)
    #[arg(long, value_name = "PERCENT")]
    font_size: Option<u8>,

    /// Text area font size in pixels (8 - 142)
    #[arg(long, value_name = "PX")]
    textarea_font_size: Option<u16>,

    /// Gap between keys (0 - 10)
    #[arg(long, value_name = "N")]
    spacing: Option<u8>,

    /// Key ordering (qwerty, abc)
    #[arg(long, value_name = "ORDERING")]
    layout: Option<KeyOrdering>,

    /// Packing mode (template, sides, row-count)
    #[arg(long, value_name = "MODE")]
    packing: Option<PackingMode>,

    /// Rows used by row-count packing
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Speech rate (0.1 - 3.0)
    #[arg(long, value_name = "RATE")]
    voice_rate: Option<f64>,

    /// Speech volume (0.0 - 1.0)
    #[arg(long, value_name = "VOLUME")]
    voice_volume: Option<f64>,

    /// Speech pitch (0.0 - 2.0)
    #[arg(long, value_name = "PITCH")]
    voice_pitch: Option<f64>,
}

impl SettingsArgs {
    /// Execute settings subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            SettingsCommand::Show(args) => args.execute(),
            SettingsCommand::Set(args) => args.execute(),
            SettingsCommand::Reset => reset(),
        }
    }
}

impl SettingsShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let settings = load_settings(&settings_store()?)?;

        if self.json {
            print_json(&settings)
        } else {
            output_human_readable(&settings);
            Ok(())
        }
    }
}

impl SettingsSetArgs {
    /// Applies the given options to `settings`. Returns false when no option was given.
    fn apply(&self, settings: &mut KeyboardSettings) -> bool {
        let mut changed = false;

        macro_rules! set {
            ($($arg:ident => $field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = self.$arg {
                        settings.$field = value;
                        changed = true;
                    }
                )+
            };
        }

        set!(
            hold_time => hold_time,
            instant => instant_input,
            sound => sound_enabled,
            vibration => vibration_enabled,
            theme => theme,
            font_size => font_size,
            textarea_font_size => textarea_font_size,
            spacing => spacing,
            layout => layout,
            packing => packing,
            rows => row_count,
            voice_rate => voice_rate,
            voice_volume => voice_volume,
            voice_pitch => voice_pitch,
        );

        changed
    }

    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let mut store = settings_store()?;
        let mut settings = load_settings(&store)?;

        if !self.apply(&mut settings) {
            return Err(CliError::validation(
                "At least one setting must be specified (see `settings set --help`)",
            ));
        }

        settings
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        store
            .save(&settings)
            .map_err(|e| CliError::io(format!("Failed to save settings: {e:#}")))?;

        println!("Settings updated successfully.");
        Ok(())
    }
}

fn reset() -> CliResult<()> {
    let mut store = settings_store()?;
    store
        .save(&KeyboardSettings::default())
        .map_err(|e| CliError::io(format!("Failed to save settings: {e:#}")))?;

    println!("Settings reset to defaults.");
    Ok(())
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn output_human_readable(settings: &KeyboardSettings) {
    println!("Input:");
    println!("  Hold time:        {:.1}s", settings.hold_time);
    println!("  Instant input:    {}", on_off(settings.instant_input));
    println!("  Sound:            {}", on_off(settings.sound_enabled));
    println!("  Vibration:        {}", on_off(settings.vibration_enabled));
    println!();
    println!("Voice:");
    println!("  Rate:             {:.1}", settings.voice_rate);
    println!("  Volume:           {:.1}", settings.voice_volume);
    println!("  Pitch:            {:.1}", settings.voice_pitch);
    println!();
    println!("Keyboard:");
    println!("  Layout:           {}", settings.layout);
    println!("  Packing:          {}", settings.packing);
    println!("  Rows:             {}", settings.row_count);
    println!("  Theme:            {}", settings.theme);
    println!("  Spacing:          {}", settings.spacing);
    println!("  Key font size:    {}%", settings.font_size);
    println!("  Text font size:   {}px", settings.textarea_font_size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_given_options() {
        let args = SettingsSetArgs {
            hold_time: Some(0.5),
            packing: Some(PackingMode::RowCount),
            rows: Some(3),
            ..SettingsSetArgs::default()
        };

        let mut settings = KeyboardSettings::default();
        assert!(args.apply(&mut settings));
        assert!((settings.hold_time - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.packing, PackingMode::RowCount);
        assert_eq!(settings.row_count, 3);
        assert_eq!(settings.layout, KeyOrdering::Qwerty);
    }

    #[test]
    fn test_apply_without_options() {
        let mut settings = KeyboardSettings::default();
        assert!(!SettingsSetArgs::default().apply(&mut settings));
        assert_eq!(settings, KeyboardSettings::default());
    }
}
