use anyhow::Result;

use crate::app::KeyboardSession;
use crate::config::Config;
use crate::feedback::{BellHaptics, CommandSpeech, Feedback};
use crate::logging::{self, LogTarget, LOG_FILE};
use crate::store::{FilePresetStore, FileSettingsStore};
use crate::tui;

/// Opens the saved session and runs the terminal keyboard until the user quits.
pub fn run_keyboard_terminal(config: &Config, start_with_text_area: bool) -> Result<()> {
    logging::init(
        &config.ui.log_level,
        LogTarget::File(Config::config_dir()?.join(LOG_FILE)),
    )?;
    tracing::info!("Starting terminal keyboard");

    let speech = CommandSpeech::from_config(&config.speech);
    let speech_available = speech.program().is_some();
    let feedback = Feedback::new(Box::new(speech), Box::new(BellHaptics));

    let session = KeyboardSession::open(
        Box::new(FileSettingsStore::in_config_dir()?),
        Box::new(FilePresetStore::in_config_dir()?),
        feedback,
    );

    let mut state = tui::AppState::new(session, config.ui.show_help);
    state.show_text_area = start_with_text_area;
    if !speech_available {
        state.status = Some(tui::StatusMessage::Info(
            "No speech program found; spoken feedback is off".to_string(),
        ));
    }

    let mut terminal = tui::setup_terminal()?;
    state.key_release_supported = tui::key_release_supported();
    tracing::info!(
        "Key release reporting {}",
        if state.key_release_supported {
            "available"
        } else {
            "unavailable, key presses commit immediately"
        }
    );
    let result = tui::run_tui(&mut state, &mut terminal);
    tui::restore_terminal(terminal)?;

    if state.show_help != config.ui.show_help {
        let mut updated = config.clone();
        updated.ui.show_help = state.show_help;
        if let Err(e) = updated.save() {
            tracing::warn!("Failed to save help visibility: {:#}", e);
        }
    }

    if !state.session.text().is_empty() {
        println!("{}", state.session.text());
    }

    tracing::info!("Terminal keyboard closed");
    result
}
