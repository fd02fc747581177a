//! Speech backends.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

use super::{SpeechFeedback, Utterance};
use crate::config::SpeechConfig;

/// Programs probed, in order, when no speech program is configured.
const CANDIDATE_PROGRAMS: &[&str] = &["espeak-ng", "espeak", "say", "spd-say"];

/// Speaks through an external text-to-speech program.
///
/// Each announcement spawns the program with the text as its last argument.
/// A still-running child from the previous announcement is killed first, so
/// the most recent request wins.
#[derive(Debug)]
pub struct CommandSpeech {
    program: Option<PathBuf>,
    extra_args: Vec<String>,
    language: String,
    child: Option<Child>,
    warned: bool,
}

impl CommandSpeech {
    /// Builds a backend from the `[speech]` config section.
    ///
    /// When no program is configured the first candidate found on `PATH`
    /// is used. Without any program the backend logs once and stays silent.
    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Self {
        let program = config
            .program
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| CANDIDATE_PROGRAMS.iter().find_map(|p| find_in_path(p)));

        match &program {
            Some(path) => tracing::info!("Speech output via {}", path.display()),
            None => tracing::warn!("No speech program found; spoken feedback disabled"),
        }

        Self {
            program,
            extra_args: config.args.clone(),
            language: config.language.clone(),
            child: None,
            warned: false,
        }
    }

    /// Returns the program used for speech, if any.
    #[must_use]
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    fn voice_args(&self, program_name: &str, utterance: &Utterance) -> Vec<String> {
        let voice = utterance.voice;
        let words_per_minute = (175.0 * voice.rate).round().max(1.0);
        match program_name {
            "espeak" | "espeak-ng" => vec![
                "-v".to_string(),
                self.language.clone(),
                "-s".to_string(),
                format!("{words_per_minute}"),
                "-a".to_string(),
                format!("{}", (voice.volume * 200.0).round()),
                "-p".to_string(),
                format!("{}", (voice.pitch * 50.0).round().min(99.0)),
            ],
            "say" => vec!["-r".to_string(), format!("{words_per_minute}")],
            "spd-say" => vec![
                "-l".to_string(),
                self.language.clone(),
                "-r".to_string(),
                format!("{}", ((voice.rate - 1.0) * 50.0).round().clamp(-100.0, 100.0)),
            ],
            _ => Vec::new(),
        }
    }
}

impl SpeechFeedback for CommandSpeech {
    fn announce(&mut self, utterance: &Utterance) {
        self.cancel();

        let Some(program) = self.program.clone() else {
            return;
        };

        let program_name = program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let mut cmd = Command::new(&program);
        cmd.args(self.voice_args(&program_name, utterance))
            .args(&self.extra_args)
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match cmd.spawn() {
            Ok(child) => {
                tracing::debug!("Speaking {:?}", utterance.text);
                self.child = Some(child);
            }
            Err(e) => {
                if !self.warned {
                    tracing::warn!("Failed to run {}: {}", program.display(), e);
                    self.warned = true;
                }
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Speech backend that discards every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

impl SpeechFeedback for NullSpeech {
    fn announce(&mut self, _utterance: &Utterance) {}
}

/// Speech backend that records announcements.
///
/// Clones share the same log, so a caller can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    log: Rc<RefCell<Vec<Utterance>>>,
}

impl RecordingSpeech {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts announced so far, oldest first.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.log.borrow().iter().map(|u| u.text.clone()).collect()
    }

    /// Every recorded utterance.
    #[must_use]
    pub fn utterances(&self) -> Vec<Utterance> {
        self.log.borrow().clone()
    }
}

impl SpeechFeedback for RecordingSpeech {
    fn announce(&mut self, utterance: &Utterance) {
        self.log.borrow_mut().push(utterance.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoiceSettings;

    #[test]
    fn test_recording_speech_shares_log() {
        let recorder = RecordingSpeech::new();
        let mut owned = recorder.clone();
        owned.announce(&Utterance::new("A", VoiceSettings::default()));
        owned.announce(&Utterance::new("space", VoiceSettings::default()));

        assert_eq!(recorder.texts(), vec!["A", "space"]);
    }

    #[test]
    fn test_missing_program_is_silent() {
        let config = SpeechConfig {
            program: Some("/nonexistent/dwellboard-tts".to_string()),
            ..SpeechConfig::default()
        };
        let mut speech = CommandSpeech::from_config(&config);
        speech.announce(&Utterance::new("A", VoiceSettings::default()));
        speech.announce(&Utterance::new("B", VoiceSettings::default()));
        assert!(speech.child.is_none());
    }

    #[test]
    fn test_espeak_voice_args() {
        let config = SpeechConfig {
            program: Some("/usr/bin/espeak-ng".to_string()),
            language: "es".to_string(),
            ..SpeechConfig::default()
        };
        let speech = CommandSpeech::from_config(&config);
        assert_eq!(speech.program(), Some(Path::new("/usr/bin/espeak-ng")));

        let utterance = Utterance::new(
            "hola",
            VoiceSettings {
                rate: 2.0,
                volume: 0.5,
                pitch: 1.0,
            },
        );
        let args = speech.voice_args("espeak-ng", &utterance);
        assert_eq!(args, vec!["-v", "es", "-s", "350", "-a", "100", "-p", "50"]);
    }
}
