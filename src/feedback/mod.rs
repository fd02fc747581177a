//! Speech and haptic feedback collaborators.
//!
//! The dwell controller talks to feedback backends through the
//! [`SpeechFeedback`] and [`HapticFeedback`] traits. Backends are best-effort:
//! a missing speech program or an unwritable terminal degrades to a no-op
//! and never blocks a commit.

pub mod haptics;
pub mod speech;

use std::time::Duration;

use crate::models::VoiceSettings;

pub use haptics::{BellHaptics, NullHaptics, RecordingHaptics};
pub use speech::{CommandSpeech, NullSpeech, RecordingSpeech};

/// A request to speak some text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak
    pub text: String,
    /// Voice parameters
    pub voice: VoiceSettings,
}

impl Utterance {
    /// Creates an utterance.
    #[must_use]
    pub fn new(text: impl Into<String>, voice: VoiceSettings) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}

/// Spoken feedback.
///
/// Requests are fire-and-forget. A new announcement interrupts any
/// utterance still playing.
pub trait SpeechFeedback {
    /// Speaks `utterance`, cancelling whatever is currently playing.
    fn announce(&mut self, utterance: &Utterance);

    /// Stops any utterance still playing.
    fn cancel(&mut self) {}
}

/// Vibration-style feedback.
pub trait HapticFeedback {
    /// Emits a pulse of roughly `duration`.
    fn pulse(&mut self, duration: Duration);
}

/// Feedback backends owned by a dwell controller.
pub struct Feedback {
    /// Speech backend
    pub speech: Box<dyn SpeechFeedback>,
    /// Haptic backend
    pub haptics: Box<dyn HapticFeedback>,
}

impl Feedback {
    /// Bundles the given backends.
    #[must_use]
    pub fn new(speech: Box<dyn SpeechFeedback>, haptics: Box<dyn HapticFeedback>) -> Self {
        Self { speech, haptics }
    }

    /// Feedback that does nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Box::new(NullSpeech), Box::new(NullHaptics))
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::silent()
    }
}
