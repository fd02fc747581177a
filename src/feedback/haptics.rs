//! Haptic backends.
//!
//! Terminals cannot vibrate, so the interactive backend rings the terminal
//! bell instead.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use super::HapticFeedback;

/// Rings the terminal bell on every pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellHaptics;

impl HapticFeedback for BellHaptics {
    fn pulse(&mut self, _duration: Duration) {
        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            tracing::debug!("Terminal bell failed: {}", e);
        }
    }
}

/// Haptic backend that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHaptics;

impl HapticFeedback for NullHaptics {
    fn pulse(&mut self, _duration: Duration) {}
}

/// Haptic backend that records pulse durations. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    log: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingHaptics {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pulses requested so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }

    /// Durations of the pulses requested so far.
    #[must_use]
    pub fn pulses(&self) -> Vec<Duration> {
        self.log.borrow().clone()
    }
}

impl HapticFeedback for RecordingHaptics {
    fn pulse(&mut self, duration: Duration) {
        self.log.borrow_mut().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clones_share_log() {
        let recorder = RecordingHaptics::new();
        let mut boxed: Box<dyn HapticFeedback> = Box::new(recorder.clone());

        boxed.pulse(Duration::from_millis(50));
        boxed.pulse(Duration::from_millis(20));

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.pulses()[1], Duration::from_millis(20));
    }
}
