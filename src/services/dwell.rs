//! Dwell-activation input engine.
//!
//! [`DwellController`] turns raw press/release signals into committed text
//! mutations. A press starts a per-key timer; the matching release commits
//! only when the key was held for at least the configured hold time. In
//! instant mode the press itself commits.
//!
//! Settings are passed into every call rather than captured, and the
//! settings given to `release` are the ones that decide the outcome of a
//! release. A key that already committed on press in instant mode never
//! commits again on its release.
//!
//! Speech for the special keys is throttled by a grace period so that rapid
//! repeated space or backspace activations are announced once. The grace
//! period only gates speech; the text is always mutated.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::constants::{FLASH_DURATION, GRACE_PERIOD, VIBRATION_DURATION};
use crate::feedback::{Feedback, Utterance};
use crate::models::{DwellSettings, Key, TextAction, TextBuffer};

/// A committed key activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    /// Key that was committed
    pub key: Key,
    /// Text mutation applied
    pub action: TextAction,
    /// Whether the key name was spoken
    pub announced: bool,
}

/// Pending press of a single key.
#[derive(Debug, Clone, Copy)]
struct KeyTimer {
    pressed_at: Instant,
    committed_on_press: bool,
}

type CommitListener = Box<dyn FnMut(&Commit)>;
type ActiveKeyListener = Box<dyn FnMut(Option<Key>)>;

/// Tracks key timers and commits qualifying activations.
///
/// Owned by the UI loop; every operation runs to completion synchronously.
pub struct DwellController {
    timers: HashMap<Key, KeyTimer>,
    last_announced: HashMap<Key, Instant>,
    active_key: Option<Key>,
    flash_until: Option<Instant>,
    text: TextBuffer,
    feedback: Feedback,
    commit_listeners: Vec<CommitListener>,
    active_listeners: Vec<ActiveKeyListener>,
}

impl std::fmt::Debug for DwellController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DwellController")
            .field("pending", &self.timers.keys().collect::<Vec<_>>())
            .field("active_key", &self.active_key)
            .field("text", &self.text.as_str())
            .finish_non_exhaustive()
    }
}

impl DwellController {
    /// Creates a controller with an empty text buffer.
    #[must_use]
    pub fn new(feedback: Feedback) -> Self {
        Self::with_text(feedback, TextBuffer::new())
    }

    /// Creates a controller that edits `text`.
    #[must_use]
    pub fn with_text(feedback: Feedback, text: TextBuffer) -> Self {
        Self {
            timers: HashMap::new(),
            last_announced: HashMap::new(),
            active_key: None,
            flash_until: None,
            text,
            feedback,
            commit_listeners: Vec::new(),
            active_listeners: Vec::new(),
        }
    }

    /// Registers a callback invoked once per commit.
    pub fn on_commit(&mut self, callback: impl FnMut(&Commit) + 'static) {
        self.commit_listeners.push(Box::new(callback));
    }

    /// Registers a callback invoked when the held key changes.
    pub fn on_active_key_changed(&mut self, callback: impl FnMut(Option<Key>) + 'static) {
        self.active_listeners.push(Box::new(callback));
    }

    /// Starts a press of `key`.
    ///
    /// Ignored while a press of the same key is already pending. In instant
    /// mode the key commits immediately and the commit is returned.
    pub fn press(&mut self, key: Key, now: Instant, settings: &DwellSettings) -> Option<Commit> {
        if self.timers.contains_key(&key) {
            tracing::trace!("Ignoring repeated press of {}", key);
            return None;
        }

        self.timers.insert(
            key,
            KeyTimer {
                pressed_at: now,
                committed_on_press: settings.instant_input,
            },
        );
        self.set_active_key(Some(key));

        if settings.instant_input {
            Some(self.commit(key, now, settings))
        } else {
            None
        }
    }

    /// Ends a press of `key`.
    ///
    /// Ignored when no press of `key` is pending. Otherwise the timer is
    /// dropped and, outside instant mode, the key commits when it was held
    /// for at least `settings.hold_time`.
    pub fn release(&mut self, key: Key, now: Instant, settings: &DwellSettings) -> Option<Commit> {
        let Some(timer) = self.timers.remove(&key) else {
            tracing::trace!("Ignoring release of {} without a press", key);
            return None;
        };

        if self.active_key == Some(key) {
            self.set_active_key(None);
        }

        let held = now.saturating_duration_since(timer.pressed_at);
        if settings.instant_input || timer.committed_on_press {
            return None;
        }

        if held >= settings.hold_time {
            Some(self.commit(key, now, settings))
        } else {
            tracing::debug!(
                "Released {} after {:?}, below hold time {:?}",
                key,
                held,
                settings.hold_time
            );
            None
        }
    }

    /// Commits `key` without a press/release pair.
    ///
    /// Used for synthetic activations such as scanning or keyboards that
    /// cannot report key releases.
    pub fn activate(&mut self, key: Key, now: Instant, settings: &DwellSettings) -> Commit {
        self.commit(key, now, settings)
    }

    /// Speaks the whole text, if sound is enabled and there is any.
    ///
    /// Returns true when an announcement was requested.
    pub fn read_aloud(&mut self, settings: &DwellSettings) -> bool {
        let text = self.text.as_str().trim();
        if !settings.sound_enabled || text.is_empty() {
            return false;
        }

        let utterance = Utterance::new(text, settings.voice);
        self.feedback.speech.announce(&utterance);
        true
    }

    /// Key currently shown as held, if any.
    #[must_use]
    pub const fn active_key(&self) -> Option<Key> {
        self.active_key
    }

    /// Returns true while a press of `key` is pending.
    #[must_use]
    pub fn is_pending(&self, key: Key) -> bool {
        self.timers.contains_key(&key)
    }

    /// How long `key` has been held, if it is pending.
    #[must_use]
    pub fn held_for(&self, key: Key, now: Instant) -> Option<Duration> {
        self.timers
            .get(&key)
            .map(|t| now.saturating_duration_since(t.pressed_at))
    }

    /// Returns true while the commit flash is visible.
    #[must_use]
    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    /// Text typed so far.
    #[must_use]
    pub const fn text(&self) -> &TextBuffer {
        &self.text
    }

    /// Mutable access to the text, for clearing or external edits.
    pub fn text_mut(&mut self) -> &mut TextBuffer {
        &mut self.text
    }

    /// Drops every pending press without committing.
    pub fn release_all(&mut self) {
        self.timers.clear();
        if self.active_key.is_some() {
            self.set_active_key(None);
        }
    }

    fn set_active_key(&mut self, key: Option<Key>) {
        self.active_key = key;
        for listener in &mut self.active_listeners {
            listener(key);
        }
    }

    fn commit(&mut self, key: Key, now: Instant, settings: &DwellSettings) -> Commit {
        let action = key.action();
        self.text.apply(action);
        self.flash_until = Some(now + FLASH_DURATION);

        let announced = settings.sound_enabled && self.announce_key(key, now, settings);

        if settings.vibration_enabled {
            self.feedback.haptics.pulse(VIBRATION_DURATION);
        }

        let commit = Commit {
            key,
            action,
            announced,
        };
        tracing::debug!("Committed {} ({:?})", key, action);

        for listener in &mut self.commit_listeners {
            listener(&commit);
        }
        commit
    }

    fn announce_key(&mut self, key: Key, now: Instant, settings: &DwellSettings) -> bool {
        if key.is_special() {
            if let Some(last) = self.last_announced.get(&key) {
                if now.saturating_duration_since(*last) < GRACE_PERIOD {
                    tracing::trace!("Suppressing announcement of {} within grace period", key);
                    return false;
                }
            }
            self.last_announced.insert(key, now);
        }

        let utterance = Utterance::new(key.spoken_name(), settings.voice);
        self.feedback.speech.announce(&utterance);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{RecordingHaptics, RecordingSpeech};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn settings(hold_ms: u64) -> DwellSettings {
        DwellSettings {
            hold_time: ms(hold_ms),
            ..DwellSettings::default()
        }
    }

    fn recorded() -> (DwellController, RecordingSpeech, RecordingHaptics) {
        let speech = RecordingSpeech::new();
        let haptics = RecordingHaptics::new();
        let controller = DwellController::new(Feedback::new(
            Box::new(speech.clone()),
            Box::new(haptics.clone()),
        ));
        (controller, speech, haptics)
    }

    #[test]
    fn test_release_before_hold_time_does_not_commit() {
        let (mut kb, speech, haptics) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        assert!(kb.press(Key::Char('A'), t0, &s).is_none());
        assert!(kb.release(Key::Char('A'), t0 + ms(99), &s).is_none());

        assert!(kb.text().is_empty());
        assert!(speech.texts().is_empty());
        assert_eq!(haptics.count(), 0);
        assert!(!kb.is_pending(Key::Char('A')));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.press(Key::Char('A'), t0, &s);
        let commit = kb.release(Key::Char('A'), t0 + ms(100), &s);

        assert_eq!(
            commit.map(|c| c.action),
            Some(TextAction::Append('A'))
        );
        assert_eq!(kb.text().as_str(), "A");
    }

    #[test]
    fn test_duplicate_press_is_ignored() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.press(Key::Char('A'), t0, &s);
        // Second press must not restart the timer
        kb.press(Key::Char('A'), t0 + ms(80), &s);
        let commit = kb.release(Key::Char('A'), t0 + ms(120), &s);

        assert!(commit.is_some());
        assert_eq!(kb.text().as_str(), "A");
    }

    #[test]
    fn test_duplicate_press_in_instant_mode_commits_once() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let s = DwellSettings {
            instant_input: true,
            ..settings(100)
        };

        assert!(kb.press(Key::Char('Z'), t0, &s).is_some());
        assert!(kb.press(Key::Char('Z'), t0 + ms(5), &s).is_none());
        assert_eq!(kb.text().as_str(), "Z");
    }

    #[test]
    fn test_stray_release_is_noop() {
        let (mut kb, _, _) = recorded();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        kb.on_active_key_changed(move |k| sink.borrow_mut().push(k));

        assert!(kb.release(Key::Backspace, Instant::now(), &settings(100)).is_none());
        assert!(kb.text().is_empty());
        assert!(changes.borrow().is_empty());
        assert_eq!(kb.active_key(), None);
    }

    #[test]
    fn test_active_key_tracking() {
        let (mut kb, _, _) = recorded();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        kb.on_active_key_changed(move |k| sink.borrow_mut().push(k));

        let t0 = Instant::now();
        let s = settings(100);
        kb.press(Key::Char('Q'), t0, &s);
        assert_eq!(kb.active_key(), Some(Key::Char('Q')));
        kb.release(Key::Char('Q'), t0 + ms(10), &s);
        assert_eq!(kb.active_key(), None);

        assert_eq!(*changes.borrow(), vec![Some(Key::Char('Q')), None]);
    }

    #[test]
    fn test_concurrent_keys_are_independent() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.press(Key::Char('A'), t0, &s);
        kb.press(Key::Char('B'), t0 + ms(50), &s);
        // B released too early, A qualifies
        assert!(kb.release(Key::Char('B'), t0 + ms(100), &s).is_none());
        assert!(kb.release(Key::Char('A'), t0 + ms(110), &s).is_some());

        assert_eq!(kb.text().as_str(), "A");
    }

    #[test]
    fn test_commit_feedback() {
        let (mut kb, speech, haptics) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.press(Key::Space, t0, &s);
        let commit = kb.release(Key::Space, t0 + ms(150), &s).unwrap();

        assert!(commit.announced);
        assert_eq!(speech.texts(), vec!["space"]);
        assert_eq!(haptics.pulses(), vec![VIBRATION_DURATION]);
        assert!(kb.is_flashing(t0 + ms(200)));
        assert!(!kb.is_flashing(t0 + ms(150) + FLASH_DURATION));
    }

    #[test]
    fn test_feedback_toggles() {
        let (mut kb, speech, haptics) = recorded();
        let s = DwellSettings {
            sound_enabled: false,
            vibration_enabled: false,
            ..settings(100)
        };

        let commit = kb.activate(Key::Char('A'), Instant::now(), &s);
        assert!(!commit.announced);
        assert!(speech.texts().is_empty());
        assert_eq!(haptics.count(), 0);
        assert_eq!(kb.text().as_str(), "A");
    }

    #[test]
    fn test_grace_period_gates_speech_not_input() {
        let (mut kb, speech, haptics) = recorded();
        let t0 = Instant::now();
        let s = settings(100);
        kb.text_mut().apply(TextAction::Append('A'));
        kb.text_mut().apply(TextAction::Append('B'));

        kb.press(Key::Backspace, t0, &s);
        kb.release(Key::Backspace, t0 + ms(100), &s);
        kb.press(Key::Backspace, t0 + ms(150), &s);
        let second = kb.release(Key::Backspace, t0 + ms(300), &s).unwrap();

        assert!(!second.announced);
        assert_eq!(speech.texts(), vec!["delete"]);
        assert_eq!(haptics.count(), 2);
        assert!(kb.text().is_empty());

        // Past the grace period the key is announced again
        kb.activate(Key::Backspace, t0 + ms(700), &s);
        assert_eq!(speech.texts(), vec!["delete", "delete"]);
    }

    #[test]
    fn test_regular_keys_are_never_suppressed() {
        let (mut kb, speech, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.activate(Key::Char('L'), t0, &s);
        kb.activate(Key::Char('L'), t0 + ms(10), &s);
        assert_eq!(speech.texts(), vec!["L", "L"]);
    }

    #[test]
    fn test_grace_period_is_per_key() {
        let (mut kb, speech, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.activate(Key::Space, t0, &s);
        kb.activate(Key::Backspace, t0 + ms(10), &s);
        assert_eq!(speech.texts(), vec!["space", "delete"]);
    }

    #[test]
    fn test_instant_press_then_long_release_commits_once() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let instant = DwellSettings {
            instant_input: true,
            ..settings(100)
        };
        let dwell = settings(100);

        kb.press(Key::Char('A'), t0, &instant);
        // Settings switched back to dwell mode while the key is held
        assert!(kb.release(Key::Char('A'), t0 + ms(500), &dwell).is_none());
        assert_eq!(kb.text().as_str(), "A");
    }

    #[test]
    fn test_release_uses_release_time_settings() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();

        kb.press(Key::Char('A'), t0, &settings(100));
        // Threshold raised mid-press
        assert!(kb.release(Key::Char('A'), t0 + ms(150), &settings(200)).is_none());

        kb.press(Key::Char('B'), t0, &settings(500));
        // Threshold lowered mid-press
        assert!(kb.release(Key::Char('B'), t0 + ms(150), &settings(100)).is_some());
        assert_eq!(kb.text().as_str(), "B");
    }

    #[test]
    fn test_commit_listener() {
        let (mut kb, _, _) = recorded();
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        kb.on_commit(move |c| sink.borrow_mut().push(c.action));

        let t0 = Instant::now();
        kb.activate(Key::Char('H'), t0, &settings(100));
        kb.activate(Key::Space, t0, &settings(100));

        assert_eq!(
            *commits.borrow(),
            vec![TextAction::Append('H'), TextAction::AppendSpace]
        );
    }

    #[test]
    fn test_read_aloud() {
        let (mut kb, speech, _) = recorded();
        let s = settings(100);
        assert!(!kb.read_aloud(&s));

        kb.activate(Key::Char('H'), Instant::now(), &DwellSettings {
            sound_enabled: false,
            ..s
        });
        kb.activate(Key::Space, Instant::now(), &DwellSettings {
            sound_enabled: false,
            ..s
        });
        assert!(kb.read_aloud(&s));
        assert_eq!(speech.texts(), vec!["H"]);
    }

    #[test]
    fn test_release_all_drops_pending_presses() {
        let (mut kb, _, _) = recorded();
        let t0 = Instant::now();
        let s = settings(100);

        kb.press(Key::Char('A'), t0, &s);
        kb.release_all();
        assert!(kb.release(Key::Char('A'), t0 + ms(500), &s).is_none());
        assert!(kb.text().is_empty());
        assert_eq!(kb.active_key(), None);
    }
}
