//! Replay scripted key events through the dwell controller.
//!
//! Events are written `KIND:KEY:MS` where `MS` is the time in milliseconds
//! since the start of the script:
//!
//! - `press:A:0` starts holding `A`
//! - `release:A:400` lets go of `A`
//! - `tap:A:500` commits `A` directly, bypassing the hold time
//!
//! Events must be given in time order.

use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::cli::common::{print_json, CliError, CliResult};
use crate::feedback::{Feedback, RecordingHaptics, RecordingSpeech};
use crate::models::{Key, KeyboardSettings, TextAction, TextBuffer};
use crate::services::DwellController;
use clap::Args;
use serde::Serialize;

/// Replay key events through the dwell controller
#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Hold time in seconds (0.1 - 3.0)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    pub hold_time: f64,

    /// Commit keys on press
    #[arg(long)]
    pub instant: bool,

    /// Disable speech announcements
    #[arg(long)]
    pub no_sound: bool,

    /// Initial text
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub text: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Events such as press:A:0 release:A:400 tap:␣:500
    #[arg(value_name = "EVENT", required = true)]
    pub events: Vec<ScriptEvent>,
}

/// Kind of scripted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// Start holding a key
    Press,
    /// Let go of a key
    Release,
    /// Commit a key directly
    Tap,
}

/// One scripted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    /// What happens
    pub kind: EventKind,
    /// Key involved
    pub key: Key,
    /// Milliseconds since the start of the script
    pub at_ms: u64,
}

impl FromStr for ScriptEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let usage = || anyhow::anyhow!("Invalid event '{s}': expected KIND:KEY:MS, e.g. press:A:0");

        let (kind, rest) = s.split_once(':').ok_or_else(usage)?;
        let (key, at_ms) = rest.rsplit_once(':').ok_or_else(usage)?;

        let kind = match kind.to_lowercase().as_str() {
            "press" | "down" => EventKind::Press,
            "release" | "up" => EventKind::Release,
            "tap" => EventKind::Tap,
            other => anyhow::bail!("Invalid event kind '{other}'. Must be one of: press, release, tap"),
        };
        let key = Key::parse(key)?;
        let at_ms = at_ms
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("Invalid time '{at_ms}' in event '{s}'"))?;

        Ok(Self { kind, key, at_ms })
    }
}

/// A commit produced by the script
#[derive(Debug, Clone, Serialize)]
pub struct CommitRecord {
    /// Time of the commit
    pub at_ms: u64,
    /// Committed key
    pub key: Key,
    /// Text mutation applied
    #[serde(flatten)]
    pub action: TextAction,
    /// Whether the key name was spoken
    pub announced: bool,
}

/// Result of a replay
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Final text
    pub text: String,
    /// Commits in order
    pub commits: Vec<CommitRecord>,
    /// Every utterance requested, in order
    pub announcements: Vec<String>,
    /// Number of haptic pulses requested
    pub vibrations: usize,
    /// Keys still held when the script ended
    pub pending: Vec<Key>,
}

/// Replays `events` with `settings` starting from `initial_text`.
///
/// # Errors
///
/// Returns an error if the events are not in time order.
pub fn run_script(
    settings: &KeyboardSettings,
    initial_text: &str,
    events: &[ScriptEvent],
) -> anyhow::Result<SimulationReport> {
    let speech = RecordingSpeech::new();
    let haptics = RecordingHaptics::new();
    let feedback = Feedback::new(Box::new(speech.clone()), Box::new(haptics.clone()));
    let mut controller = DwellController::with_text(feedback, TextBuffer::with_text(initial_text));

    let dwell = settings.dwell();
    let start = Instant::now();
    let mut last_ms = 0;
    let mut commits = Vec::new();

    for event in events {
        anyhow::ensure!(
            event.at_ms >= last_ms,
            "Events must be in time order: {}ms comes after {}ms",
            event.at_ms,
            last_ms
        );
        last_ms = event.at_ms;

        let now = start + Duration::from_millis(event.at_ms);
        let commit = match event.kind {
            EventKind::Press => controller.press(event.key, now, &dwell),
            EventKind::Release => controller.release(event.key, now, &dwell),
            EventKind::Tap => Some(controller.activate(event.key, now, &dwell)),
        };
        tracing::debug!("{:?} {} at {}ms -> {:?}", event.kind, event.key, event.at_ms, commit);

        if let Some(commit) = commit {
            commits.push(CommitRecord {
                at_ms: event.at_ms,
                key: commit.key,
                action: commit.action,
                announced: commit.announced,
            });
        }
    }

    let mut pending: Vec<Key> = events
        .iter()
        .map(|e| e.key)
        .filter(|key| controller.is_pending(*key))
        .collect();
    pending.sort();
    pending.dedup();

    Ok(SimulationReport {
        text: controller.text().as_str().to_string(),
        commits,
        announcements: speech.texts(),
        vibrations: haptics.count(),
        pending,
    })
}

impl SimulateArgs {
    /// Execute the simulate command
    pub fn execute(&self) -> CliResult<()> {
        let settings = KeyboardSettings {
            hold_time: self.hold_time,
            instant_input: self.instant,
            sound_enabled: !self.no_sound,
            ..KeyboardSettings::default()
        };
        settings
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let report = run_script(&settings, &self.text, &self.events)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        if self.json {
            return print_json(&report);
        }

        for commit in &report.commits {
            println!("{:>6}ms  {}  {:?}", commit.at_ms, commit.key, commit.action);
        }
        if !report.announcements.is_empty() {
            println!("Spoken: {}", report.announcements.join(", "));
        }
        if !report.pending.is_empty() {
            let keys: Vec<String> = report.pending.iter().map(ToString::to_string).collect();
            println!("Still held: {}", keys.join(" "));
        }
        println!("Text: {}", report.text);
        Ok(())
    }
}
