//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

pub mod keyboard;
pub mod settings_panel;
pub mod status_bar;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::app::KeyboardSession;
use crate::constants::APP_NAME;
use crate::models::{Key, Preset};

pub use keyboard::KeyboardWidget;
pub use settings_panel::{SettingsPanel, SettingsPanelEvent};
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Event poll interval; also bounds how late a flash or ready state is drawn.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Height of the text area including borders.
const TEXT_AREA_HEIGHT: u16 = 5;

/// Message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Informational message
    Info(String),
    /// Error message
    Error(String),
}

/// Application state
pub struct AppState {
    /// Settings, layout and dwell controller
    pub session: KeyboardSession,
    /// Colors for the current theme setting
    pub theme: Theme,
    /// Whether the text area is shown
    pub show_text_area: bool,
    /// Whether the help line is shown
    pub show_help: bool,
    /// Open settings panel
    pub settings_panel: Option<SettingsPanel>,
    /// Preset list shown by the settings panel
    pub presets: Vec<Preset>,
    /// Key rectangles from the last render, for mouse hit testing
    pub key_rects: Vec<(Key, Rect)>,
    /// Key currently held by the mouse
    pub mouse_key: Option<Key>,
    /// Whether the terminal reports key releases
    pub key_release_supported: bool,
    /// Status bar message
    pub status: Option<StatusMessage>,
    /// Set when the user asked to quit
    pub should_quit: bool,
}

impl AppState {
    /// Create the state for a session.
    #[must_use]
    pub fn new(session: KeyboardSession, show_help: bool) -> Self {
        let theme = Theme::from_mode(session.settings().theme);
        Self {
            session,
            theme,
            show_text_area: true,
            show_help,
            settings_panel: None,
            presets: Vec::new(),
            key_rects: Vec::new(),
            mouse_key: None,
            key_release_supported: false,
            status: None,
            should_quit: false,
        }
    }

    fn set_error(&mut self, error: &anyhow::Error) {
        tracing::warn!("{:#}", error);
        self.status = Some(StatusMessage::Error(format!("{error:#}")));
    }

    fn refresh_presets(&mut self) {
        match self.session.presets() {
            Ok(presets) => self.presets = presets,
            Err(e) => self.set_error(&e),
        }
    }

    fn open_settings(&mut self) {
        self.release_mouse(Instant::now());
        self.refresh_presets();
        self.settings_panel = Some(SettingsPanel::new());
    }

    fn release_mouse(&mut self, now: Instant) {
        if let Some(key) = self.mouse_key.take() {
            self.session.release(key, now);
        }
    }

    /// Maps a terminal key to a key of the current grid.
    fn grid_key(&self, code: KeyCode) -> Option<Key> {
        let key = match code {
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(c) => Key::Char(c.to_uppercase().next()?),
            _ => return None,
        };
        self.session.grid().position_of(key).map(|_| key)
    }
}

/// Whether the terminal can report key release events.
#[must_use]
pub fn key_release_supported() -> bool {
    supports_keyboard_enhancement().unwrap_or(false)
}

/// Setup terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    if key_release_supported() {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("Failed to enable key release reporting")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    if key_release_supported() {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("Failed to restore keyboard flags")?;
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        state.theme = Theme::from_mode(state.session.settings().theme);

        terminal.draw(|f| render(f, state, Instant::now()))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => handle_key_event(state, key, Instant::now()),
                Event::Mouse(mouse) => handle_mouse_event(state, mouse, Instant::now()),
                // Re-rendered on the next pass
                _ => {}
            }
        }

        if state.should_quit {
            break;
        }
    }

    state.session.controller_mut().release_all();
    Ok(())
}

/// Handle a keyboard event.
pub fn handle_key_event(state: &mut AppState, key: KeyEvent, now: Instant) {
    if state.settings_panel.is_some() {
        if key.kind == KeyEventKind::Press {
            handle_panel_key(state, key);
        }
        return;
    }

    match key.kind {
        KeyEventKind::Release => {
            if state.key_release_supported {
                if let Some(grid_key) = state.grid_key(key.code) {
                    state.session.release(grid_key, now);
                }
            }
            return;
        }
        // Auto-repeat keeps the original press running
        KeyEventKind::Repeat => return,
        KeyEventKind::Press => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => state.should_quit = true,
        KeyCode::Char('l') if ctrl => {
            state.session.controller_mut().text_mut().clear();
            state.status = Some(StatusMessage::Info("Text cleared".to_string()));
        }
        KeyCode::Esc => state.should_quit = true,
        KeyCode::Tab | KeyCode::F(2) => state.open_settings(),
        KeyCode::F(1) => state.show_help = !state.show_help,
        KeyCode::F(3) => state.show_text_area = !state.show_text_area,
        KeyCode::F(5) => {
            if !state.session.read_aloud() {
                state.status = Some(StatusMessage::Info("Nothing to read".to_string()));
            }
        }
        code => {
            let Some(grid_key) = state.grid_key(code) else {
                return;
            };
            state.status = None;
            if state.key_release_supported {
                state.session.press(grid_key, now);
            } else {
                state.session.activate(grid_key, now);
            }
        }
    }
}

fn handle_panel_key(state: &mut AppState, key: KeyEvent) {
    let Some(panel) = state.settings_panel.as_mut() else {
        return;
    };
    let Some(event) = panel.handle_input(key, state.session.settings(), &state.presets) else {
        return;
    };

    match event {
        SettingsPanelEvent::Changed(settings) => {
            if let Err(e) = state.session.update_settings(settings) {
                state.set_error(&e);
            }
        }
        SettingsPanelEvent::SavePreset(name) => match state.session.save_preset(&name) {
            Ok(preset) => {
                state.status = Some(StatusMessage::Info(format!("Saved preset '{}'", preset.name)));
                state.refresh_presets();
            }
            Err(e) => state.set_error(&e),
        },
        SettingsPanelEvent::LoadPreset(name) => match state.session.load_preset(&name) {
            Ok(()) => state.status = Some(StatusMessage::Info(format!("Loaded preset '{name}'"))),
            Err(e) => state.set_error(&e),
        },
        SettingsPanelEvent::DeletePreset(name) => match state.session.delete_preset(&name) {
            Ok(()) => {
                state.status = Some(StatusMessage::Info(format!("Deleted preset '{name}'")));
                state.refresh_presets();
            }
            Err(e) => state.set_error(&e),
        },
        SettingsPanelEvent::Reset => match state.session.reset_settings() {
            Ok(()) => state.status = Some(StatusMessage::Info("Settings reset".to_string())),
            Err(e) => state.set_error(&e),
        },
        SettingsPanelEvent::Closed => state.settings_panel = None,
    }
}

/// Handle a mouse event against the key rectangles of the last render.
pub fn handle_mouse_event(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    if state.settings_panel.is_some() {
        return;
    }

    let under = keyboard::key_at(&state.key_rects, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            state.release_mouse(now);
            if let Some(key) = under {
                state.status = None;
                state.mouse_key = Some(key);
                state.session.press(key, now);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            // Leaving the key ends the press
            if state.mouse_key.is_some() && under != state.mouse_key {
                state.release_mouse(now);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => state.release_mouse(now),
        _ => {}
    }
}

/// Render the full screen
fn render(f: &mut Frame, state: &mut AppState, now: Instant) {
    let theme = state.theme.clone();
    let area = f.area();
    let text_height = if state.show_text_area {
        TEXT_AREA_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(text_height),
            Constraint::Min(3),
            Constraint::Length(StatusBar::height(state.show_help)),
        ])
        .split(area);

    render_header(f, chunks[0], state, &theme);
    if state.show_text_area {
        render_text_area(f, chunks[1], state, &theme);
    }
    KeyboardWidget::render(f, chunks[2], state, now);
    StatusBar::render(f, chunks[3], state, &theme);

    if let Some(panel) = &state.settings_panel {
        panel.render(f, area, state.session.settings(), &state.presets, &theme);
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let count = state.session.text().chars().count();
    let header = Line::from(vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{count} characters"),
            Style::default().fg(theme.text_muted),
        ),
    ]);
    f.render_widget(
        Paragraph::new(header).style(Style::default().bg(theme.background)),
        area,
    );
}

fn render_text_area(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let text = Line::from(vec![
        Span::styled(state.session.text().to_string(), Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.accent)),
    ]);
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Text (F5 read aloud) ")
                .border_style(Style::default().fg(theme.text_muted)),
        );
    f.render_widget(paragraph, area);
}
