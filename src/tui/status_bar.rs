//! Status bar widget for displaying status messages and help

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, StatusMessage, Theme};

/// Key hints shown while the keyboard has focus.
const KEYBOARD_HELP: &[(&str, &str)] = &[
    ("Mouse", "hold key"),
    ("F2", "settings"),
    ("F3", "text area"),
    ("F5", "read aloud"),
    ("Ctrl+L", "clear"),
    ("F1", "hide help"),
    ("Esc", "quit"),
];

/// Key hints shown while the settings panel is open.
const PANEL_HELP: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("←→/Enter", "change"),
    ("Tab", "next tab"),
    ("Esc", "close"),
];

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with contextual help
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let mut lines = Vec::new();

        let status_line = match &state.status {
            Some(StatusMessage::Info(message)) => Line::from(vec![
                Span::styled("● ", Style::default().fg(theme.success)),
                Span::styled(message.as_str(), Style::default().fg(theme.text)),
            ]),
            Some(StatusMessage::Error(message)) => Line::from(vec![
                Span::styled(
                    "Error: ",
                    Style::default()
                        .fg(theme.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(message.as_str(), Style::default().fg(theme.error)),
            ]),
            None => {
                let mode = if state.session.settings().instant_input {
                    "instant".to_string()
                } else {
                    format!("hold {:.1}s", state.session.settings().hold_time)
                };
                let input = if state.key_release_supported {
                    "key hold"
                } else {
                    "key tap"
                };
                let mut spans = vec![
                    Span::styled("Mode: ", Style::default().fg(theme.primary)),
                    Span::styled(mode, Style::default().fg(theme.text)),
                    Span::styled(
                        format!("  | keyboard input: {input}"),
                        Style::default().fg(theme.text_muted),
                    ),
                ];
                if let Some(label) = held_key_label(state) {
                    spans.push(Span::styled("  | ", Style::default().fg(theme.text_muted)));
                    spans.push(Span::styled(label, Style::default().fg(theme.accent)));
                }
                Line::from(spans)
            }
        };
        lines.push(status_line);

        if state.show_help {
            let hints = if state.settings_panel.is_some() {
                PANEL_HELP
            } else {
                KEYBOARD_HELP
            };
            lines.push(help_line(hints, theme));
        }

        let status = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(Style::default().fg(theme.text_muted)),
        );

        f.render_widget(status, area);
    }

    /// Rows needed by the bar including borders.
    #[must_use]
    pub const fn height(show_help: bool) -> u16 {
        if show_help {
            4
        } else {
            3
        }
    }
}

/// Accessible name of the key shown as held, e.g. "Holding Space key".
fn held_key_label(state: &AppState) -> Option<String> {
    state
        .session
        .controller()
        .active_key()
        .map(|key| format!("Holding {}", key.label()))
}

fn help_line<'a>(hints: &[(&'a str, &'a str)], theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled("Help: ", Style::default().fg(theme.primary))];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(theme.text_muted),
        ));
    }
    Line::from(spans)
}
