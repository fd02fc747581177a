//! Settings panel for the keyboard.
//!
//! Three tabs: general input and voice settings, keyboard appearance and
//! packing, and presets. Value changes are emitted as a complete new
//! [`KeyboardSettings`] record so the session can validate, repack and
//! persist in one step.
//! Opened with F2 or Tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::models::preset::MAX_PRESET_NAME_LEN;
use crate::models::settings::{
    FONT_SIZE_RANGE, HOLD_TIME_RANGE, MAX_SPACING, TEXTAREA_FONT_SIZE_RANGE, VOICE_PITCH_RANGE,
    VOICE_RATE_RANGE, VOICE_VOLUME_RANGE,
};
use crate::models::{KeyboardSettings, PackingMode, Preset};

use super::Theme;

/// Panel tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    /// Dwell timing, feedback and voice
    General,
    /// Appearance and packing
    Keyboard,
    /// Saved presets and reset
    Presets,
}

impl PanelTab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::General, Self::Keyboard, Self::Presets];

    /// Returns display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Keyboard => "Keyboard",
            Self::Presets => "Presets",
        }
    }

    /// Items listed on this tab.
    #[must_use]
    pub const fn items(self) -> &'static [SettingItem] {
        match self {
            Self::General => &[
                SettingItem::HoldTime,
                SettingItem::InstantInput,
                SettingItem::Sound,
                SettingItem::Vibration,
                SettingItem::VoiceRate,
                SettingItem::VoiceVolume,
                SettingItem::VoicePitch,
            ],
            Self::Keyboard => &[
                SettingItem::Theme,
                SettingItem::Layout,
                SettingItem::Packing,
                SettingItem::RowCount,
                SettingItem::Spacing,
                SettingItem::FontSize,
                SettingItem::TextAreaFontSize,
            ],
            Self::Presets => &[
                SettingItem::SavePreset,
                SettingItem::LoadPreset,
                SettingItem::ResetDefaults,
            ],
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::General => 0,
            Self::Keyboard => 1,
            Self::Presets => 2,
        }
    }

    const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A row of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    /// Hold time in seconds
    HoldTime,
    /// Commit on press
    InstantInput,
    /// Speak committed keys
    Sound,
    /// Haptic pulse on commit
    Vibration,
    /// Speech rate
    VoiceRate,
    /// Speech volume
    VoiceVolume,
    /// Speech pitch
    VoicePitch,
    /// Visual theme
    Theme,
    /// Alphabet ordering
    Layout,
    /// Row arrangement
    Packing,
    /// Rows in row-count packing
    RowCount,
    /// Gap between keys
    Spacing,
    /// Key label size
    FontSize,
    /// Text area font size
    TextAreaFontSize,
    /// Save current settings under a name
    SavePreset,
    /// Apply or delete a preset
    LoadPreset,
    /// Restore defaults
    ResetDefaults,
}

impl SettingItem {
    /// Returns display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::HoldTime => "Hold time",
            Self::InstantInput => "Instant input",
            Self::Sound => "Sound",
            Self::Vibration => "Vibration",
            Self::VoiceRate => "Voice rate",
            Self::VoiceVolume => "Voice volume",
            Self::VoicePitch => "Voice pitch",
            Self::Theme => "Theme",
            Self::Layout => "Layout",
            Self::Packing => "Packing",
            Self::RowCount => "Rows",
            Self::Spacing => "Spacing",
            Self::FontSize => "Key font size",
            Self::TextAreaFontSize => "Text font size",
            Self::SavePreset => "Save current settings as preset…",
            Self::LoadPreset => "Load or delete preset…",
            Self::ResetDefaults => "Reset to defaults",
        }
    }

    /// True for rows that open a dialog or run an action instead of holding a value.
    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(
            self,
            Self::SavePreset | Self::LoadPreset | Self::ResetDefaults
        )
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn step_f64(value: f64, forward: bool, (min, max): (f64, f64)) -> f64 {
    let delta = if forward { 0.1 } else { -0.1 };
    round_tenth(value + delta).clamp(min, max)
}

fn step_int(value: i64, step: i64, forward: bool, min: i64, max: i64) -> i64 {
    let next = if forward { value + step } else { value - step };
    next.clamp(min, max)
}

/// Returns `settings` with `item` moved one step forward or backward.
///
/// Numeric values are clamped to their valid range, enums cycle and
/// booleans toggle. Action rows yield `None`.
#[must_use]
pub fn adjust(item: SettingItem, settings: &KeyboardSettings, forward: bool) -> Option<KeyboardSettings> {
    let mut next = settings.clone();
    match item {
        SettingItem::HoldTime => next.hold_time = step_f64(settings.hold_time, forward, HOLD_TIME_RANGE),
        SettingItem::InstantInput => next.instant_input = !settings.instant_input,
        SettingItem::Sound => next.sound_enabled = !settings.sound_enabled,
        SettingItem::Vibration => next.vibration_enabled = !settings.vibration_enabled,
        SettingItem::VoiceRate => {
            next.voice_rate = step_f64(settings.voice_rate, forward, VOICE_RATE_RANGE);
        }
        SettingItem::VoiceVolume => {
            next.voice_volume = step_f64(settings.voice_volume, forward, VOICE_VOLUME_RANGE);
        }
        SettingItem::VoicePitch => {
            next.voice_pitch = step_f64(settings.voice_pitch, forward, VOICE_PITCH_RANGE);
        }
        SettingItem::Theme => {
            next.theme = if forward {
                settings.theme.next()
            } else {
                settings.theme.next().next()
            };
        }
        SettingItem::Layout => {
            next.layout = settings.layout.toggled();
            next.row_count = settings.row_count.min(next.layout.regular_key_count());
        }
        SettingItem::Packing => {
            next.packing = if forward {
                settings.packing.next()
            } else {
                settings.packing.next().next()
            };
        }
        SettingItem::RowCount => {
            let max = settings.layout.regular_key_count() as i64;
            next.row_count = step_int(settings.row_count as i64, 1, forward, 1, max) as usize;
        }
        SettingItem::Spacing => {
            next.spacing =
                step_int(i64::from(settings.spacing), 1, forward, 0, i64::from(MAX_SPACING)) as u8;
        }
        SettingItem::FontSize => {
            next.font_size = step_int(
                i64::from(settings.font_size),
                5,
                forward,
                i64::from(FONT_SIZE_RANGE.0),
                i64::from(FONT_SIZE_RANGE.1),
            ) as u8;
        }
        SettingItem::TextAreaFontSize => {
            next.textarea_font_size = step_int(
                i64::from(settings.textarea_font_size),
                2,
                forward,
                i64::from(TEXTAREA_FONT_SIZE_RANGE.0),
                i64::from(TEXTAREA_FONT_SIZE_RANGE.1),
            ) as u16;
        }
        SettingItem::SavePreset | SettingItem::LoadPreset | SettingItem::ResetDefaults => {
            return None;
        }
    }
    Some(next)
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

/// Current value of `item` as shown in the panel.
#[must_use]
pub fn value_label(item: SettingItem, settings: &KeyboardSettings) -> String {
    match item {
        SettingItem::HoldTime => format!("{:.1}s", settings.hold_time),
        SettingItem::InstantInput => on_off(settings.instant_input).to_string(),
        SettingItem::Sound => on_off(settings.sound_enabled).to_string(),
        SettingItem::Vibration => on_off(settings.vibration_enabled).to_string(),
        SettingItem::VoiceRate => format!("{:.1}", settings.voice_rate),
        SettingItem::VoiceVolume => format!("{:.1}", settings.voice_volume),
        SettingItem::VoicePitch => format!("{:.1}", settings.voice_pitch),
        SettingItem::Theme => settings.theme.to_string(),
        SettingItem::Layout => settings.layout.to_string(),
        SettingItem::Packing => settings.packing.to_string(),
        SettingItem::RowCount => {
            if settings.packing == PackingMode::RowCount {
                settings.row_count.to_string()
            } else {
                format!("{} (row-count packing only)", settings.row_count)
            }
        }
        SettingItem::Spacing => settings.spacing.to_string(),
        SettingItem::FontSize => format!("{}%", settings.font_size),
        SettingItem::TextAreaFontSize => format!("{}px", settings.textarea_font_size),
        SettingItem::SavePreset | SettingItem::LoadPreset | SettingItem::ResetDefaults => {
            String::new()
        }
    }
}

/// Panel mode - determines what operation is being performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMode {
    /// Browsing the current tab
    Browsing,
    /// Typing a name for a new preset
    NamingPreset {
        /// Name typed so far
        value: String,
    },
    /// Picking a preset to load or delete
    ChoosingPreset {
        /// Highlighted preset index
        selected: usize,
    },
}

/// Events emitted by the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsPanelEvent {
    /// A setting was changed; apply this record
    Changed(KeyboardSettings),
    /// Save the current settings under a name
    SavePreset(String),
    /// Apply the named preset
    LoadPreset(String),
    /// Delete the named preset
    DeletePreset(String),
    /// Restore default settings
    Reset,
    /// Panel closed
    Closed,
}

/// Settings panel state
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    /// Active tab
    pub tab: PanelTab,
    /// Selected row on the active tab
    pub selected: usize,
    /// Current operation mode
    pub mode: PanelMode,
}

impl SettingsPanel {
    /// Create a panel on the first tab
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tab: PanelTab::General,
            selected: 0,
            mode: PanelMode::Browsing,
        }
    }

    /// Selected row.
    #[must_use]
    pub fn selected_item(&self) -> SettingItem {
        let items = self.tab.items();
        items[self.selected.min(items.len() - 1)]
    }

    /// Handle a key press.
    ///
    /// `presets` is the current preset list as shown in the chooser.
    pub fn handle_input(
        &mut self,
        key: KeyEvent,
        settings: &KeyboardSettings,
        presets: &[Preset],
    ) -> Option<SettingsPanelEvent> {
        match self.mode.clone() {
            PanelMode::Browsing => self.handle_browsing_input(key, settings),
            PanelMode::NamingPreset { value } => self.handle_naming_input(key, value),
            PanelMode::ChoosingPreset { selected } => {
                self.handle_choosing_input(key, selected, presets)
            }
        }
    }

    fn handle_browsing_input(
        &mut self,
        key: KeyEvent,
        settings: &KeyboardSettings,
    ) -> Option<SettingsPanelEvent> {
        let count = self.tab.items().len();
        match key.code {
            KeyCode::Esc => Some(SettingsPanelEvent::Closed),
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.selected = 0;
                None
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                self.selected = 0;
                None
            }
            KeyCode::Up => {
                self.selected = if self.selected == 0 {
                    count - 1
                } else {
                    self.selected - 1
                };
                None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % count;
                None
            }
            KeyCode::Left => adjust(self.selected_item(), settings, false)
                .map(SettingsPanelEvent::Changed),
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => match self.selected_item() {
                SettingItem::SavePreset => {
                    self.mode = PanelMode::NamingPreset {
                        value: String::new(),
                    };
                    None
                }
                SettingItem::LoadPreset => {
                    self.mode = PanelMode::ChoosingPreset { selected: 0 };
                    None
                }
                SettingItem::ResetDefaults => Some(SettingsPanelEvent::Reset),
                item => adjust(item, settings, true).map(SettingsPanelEvent::Changed),
            },
            _ => None,
        }
    }

    fn handle_naming_input(&mut self, key: KeyEvent, mut value: String) -> Option<SettingsPanelEvent> {
        match key.code {
            KeyCode::Esc => {
                self.mode = PanelMode::Browsing;
                None
            }
            KeyCode::Enter => {
                let name = value.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                self.mode = PanelMode::Browsing;
                Some(SettingsPanelEvent::SavePreset(name))
            }
            KeyCode::Backspace => {
                value.pop();
                self.mode = PanelMode::NamingPreset { value };
                None
            }
            KeyCode::Char(c) => {
                if value.chars().count() < MAX_PRESET_NAME_LEN {
                    value.push(c);
                }
                self.mode = PanelMode::NamingPreset { value };
                None
            }
            _ => None,
        }
    }

    fn handle_choosing_input(
        &mut self,
        key: KeyEvent,
        selected: usize,
        presets: &[Preset],
    ) -> Option<SettingsPanelEvent> {
        if presets.is_empty() {
            self.mode = PanelMode::Browsing;
            return None;
        }
        let selected = selected.min(presets.len() - 1);

        match key.code {
            KeyCode::Esc => {
                self.mode = PanelMode::Browsing;
                None
            }
            KeyCode::Up => {
                self.mode = PanelMode::ChoosingPreset {
                    selected: if selected == 0 {
                        presets.len() - 1
                    } else {
                        selected - 1
                    },
                };
                None
            }
            KeyCode::Down => {
                self.mode = PanelMode::ChoosingPreset {
                    selected: (selected + 1) % presets.len(),
                };
                None
            }
            KeyCode::Enter => {
                self.mode = PanelMode::Browsing;
                Some(SettingsPanelEvent::LoadPreset(presets[selected].name.clone()))
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let preset = &presets[selected];
                if preset.is_builtin() {
                    return None;
                }
                self.mode = PanelMode::ChoosingPreset {
                    selected: selected.saturating_sub(1),
                };
                Some(SettingsPanelEvent::DeletePreset(preset.name.clone()))
            }
            _ => None,
        }
    }

    /// Render the panel centered in `area`.
    pub fn render(&self, f: &mut Frame, area: Rect, settings: &KeyboardSettings, presets: &[Preset], theme: &Theme) {
        // Center the dialog (70% width, 80% height)
        let dialog_width = (area.width * 70) / 100;
        let dialog_height = (area.height * 80) / 100;
        let dialog_area = Rect {
            x: area.x + (area.width - dialog_width) / 2,
            y: area.y + (area.height - dialog_height) / 2,
            width: dialog_width,
            height: dialog_height,
        };

        f.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Settings (F2) ")
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(dialog_area);
        f.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(inner);

        let tabs = Tabs::new(PanelTab::ALL.iter().map(|t| t.display_name()))
            .select(self.tab.index())
            .style(Style::default().fg(theme.text_muted))
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, chunks[0]);

        match &self.mode {
            PanelMode::Browsing => self.render_items(f, chunks[1], settings, theme),
            PanelMode::NamingPreset { value } => render_name_entry(f, chunks[1], value, theme),
            PanelMode::ChoosingPreset { selected } => {
                render_preset_list(f, chunks[1], presets, *selected, theme);
            }
        }
    }

    fn render_items(&self, f: &mut Frame, area: Rect, settings: &KeyboardSettings, theme: &Theme) {
        let items: Vec<ListItem> = self
            .tab
            .items()
            .iter()
            .map(|item| {
                let mut spans = vec![Span::styled(
                    format!("{:<16}", item.display_name()),
                    Style::default().fg(theme.text),
                )];
                if !item.is_action() {
                    spans.push(Span::styled(
                        value_label(*item, settings),
                        Style::default().fg(theme.accent),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        f.render_stateful_widget(list, area, &mut list_state);
    }
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn render_name_entry(f: &mut Frame, area: Rect, value: &str, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            "Preset name:",
            Style::default().fg(theme.primary),
        )),
        Line::from(vec![
            Span::styled(value.to_string(), Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save | Esc: cancel",
            Style::default().fg(theme.text_muted),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_preset_list(f: &mut Frame, area: Rect, presets: &[Preset], selected: usize, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = presets
        .iter()
        .map(|preset| {
            let detail = preset.saved_at.map_or_else(
                || "built-in".to_string(),
                |at| at.format("%Y-%m-%d %H:%M").to_string(),
            );
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<30}", preset.name), Style::default().fg(theme.text)),
                Span::styled(detail, Style::default().fg(theme.text_muted)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter: load | d/Del: delete | Esc: back",
            Style::default().fg(theme.text_muted),
        )),
        chunks[1],
    );
}
