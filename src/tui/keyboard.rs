//! Keyboard widget: lays the packed grid out as square keys and renders
//! active, ready and flash states.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Key, KeyGrid, KeyboardSettings};
use crate::services::{compute_key_size, GridShape, SpacingParams, Viewport};

use super::{AppState, Theme};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u16 = 2;

/// Smallest key height in rows (border, label, border).
const MIN_KEY_ROWS: u16 = 3;

/// Key rectangles for the grid inside `area`.
///
/// Rows are centered horizontally and the whole block vertically. Keys that
/// would fall outside `area` are clipped or dropped.
#[must_use]
pub fn key_rects(area: Rect, grid: &KeyGrid, spacing: u8) -> Vec<(Key, Rect)> {
    let shape = GridShape::from(grid);
    if shape.rows == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }

    // Work in row units: one unit is one terminal row or two columns
    let viewport = Viewport {
        width: f64::from(area.width / CELL_ASPECT),
        height: f64::from(area.height),
        header_height: 0.0,
        text_area_height: 0.0,
        horizontal_padding: 0.0,
        vertical_padding: 0.0,
        safe_area_bottom: 0.0,
    };
    let params = SpacingParams {
        gap: f64::from(spacing) / 4.0,
        min_size: f64::from(MIN_KEY_ROWS),
        fill_ratio: 1.0,
    };

    let size = compute_key_size(&viewport, &shape, &params);
    let key_h = (size.floor() as u16).max(MIN_KEY_ROWS);
    let key_w = key_h * CELL_ASPECT;
    let gap_y = params.gap.round() as u16;
    let gap_x = (params.gap * f64::from(CELL_ASPECT)).round() as u16;

    let rows = grid.row_count() as u16;
    let block_h = rows * key_h + rows.saturating_sub(1) * gap_y;
    let top = area.y + area.height.saturating_sub(block_h) / 2;

    let mut rects = Vec::new();
    for (r, row) in grid.rows().iter().enumerate() {
        let cols = row.len() as u16;
        let row_w = cols * key_w + cols.saturating_sub(1) * gap_x;
        let left = area.x + area.width.saturating_sub(row_w) / 2;
        let y = top + r as u16 * (key_h + gap_y);

        for (c, key) in row.iter().enumerate() {
            let x = left + c as u16 * (key_w + gap_x);
            let rect = Rect::new(x, y, key_w, key_h).intersection(area);
            if !rect.is_empty() {
                rects.push((*key, rect));
            }
        }
    }
    rects
}

/// Key under a terminal cell.
#[must_use]
pub fn key_at(rects: &[(Key, Rect)], column: u16, row: u16) -> Option<Key> {
    rects
        .iter()
        .find(|(_, rect)| {
            column >= rect.x
                && column < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height
        })
        .map(|(key, _)| *key)
}

/// Keyboard widget
pub struct KeyboardWidget;

impl KeyboardWidget {
    /// Render the keyboard and remember where each key landed for hit testing.
    pub fn render(f: &mut Frame, area: Rect, state: &mut AppState, now: Instant) {
        let theme = state.theme.clone();
        let settings = state.session.settings().clone();
        let controller = state.session.controller();

        let border_color = if controller.is_flashing(now) {
            theme.flash
        } else {
            theme.primary
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(format!(
                " {} · {} ",
                settings.layout.to_string().to_uppercase(),
                settings.packing
            ))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rects = key_rects(inner, state.session.grid(), settings.spacing);
        let hold_time = settings.dwell().hold_time;

        for (key, rect) in &rects {
            let active = controller.active_key() == Some(*key);
            let ready = controller
                .held_for(*key, now)
                .is_some_and(|held| held >= hold_time);
            render_key(f, *rect, *key, active, ready, &settings, &theme);
        }

        state.key_rects = rects;
    }
}

fn render_key(
    f: &mut Frame,
    area: Rect,
    key: Key,
    active: bool,
    ready: bool,
    settings: &KeyboardSettings,
    theme: &Theme,
) {
    let bg = if active { theme.active } else { theme.key_bg };
    let border = if ready { theme.accent } else { theme.key_border };

    let mut label_style = Style::default().fg(theme.text).bg(bg);
    if settings.font_size >= 50 {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if ready {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));

    let inner = block.inner(area);
    // Center the label vertically
    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(key.glyph().to_string()));

    let label = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(label_style)
        .block(block);
    f.render_widget(label, area);
}
