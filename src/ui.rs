//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - The LED grid for the current frame, with the edit cursor
//! - The frame list, highlighting the current frame and clashing names
//! - The generated C source for the whole animation
//! - Status bar with mode, messages, playback state and frame position
//!
//! Rendering only reads [`AppState`]; it never changes the model.

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::formats::source;
use crate::model::{Animation, AppMode, AppState, COLS, ROWS};

/// Terminal cells used to draw one LED.
const CELL_WIDTH: u16 = 2;
/// Width of the left column (grid and frame list), including borders.
const LEFT_PANEL_WIDTH: u16 = COLS as u16 * CELL_WIDTH + 2;
/// Height of the grid panel, including borders.
const MATRIX_PANEL_HEIGHT: u16 = ROWS as u16 + 2;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;

const HELP_TEXT: &[(&str, &str)] = &[
    ("h j k l / arrows", "Move cursor"),
    ("Space / Enter", "Toggle LED"),
    ("c / f / i", "Clear / fill / invert frame"),
    ("a", "Add frame"),
    ("d", "Duplicate frame"),
    ("x", "Delete frame"),
    ("n / ]", "Next frame"),
    ("N / [", "Previous frame"),
    ("p", "Play / pause"),
    ("r", "Rename frame"),
    ("y", "Copy C code to clipboard"),
    (":w [file]", "Export (.json, .h, .ino)"),
    (":e [file]", "Import JSON project"),
    (":sketch [file]", "Export Arduino sketch"),
    (":<n>", "Go to frame n"),
    (":q", "Quit"),
];

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Main layout: content area + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);

    // Left column (grid + frame list) and code panel
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LEFT_PANEL_WIDTH), Constraint::Min(10)])
        .split(main_layout[0]);

    let left_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(MATRIX_PANEL_HEIGHT), Constraint::Min(3)])
        .split(content_layout[0]);

    render_matrix_panel(frame, state, left_layout[0]);
    render_frames_panel(frame, state, left_layout[1]);
    render_code_panel(frame, state, content_layout[1]);
    render_status_bar(frame, state, main_layout[1]);

    if state.show_help {
        render_help(frame, area);
    }
}

/// Builds the grid lines for the current frame.
pub fn matrix_lines(state: &AppState) -> Vec<Line<'static>> {
    let g = &state.glyphs;
    let current = state.animation.current_frame();
    let editing = state.mode == AppMode::Normal && !state.playback.is_playing();

    current
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, &v)| {
                    let lit = v == 1;
                    let under_cursor = editing && state.cursor.row == row && state.cursor.col == col;
                    let (symbol, color) = match (under_cursor, lit) {
                        (true, true) => (g.cursor_on, Color::LightRed),
                        (true, false) => (g.cursor_off, Color::Yellow),
                        (false, true) => (g.led_on, Color::Red),
                        (false, false) => (g.led_off, Color::DarkGray),
                    };
                    Span::styled(symbol, Style::default().fg(color))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Renders the LED grid panel.
fn render_matrix_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let current = state.animation.current_frame();
    let title = format!(" {} ", current.name);
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(matrix_lines(state)).block(block), area);
}

/// Renders the list of frames in playback order.
fn render_frames_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let anim = &state.animation;
    let duplicates = anim.duplicate_names();
    let visible = area.height.saturating_sub(2) as usize;
    // Keep the current frame in view
    let first = (anim.current() + 1).saturating_sub(visible);

    let lines: Vec<Line> = anim
        .frames()
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, f)| {
            let is_current = i == anim.current();
            let marker = if is_current { state.glyphs.current_marker } else { " " };
            let mut style = if is_current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            if duplicates.contains(&f.name.as_str()) {
                style = style.fg(Color::Red);
            }
            Line::from(Span::styled(
                format!("{} {:>3} {} ({})", marker, i + 1, f.name, f.lit_count()),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Frames {} ", frame_indicator(anim)));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the generated C source, or the reason it cannot be generated.
fn render_code_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" C source (y to copy) ");
    let paragraph = match source::export(&state.animation) {
        Ok(code) => Paragraph::new(code),
        Err(e) => Paragraph::new(e.to_string()).style(Style::default().fg(Color::Red)),
    };
    frame.render_widget(paragraph.block(block), area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let message = state.status_message.as_deref().unwrap_or("");
    let (mode_str, input, input_ok) = match &state.mode {
        AppMode::Normal => ("NORMAL", None, true),
        AppMode::Command(cmd) => ("COMMAND", Some(format!(":{}", cmd)), true),
        AppMode::Rename { name, .. } => (
            "RENAME",
            Some(format!("Name: {}", name)),
            state.rename_is_valid(),
        ),
    };

    let left_content = match input {
        Some(input) if !input_ok => format!(" {} | {}  (no spaces allowed) ", mode_str, input),
        Some(input) => format!(" {} | {} ", mode_str, input),
        None => format!(" {} | {} ", mode_str, message),
    };

    let playback = if state.playback.is_playing() {
        state.glyphs.playing
    } else {
        state.glyphs.paused
    };
    let position_info = format!(
        "{} | Frame {} | Row {} Col {} ",
        playback,
        frame_indicator(&state.animation),
        state.cursor.row + 1,
        state.cursor.col + 1
    );

    let bar_color = if input_ok { Color::Cyan } else { Color::LightRed };
    let left_len = left_content.chars().count();
    let right_len = position_info.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(bar_color)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + right_len)),
            Style::default().bg(bar_color),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(bar_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Renders the key binding overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let width = 50.min(area.width);
    let height = (HELP_TEXT.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help (any key to close) ");
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Position indicator, 1-based: "2 / 5".
pub fn frame_indicator(animation: &Animation) -> String {
    format!("{} / {}", animation.current() + 1, animation.frame_count())
}
