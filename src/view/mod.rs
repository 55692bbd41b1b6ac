//! Derived rendering of the session state.
//!
//! Everything here is a pure projection of the current surface text, tab
//! registry, and status: tab bar on the top row, text area with an
//! optional line-number gutter, status/prompt bar on the bottom row.

pub mod theme;

use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Block;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::storage::KeyValueStore;

pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    if area.height < 2 {
        return;
    }
    frame.render_widget(Block::new().style(app.theme.text()), area);

    let tab_area = Rect::new(area.x, area.y, area.width, 1);
    let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let text_area = Rect::new(area.x, area.y + 1, area.width, area.height - 2);

    draw_tab_bar(frame, app, tab_area);
    draw_text(frame, app, text_area);
    draw_status(frame, app, status_area);
}

fn draw_tab_bar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = app.theme;
    let active = app.session.active();
    let mut spans = Vec::new();
    for id in app.session.tabs().ids() {
        let marker = if app.session.is_dirty(id) { "*" } else { "" };
        let style = if active == Some(id.as_str()) {
            theme.tab_active()
        } else {
            theme.tab()
        };
        spans.push(Span::styled(format!(" {}{} ", id, marker), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Line::from(spans), area);
}

fn draw_text<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = app.theme;
    let surface = app.session.surface();
    let gutter_cols = app.gutter_cols();
    let (cursor_line, cursor_col) = app.cursor_line_col();

    let mut lines = Vec::new();
    for (index, raw) in surface
        .split('\n')
        .enumerate()
        .skip(app.scroll_top)
        .take(area.height as usize)
    {
        let mut spans = Vec::new();
        if gutter_cols > 0 {
            let style = if index == cursor_line {
                theme.gutter_current()
            } else {
                theme.gutter()
            };
            spans.push(Span::styled(
                format!("{:>width$} ", index + 1, width = gutter_cols - 1),
                style,
            ));
        }
        spans.push(Span::styled(clip_columns(raw, app.scroll_left), theme.text()));
        lines.push(Line::from(spans));
    }
    frame.render_widget(Text::from(lines), area);

    if app.prompt.is_none() && app.session.active().is_some() {
        let x = gutter_cols + cursor_col.saturating_sub(app.scroll_left);
        let y = cursor_line.saturating_sub(app.scroll_top);
        if (x as u16) < area.width && (y as u16) < area.height {
            frame.set_cursor_position(Position::new(area.x + x as u16, area.y + y as u16));
        }
    }
}

fn draw_status<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = app.theme;
    frame.render_widget(Block::new().style(theme.status()), area);

    if let Some(prompt) = &app.prompt {
        let text = format!("{}: {}", prompt.label(), prompt.input);
        let cursor_x = area.x + (text.chars().count() as u16).min(area.width.saturating_sub(1));
        frame.render_widget(Line::styled(text, theme.status()), area);
        frame.set_cursor_position(Position::new(cursor_x, area.y));
        return;
    }

    let (line, col) = app.cursor_line_col();
    let mut right = format!("Ln {}, Col {}", line + 1, col + 1);
    if let Some(summary) = app.find.summary() {
        right = format!("find {}  {}", summary, right);
    }
    right.push_str(&format!("  [{}]", theme.name()));

    let width = area.width as usize;
    let left_width = width.saturating_sub(right.chars().count() + 1);
    let left: String = app.status.chars().take(left_width).collect();
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());
    let text = format!("{}{}{}", left, " ".repeat(pad), right);
    frame.render_widget(Line::styled(text, theme.status()), area);
}

/// Drop the first `skip` display columns of a line. A wide character that
/// straddles the boundary is dropped entirely.
fn clip_columns(line: &str, skip: usize) -> String {
    let mut to_skip = skip;
    let mut out = String::new();
    for ch in line.chars() {
        if to_skip > 0 {
            let w = ch.width().unwrap_or(0);
            to_skip = to_skip.saturating_sub(w.max(1));
            continue;
        }
        out.push(ch);
    }
    out
}
