use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::StoreError;

/// Replace every character with `*` so secrets keep their length on screen.
pub(crate) fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Render one `Label: value` row of a form, highlighting the focused field and
/// hinting at empty required fields.
pub(crate) fn field_line(
    field_name: &str,
    value: &str,
    is_active: bool,
    masked: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else if masked {
        mask(value)
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column of the text cursor after `prefix` and `value_len` characters,
/// pinned to the last column of `inner` when the value runs past it.
pub(crate) fn cursor_x(inner: Rect, prefix: &str, value_len: usize) -> u16 {
    let offset = prefix.chars().count().saturating_add(value_len);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    let last = inner.x.saturating_add(inner.width.saturating_sub(1));
    inner.x.saturating_add(offset).min(last)
}

/// Pick the message worth showing in the footer. Store errors already read as
/// complete sentences; anything else reports its innermost cause.
pub(crate) fn surface_error(err: &Error) -> String {
    if let Some(store_err) = err.downcast_ref::<StoreError>() {
        return store_err.to_string();
    }
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
