//! Single-line text field.

use ratatui::{prelude::*, widgets::Paragraph};

use super::panel;

/// What to draw for one field.
pub struct TextField<'a> {
    pub title: &'a str,
    pub value: &'a str,
    pub focused: bool,
    pub placeholder: &'a str,
}

/// Render the field. The cursor is placed at the end of the value when
/// the field is focused.
pub fn render(field: TextField<'_>, frame: &mut Frame, area: Rect) {
    let title = format!(" {} ", field.title);
    let block = panel(&title, field.focused);
    let inner_area = block.inner(area);

    let (text, text_style) = if field.focused {
        (format!("{}_", field.value), Style::default().fg(Color::White))
    } else if field.value.is_empty() {
        (field.placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (field.value.to_string(), Style::default().fg(Color::Gray))
    };

    frame.render_widget(Paragraph::new(text).style(text_style).block(block), area);

    if field.focused {
        let cursor_x = (inner_area.x + field.value.chars().count() as u16)
            .min(inner_area.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(cursor_x, inner_area.y));
    }
}
