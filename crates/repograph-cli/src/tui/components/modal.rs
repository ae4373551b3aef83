//! Overlays: the delete confirmation and notifications.

use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph, Wrap},
};

use repograph_core::DeleteDialog;

use super::panel;
use crate::tui::app::{Notification, NotificationKind};

/// A rectangle of at most `width` x `height` centred in `area`.
pub fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_delete(dialog: &DeleteDialog, frame: &mut Frame, area: Rect) {
    let area = centered(56, 7, area);
    let body = vec![
        Line::from(vec![
            Span::raw("Delete graph "),
            Span::styled(
                dialog.graph().name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::from("This cannot be undone."),
        Line::default(),
        Line::styled("[y] Delete  [n] Cancel", Style::default().fg(Color::DarkGray)),
    ];

    let block = panel(" Confirm ", true).border_style(Style::default().fg(Color::Red));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(body).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Drawn above the status bar, full width.
pub fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect) {
    let (title, color) = match notification.kind {
        NotificationKind::Info => (" Info ", Color::Cyan),
        NotificationKind::Error => (" Error ", Color::Red),
    };
    let height = 3.min(area.height);
    let area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(height),
        width: area.width,
        height,
    };

    let block = panel(title, false)
        .border_style(Style::default().fg(color))
        .title_bottom(Line::from(" Esc to dismiss ").right_aligned());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(notification.message.as_str())
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
