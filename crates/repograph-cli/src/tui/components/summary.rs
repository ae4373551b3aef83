//! Node and relationship counts of one graph.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Row, Table},
};

use super::{panel, spinner};
use crate::tui::app::{App, SummaryScreen};

pub fn render(app: &App, screen: &SummaryScreen, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    let mut header = vec![Line::from(Span::styled(
        screen.graph.name.clone(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];
    if !screen.graph.description.is_empty() {
        header.push(Line::from(screen.graph.description.clone()));
    }
    frame.render_widget(Paragraph::new(header).block(panel(" Graph ", false)), chunks[0]);

    let block = panel(" Summary ", true);
    let Some(summary) = &screen.summary else {
        let message = if !screen.graph.status.is_ready() {
            "This graph is still being built.".to_string()
        } else if screen.loading {
            format!("{} Loading summary...", spinner(app.tick))
        } else {
            "Summary unavailable".to_string()
        };
        let body = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(body, chunks[1]);
        return;
    };

    if summary.is_empty {
        let body = Paragraph::new("This graph has no nodes.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(body, chunks[1]);
        return;
    }

    let rows = summary.stats().into_iter().map(|(label, count)| {
        Row::new(vec![
            Line::from(label),
            Line::from(count.to_string()).alignment(Alignment::Right),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(22), Constraint::Length(12)]).block(block);
    frame.render_widget(table, chunks[1]);
}
