//! Graph listing table.

use chrono::Utc;
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Row, Table, TableState},
};

use repograph_core::GraphStatus;

use super::{panel, spinner};
use crate::tui::app::{App, GraphsScreen};

pub fn render(app: &App, screen: &GraphsScreen, frame: &mut Frame, area: Rect) {
    let title = if screen.loading {
        format!(" Graphs {} ", spinner(app.tick))
    } else {
        format!(" Graphs ({}) ", app.catalog.len())
    };
    let block = panel(&title, true);

    if app.catalog.is_empty() {
        let message = if screen.loading {
            "Loading graphs..."
        } else {
            "No graphs yet. Press 'n' to build one."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let now = Utc::now();
    let rows = app.catalog.graphs().iter().map(|graph| {
        let status_style = match graph.status {
            GraphStatus::Created => Style::default().fg(Color::Green),
            GraphStatus::Pending => Style::default().fg(Color::Yellow),
        };
        Row::new(vec![
            Line::from(graph.name.clone()),
            Line::styled(graph.status.display_name(), status_style),
            Line::from(graph.created_ago(now)),
            Line::from(graph.description.clone()),
        ])
    });

    let header = Row::new(["Name", "Status", "Created", "Description"])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(screen.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
