//! Result table with a pagination footer.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Row, Table},
};

use repograph_core::{Pagination, ResultPage};

use super::{panel, spinner};
use crate::output::page_table;

/// What the results panel shows.
pub struct ResultsView<'a> {
    pub title: &'a str,
    pub page: Option<&'a ResultPage>,
    pub pagination: Option<&'a Pagination>,
    pub loading: bool,
    pub tick: usize,
    /// Shown before anything has been run.
    pub placeholder: &'a str,
}

pub fn render(view: ResultsView<'_>, frame: &mut Frame, area: Rect) {
    let title = if view.loading {
        format!(" {} {} ", view.title, spinner(view.tick))
    } else {
        format!(" {} ", view.title)
    };
    let block = panel(&title, false);

    let Some(page) = view.page else {
        let body = Paragraph::new(view.placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(body, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if page.is_empty() {
        frame.render_widget(
            Paragraph::new("No results").style(Style::default().fg(Color::DarkGray)),
            chunks[0],
        );
    } else {
        let (columns, rows) = page_table(page);
        let widths = vec![Constraint::Fill(1); columns.len().max(1)];
        let header = Row::new(columns)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));
        let table = Table::new(rows.into_iter().map(Row::new), widths)
            .header(header)
            .column_spacing(2);
        frame.render_widget(table, chunks[0]);
    }

    if let Some(pagination) = view.pagination {
        frame.render_widget(footer(pagination), chunks[1]);
    }
}

fn footer(pagination: &Pagination) -> Paragraph<'static> {
    let enabled = Style::default().fg(Color::Yellow);
    let disabled = Style::default().fg(Color::DarkGray);

    let line = Line::from(vec![
        Span::raw(pagination.summary()),
        Span::raw("   "),
        Span::styled(
            "[p] Previous",
            if pagination.has_previous() { enabled } else { disabled },
        ),
        Span::raw("  "),
        Span::styled(
            "[n] Next",
            if pagination.has_next() { enabled } else { disabled },
        ),
    ]);
    Paragraph::new(line)
}
