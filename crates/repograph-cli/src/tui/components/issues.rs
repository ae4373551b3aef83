//! Issue summary cards and the detail table of the selected category.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use repograph_core::{Health, IssueCard};

use super::results::{self, ResultsView};
use super::{panel, spinner};
use crate::tui::app::{App, IssuesScreen};

pub fn render(app: &App, screen: &IssuesScreen, frame: &mut Frame, area: Rect) {
    let Some(selector) = &screen.selector else {
        let message = if screen.loading {
            format!("{} Loading issues...", spinner(app.tick))
        } else {
            "Issues unavailable".to_string()
        };
        let body = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(panel(" Issues ", false));
        frame.render_widget(body, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    let cards = selector.report().cards();
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(chunks[0]);

    let selected = selector.selected();
    for (i, card) in cards.iter().enumerate() {
        let focused = i == screen.card;
        let active = selected == Some(card.category);
        render_card(card, focused, active, frame, card_areas[i]);
    }

    let title = selected.map(|c| c.title()).unwrap_or("Details");
    results::render(
        ResultsView {
            title,
            page: screen.page.as_ref(),
            pagination: selector.pagination(),
            loading: false,
            tick: app.tick,
            placeholder: "Select a category with issues to see the details.",
        },
        frame,
        chunks[1],
    );
}

fn render_card(card: &IssueCard, focused: bool, active: bool, frame: &mut Frame, area: Rect) {
    let color = match card.health {
        Health::Healthy => Color::Green,
        Health::Unhealthy => Color::Red,
    };
    let mut title_style = Style::default().fg(color);
    if active {
        title_style = title_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }

    let body = vec![
        Line::styled(card.category.title(), title_style),
        Line::styled(
            card.value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];

    let paragraph = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("", focused));
    frame.render_widget(paragraph, area);
}
