//! Tab bar of the search screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs as RataTabs},
};

use crate::tui::app::{SearchScreen, SearchTab};

/// Render the tab bar.
pub fn render(screen: &SearchScreen, frame: &mut Frame, area: Rect) {
    let titles = [SearchTab::Semantic, SearchTab::Named].map(SearchTab::title);
    let title = format!(" {} ", screen.graph.name);

    let tabs = RataTabs::new(titles)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(screen.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");

    frame.render_widget(tabs, area);
}
