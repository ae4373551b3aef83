//! Widgets shared by the screens.

pub mod graphs;
pub mod input;
pub mod issues;
pub mod modal;
pub mod results;
pub mod summary;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders};

/// Rounded block used by every panel.
pub fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Loading indicator frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}
