//! UI rendering for the TUI.

use ratatui::{prelude::*, widgets::Paragraph};

use repograph_core::lifecycle::Field;

use super::app::{App, InputMode, NewGraphScreen, Screen, SearchScreen, SearchTab};
use super::components::input::{self, TextField};
use super::components::results::{self, ResultsView};
use super::components::{graphs, issues, modal, panel, spinner, summary, tabs};

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(8),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(app, frame, chunks[0]);

    match &app.screen {
        Screen::Graphs(screen) => graphs::render(app, screen, frame, chunks[1]),
        Screen::Summary(screen) => summary::render(app, screen, frame, chunks[1]),
        Screen::Search(screen) => render_search(app, screen, frame, chunks[1]),
        Screen::Issues(screen) => issues::render(app, screen, frame, chunks[1]),
        Screen::NewGraph(screen) => render_new_graph(screen, frame, chunks[1]),
    }

    render_status_bar(app, frame, chunks[2]);

    if let Some(notification) = &app.notification {
        modal::render_notification(notification, frame, chunks[1]);
    }
    if let Some(dialog) = &app.delete_dialog {
        modal::render_delete(dialog, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " RepoGraph ",
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.screen.route().path(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_search(app: &App, screen: &SearchScreen, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tabs
            Constraint::Length(3), // Query
            Constraint::Min(5),    // Results
        ])
        .split(area);

    tabs::render(screen, frame, chunks[0]);

    match screen.tab {
        SearchTab::Semantic => input::render(
            TextField {
                title: "Query",
                value: &screen.input,
                focused: screen.input_mode == InputMode::Editing,
                placeholder: "Press 'i' to describe the code you are looking for...",
            },
            frame,
            chunks[1],
        ),
        SearchTab::Named => render_query_picker(screen, frame, chunks[1]),
    }

    let session = screen.session();
    let title = session
        .descriptor()
        .map(|d| d.label().to_string())
        .unwrap_or_else(|| "Results".to_string());
    results::render(
        ResultsView {
            title: &title,
            page: session.page(),
            pagination: session.page().map(|_| session.pagination()),
            loading: screen.loading,
            tick: app.tick,
            placeholder: match screen.tab {
                SearchTab::Semantic => "Type a query and press Enter.",
                SearchTab::Named => "Pick a query with j/k and press Enter.",
            },
        },
        frame,
        chunks[2],
    );
}

fn render_query_picker(screen: &SearchScreen, frame: &mut Frame, area: Rect) {
    let query = match screen.selected_query() {
        Some(query) => Span::styled(
            format!(
                "{} ({}/{})",
                query.name,
                screen.query_index + 1,
                screen.queries.len()
            ),
            Style::default().fg(Color::Yellow),
        ),
        None if screen.queries.is_empty() => Span::styled(
            "loading...",
            Style::default().fg(Color::DarkGray),
        ),
        None => Span::raw("none"),
    };
    let repository = screen.repository().unwrap_or("all repositories");

    let line = Line::from(vec![
        Span::raw("Query: "),
        query,
        Span::raw("   Repository: "),
        Span::styled(repository.to_string(), Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line).block(panel(" Query ", true)), area);
}

fn render_new_graph(screen: &NewGraphScreen, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let fields = [
        (Field::Name, "my-repo", chunks[0], chunks[1]),
        (Field::Description, "What this graph contains", chunks[2], chunks[3]),
        (Field::Files, "/path/to/repo1.zip, /path/to/repo2.zip", chunks[4], chunks[5]),
    ];

    for (field, placeholder, input_area, error_area) in fields {
        input::render(
            TextField {
                title: field.label(),
                value: screen.value(field),
                focused: screen.focus == field && !screen.submitting,
                placeholder,
            },
            frame,
            input_area,
        );
        if let Some(error) = screen.errors.get(field) {
            let line = Line::styled(format!("  {}", error), Style::default().fg(Color::Red));
            frame.render_widget(Paragraph::new(line), error_area);
        }
    }

    if screen.submitting {
        frame.render_widget(
            Paragraph::new("Uploading...").style(Style::default().fg(Color::Yellow)),
            chunks[6],
        );
    }
}

/// Render the status bar.
fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(busy) = &app.busy {
        let status = format!("{} {}", spinner(app.tick), busy);
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Yellow)),
            area,
        );
        return;
    }

    let hints = if app.delete_dialog.is_some() {
        "[y] Confirm  [n] Cancel"
    } else {
        match &app.screen {
            Screen::Graphs(_) => "[j/k] Move  [Enter] Open  [n] New  [d] Delete  [r] Refresh  [q] Quit",
            Screen::Summary(_) => "[s] Search  [i] Issues  [d] Delete  [Esc] Back  [q] Quit",
            Screen::Search(s) if s.input_mode == InputMode::Editing => "[Enter] Search  [Esc] Stop editing",
            Screen::Search(s) if s.tab == SearchTab::Named => {
                "[Tab] Switch  [j/k] Query  [r] Repository  [Enter] Run  [n/p] Page  [Esc] Back"
            }
            Screen::Search(_) => "[Tab] Switch  [i] Edit  [Enter] Search  [n/p] Page  [Esc] Back",
            Screen::Issues(_) => "[h/l] Card  [Enter] Select  [n/p] Page  [Esc] Back  [q] Quit",
            Screen::NewGraph(_) => "[Tab] Next field  [Enter] Build  [Esc] Cancel",
        }
    };

    let status_bar = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use repograph_core::{BackendClient, Config, GraphCatalog, GraphListing, GraphStatus};
    use tokio::sync::mpsc;

    fn listing(name: &str, status: GraphStatus) -> GraphListing {
        GraphListing {
            id: name.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            created: Utc::now(),
            status,
            neo4j_name: None,
        }
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let backend = Arc::new(BackendClient::new("http://127.0.0.1:9").unwrap());
        App::new(Config::default(), backend, tx, None)
    }

    #[test]
    fn test_graph_listing_shows_status() {
        let mut app = app();
        app.catalog = GraphCatalog::new(vec![
            listing("repo1", GraphStatus::Created),
            listing("repo2", GraphStatus::Pending),
        ]);

        let screen = draw(&app);
        assert!(screen.contains("repo1"));
        assert!(screen.contains("repo2"));
        assert!(screen.contains("Pending"));
        assert!(screen.contains("[n] New"));
    }

    #[test]
    fn test_delete_dialog_names_graph() {
        let mut app = app();
        let mut dialog = repograph_core::DeleteDialog::new(listing("repo1", GraphStatus::Created));
        dialog.open();
        app.delete_dialog = Some(dialog);

        let screen = draw(&app);
        assert!(screen.contains("Delete graph repo1?"));
        assert!(screen.contains("[y] Confirm"));
    }
}
