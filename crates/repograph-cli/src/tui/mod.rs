//! Interactive terminal UI for RepoGraph.
//!
//! Screens mirror the web routes:
//! - graph listing, refreshed in the background
//! - graph summary
//! - semantic and predefined-query search
//! - code-quality issues
//! - new graph form

mod app;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use app::App;
use event::{Event, EventHandler};
use repograph_core::ListingPoller;

use crate::commands::Context;

/// Run the TUI application, opening `graph` first when given.
pub async fn run(ctx: Context, graph: Option<String>) -> Result<()> {
    let Context { config, backend } = ctx;
    let backend = Arc::new(backend);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let events = EventHandler::new();

    // Forward background listing polls into the event stream.
    let (listing_tx, mut listing_rx) = mpsc::unbounded_channel();
    let poller = ListingPoller::new(backend.clone(), config.listing.poll_interval()).spawn(listing_tx);
    let forward_tx = events.sender();
    let forwarder = tokio::spawn(async move {
        while let Some(update) = listing_rx.recv().await {
            if forward_tx.send(Event::Listing(update)).is_err() {
                break;
            }
        }
    });

    let mut app = App::new(config, backend, events.sender(), graph);
    let result = app.run(&mut terminal, events).await;

    poller.abort();
    forwarder.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
