use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;
use color_eyre::eyre::Result;
use repograph_core::{
    create_graph, delete_graph, Backend, DeleteDialog, GraphCatalog, GraphListing, ListingPoller,
    NewGraphForm,
};
use tokio::sync::mpsc;

use super::Context;
use crate::output::{format_table, with_spinner};

pub async fn list(ctx: &Context, watch: bool) -> Result<()> {
    let catalog = ctx.catalog().await?;
    println!("{}", listing_table(catalog.graphs()));

    if watch {
        watch_listing(ctx, catalog).await?;
    }
    Ok(())
}

fn listing_table(graphs: &[GraphListing]) -> String {
    if graphs.is_empty() {
        return "No graphs yet. Create one with 'repograph new'.".to_string();
    }
    let now = Utc::now();
    let columns: Vec<String> = ["Name", "Status", "Created", "Description"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows: Vec<Vec<String>> = graphs
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                g.status.display_name().to_string(),
                g.created_ago(now),
                g.description.clone(),
            ]
        })
        .collect();
    format_table(&columns, &rows)
}

/// Polls the listing until Ctrl-C, reporting graphs as they finish building.
async fn watch_listing(ctx: &Context, mut catalog: GraphCatalog) -> Result<()> {
    let interval = ctx.config.listing.poll_interval();
    println!(
        "\nWatching for changes every {}s (Ctrl-C to stop)",
        interval.as_secs()
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = ListingPoller::new(ctx.backend.clone(), interval).spawn(tx);

    loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(update) = update else { break };
                let before = catalog.len();
                catalog.replace(update.graphs);
                for name in &update.became_ready {
                    println!("Graph '{}' is ready", name);
                }
                if catalog.len() != before {
                    println!("{}", listing_table(catalog.graphs()));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    Ok(())
}

pub async fn summary(ctx: &Context, graph: &str) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let summary = with_spinner("Loading summary...", ctx.backend.summary(graph.route_name())).await?;

    println!("{}", graph.name);
    if !graph.description.is_empty() {
        println!("{}", graph.description);
    }
    println!();
    if summary.is_empty {
        println!("This graph is empty.");
        return Ok(());
    }
    for (label, value) in summary.stats() {
        println!("  {:<22}{}", label, value);
    }
    Ok(())
}

pub async fn call_graph(ctx: &Context, graph: &str, node_id: &str) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let call_graph = with_spinner(
        "Loading call graph...",
        ctx.backend.call_graph(graph.route_name(), node_id),
    )
    .await?;

    println!("Functions ({}):", call_graph.nodes.len());
    for node in &call_graph.nodes {
        println!("  [{}] {}", node.id, node.label);
    }
    println!("\nCalls ({}):", call_graph.edges.len());
    for (from, to) in call_graph.labelled_edges() {
        println!("  {} -> {}", from, to);
    }
    Ok(())
}

pub async fn create(ctx: &Context, name: String, description: String, files: Vec<PathBuf>) -> Result<()> {
    let form = NewGraphForm::new(name, description, files);
    let route = with_spinner("Uploading repositories...", create_graph(&ctx.backend, &form)).await?;

    println!("Graph '{}' submitted. It is listed as Pending until built.", form.name.trim());
    println!("View it at {}", route);
    Ok(())
}

pub async fn delete(ctx: &Context, graph: &str, yes: bool) -> Result<()> {
    let mut catalog = ctx.catalog().await?;
    let listing = catalog.require(graph)?.clone();

    let mut dialog = DeleteDialog::new(listing);
    if !yes && !prompt_confirmation(&dialog.graph().name)? {
        println!("Aborted.");
        return Ok(());
    }
    dialog.open();
    let confirmed = dialog.confirm()?;

    let name = confirmed.graph().name.clone();
    let route = with_spinner(
        "Deleting graph...",
        delete_graph(&ctx.backend, confirmed, &mut catalog),
    )
    .await?;

    println!("Deleted graph '{}' ({} remaining)", name, catalog.len());
    println!("Back to {}", route);
    Ok(())
}

fn prompt_confirmation(name: &str) -> Result<bool> {
    print!(
        "Delete graph '{}'? This action cannot be undone. [y/N] ",
        name
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
