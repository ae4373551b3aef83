use color_eyre::eyre::{eyre, Result};
use repograph_core::{Backend, QueryDescriptor, SearchSession};

use super::Context;
use crate::output::{format_page, format_pagination, with_spinner};

pub async fn semantic(
    ctx: &Context,
    graph: &str,
    query: &[String],
    limit: Option<usize>,
    offset: usize,
) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let limit = limit.unwrap_or(ctx.config.search.semantic_limit);

    let mut session = SearchSession::new(graph, limit);
    let descriptor = QueryDescriptor::semantic(query.join(" "));
    with_spinner(
        "Searching...",
        session.execute(ctx.backend.clone(), descriptor, None, offset),
    )
    .await?;

    print_session(&session);
    Ok(())
}

pub async fn named(
    ctx: &Context,
    graph: &str,
    query_id: u32,
    repository: Option<String>,
    limit: Option<usize>,
    offset: usize,
) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let limit = limit.unwrap_or(ctx.config.search.query_limit);

    let available = ctx.backend.available_queries(graph.route_name()).await?;
    let query = available
        .into_iter()
        .find(|q| q.id == query_id)
        .ok_or_else(|| eyre!("No query with id {} (see 'repograph queries {}')", query_id, graph.name))?;

    let mut session = SearchSession::new(graph, limit);
    with_spinner(
        "Running query...",
        session.execute(ctx.backend.clone(), QueryDescriptor::Named(query), repository, offset),
    )
    .await?;

    print_session(&session);
    Ok(())
}

fn print_session(session: &SearchSession) {
    if let Some(descriptor) = session.descriptor() {
        match session.repository() {
            Some(repo) => println!("{} (repository: {})\n", descriptor.label(), repo),
            None => println!("{}\n", descriptor.label()),
        }
    }
    if let Some(page) = session.page() {
        println!("{}", format_page(page));
    }
    println!("\n{}", format_pagination(session.pagination()));
}

pub async fn queries(ctx: &Context, graph: &str) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let queries = with_spinner(
        "Loading queries...",
        ctx.backend.available_queries(graph.route_name()),
    )
    .await?;

    if queries.is_empty() {
        println!("No predefined queries for this graph.");
    }
    for query in queries {
        println!("{:>4}  {}", query.id, query.name);
    }
    Ok(())
}

pub async fn repositories(ctx: &Context, graph: &str) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let repositories = with_spinner(
        "Loading repositories...",
        ctx.backend.repositories(graph.route_name()),
    )
    .await?;

    for repository in repositories {
        println!("{}", repository);
    }
    Ok(())
}
