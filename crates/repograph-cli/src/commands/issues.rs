use color_eyre::eyre::Result;
use repograph_core::{Health, IssueCategory, IssueReport, IssueSelector};

use super::Context;
use crate::output::{format_page, format_pagination, with_spinner};

pub async fn issues(ctx: &Context, graph: &str, category: Option<IssueCategory>, offset: usize) -> Result<()> {
    let graph = ctx.ready_graph(graph).await?;
    let report = with_spinner("Loading issues...", IssueReport::fetch(&ctx.backend, &graph)).await?;

    for card in report.cards() {
        let marker = match card.health {
            Health::Healthy => "ok",
            Health::Unhealthy => "!!",
        };
        println!(
            "  [{}] {:<24}{:>6}   ({})",
            marker,
            card.category.title(),
            card.value,
            card.category.key()
        );
    }

    let Some(category) = category else {
        return Ok(());
    };

    let mut selector = IssueSelector::new(report, ctx.config.issues.page_size);
    let Some(mut page) = selector.select_category(category) else {
        println!("\nNo {} found.", category.title().to_lowercase());
        return Ok(());
    };

    // Paging is local: the whole dataset is already loaded.
    while selector
        .pagination()
        .is_some_and(|p| p.offset() + p.limit() <= offset)
    {
        match selector.next_page() {
            Some(next) => page = next,
            None => break,
        }
    }

    println!("\n{}\n", category.title());
    println!("{}", format_page(&page));
    if let Some(pagination) = selector.pagination() {
        println!("\n{}", format_pagination(pagination));
    }
    Ok(())
}
