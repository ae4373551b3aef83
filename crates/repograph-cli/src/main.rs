use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use repograph_core::{Config, IssueCategory};

mod commands;
mod logging;
mod output;
mod tui;

use commands::Context;
use logging::{init_logging, LogTarget};

#[derive(Parser)]
#[command(name = "repograph")]
#[command(version, about = "Browse, search and inspect RepoGraph code graphs", long_about = None)]
struct Cli {
    /// Backend origin, overriding config and environment
    #[arg(long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List graphs and their build status
    Graphs {
        /// Keep polling and report graphs as they finish building
        #[arg(long)]
        watch: bool,
    },
    /// Show node and relationship counts of a graph
    Summary {
        graph: String,
    },
    /// Search a graph
    Search {
        #[command(subcommand)]
        kind: SearchCommands,
    },
    /// List the predefined queries of a graph
    Queries {
        graph: String,
    },
    /// List the repositories inside a graph
    Repositories {
        graph: String,
    },
    /// Show the call graph around a function node
    CallGraph {
        graph: String,
        node_id: String,
    },
    /// Show code-quality issues of a graph
    Issues {
        graph: String,
        /// Show the detail table of one category (circular, missing-deps, incorrect-docs, missing-docs)
        #[arg(short, long)]
        category: Option<IssueCategory>,
        /// Row offset within the category
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Build a new graph from repository archives
    New {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Repository archives to upload
        files: Vec<PathBuf>,
    },
    /// Delete a graph
    Delete {
        graph: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Start the interactive terminal UI
    Tui {
        /// Open this graph first
        #[arg(long)]
        graph: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SearchCommands {
    /// Natural-language search over function summaries
    Semantic {
        graph: String,
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Run a predefined query by id
    Query {
        graph: String,
        id: u32,
        /// Restrict results to one repository
        #[arg(short, long)]
        repository: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    color_eyre::install()?;

    let mut config = Config::load()?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
        config.validate()?;
    }

    let target = match cli.command {
        Commands::Tui { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _guard = init_logging(target, &config.storage.log_path(), cli.verbose);

    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Graphs { watch } => commands::graphs::list(&ctx, watch).await?,
        Commands::Summary { graph } => commands::graphs::summary(&ctx, &graph).await?,
        Commands::Search { kind } => match kind {
            SearchCommands::Semantic {
                graph,
                query,
                limit,
                offset,
            } => commands::search::semantic(&ctx, &graph, &query, limit, offset).await?,
            SearchCommands::Query {
                graph,
                id,
                repository,
                limit,
                offset,
            } => commands::search::named(&ctx, &graph, id, repository, limit, offset).await?,
        },
        Commands::Queries { graph } => commands::search::queries(&ctx, &graph).await?,
        Commands::Repositories { graph } => commands::search::repositories(&ctx, &graph).await?,
        Commands::CallGraph { graph, node_id } => {
            commands::graphs::call_graph(&ctx, &graph, &node_id).await?
        }
        Commands::Issues {
            graph,
            category,
            offset,
        } => commands::issues::issues(&ctx, &graph, category, offset).await?,
        Commands::New {
            name,
            description,
            files,
        } => commands::graphs::create(&ctx, name, description, files).await?,
        Commands::Delete { graph, yes } => commands::graphs::delete(&ctx, &graph, yes).await?,
        Commands::Tui { graph } => tui::run(ctx, graph).await?,
        Commands::Config => print!("{}", ctx.config.to_toml()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_category() {
        let cli = Cli::try_parse_from(["repograph", "issues", "repo1", "-c", "missing-docs"]).unwrap();
        match cli.command {
            Commands::Issues { category, .. } => {
                assert_eq!(category, Some(IssueCategory::MissingDocstring))
            }
            _ => panic!("expected issues command"),
        }
    }

    #[test]
    fn test_global_backend_url() {
        let cli = Cli::try_parse_from([
            "repograph",
            "summary",
            "repo1",
            "--backend-url",
            "http://backend:3000",
        ])
        .unwrap();
        assert_eq!(cli.backend_url.as_deref(), Some("http://backend:3000"));
    }
}
