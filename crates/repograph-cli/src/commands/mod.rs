//! One-shot subcommands.

pub mod graphs;
pub mod issues;
pub mod search;

use color_eyre::eyre::Result;
use repograph_core::{BackendClient, Config, GraphCatalog, GraphListing};

use crate::output::with_spinner;

/// What every command needs: the effective configuration and a client.
pub struct Context {
    pub config: Config,
    pub backend: BackendClient,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let backend = BackendClient::from_config(&config.backend)?;
        Ok(Self { config, backend })
    }

    pub async fn catalog(&self) -> Result<GraphCatalog> {
        let mut catalog = GraphCatalog::default();
        with_spinner("Loading graphs...", catalog.refresh(&self.backend)).await?;
        Ok(catalog)
    }

    /// Looks up a graph that has finished building.
    pub async fn ready_graph(&self, key: &str) -> Result<GraphListing> {
        let catalog = self.catalog().await?;
        Ok(catalog.ensure_ready(key)?.clone())
    }
}
