//! Code-quality issue categories and the client-side issue selector.
//!
//! All four datasets are fetched once per graph. Switching category and
//! paging through a category never touch the network.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Backend, ClientError};
use crate::model::{GraphListing, TabularResult};
use crate::pagination::Pagination;
use crate::query::ResultPage;

/// A precomputed code-quality finding over a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    CircularDependency,
    MissingDependency,
    IncorrectDocstring,
    MissingDocstring,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 4] = [
        IssueCategory::CircularDependency,
        IssueCategory::MissingDependency,
        IssueCategory::IncorrectDocstring,
        IssueCategory::MissingDocstring,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::CircularDependency => "Circular Dependencies",
            Self::MissingDependency => "Missing Dependencies",
            Self::IncorrectDocstring => "Incorrect Docstrings",
            Self::MissingDocstring => "Missing Docstrings",
        }
    }

    /// Path segment under `/graph/{name}/`. The circular-dependency route
    /// keeps the backend's spelling.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::CircularDependency => "cylical-dependencies",
            Self::MissingDependency => "missing-dependencies",
            Self::IncorrectDocstring => "incorrect-docstrings",
            Self::MissingDocstring => "missing-docstrings",
        }
    }

    /// Short name accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::CircularDependency => "circular",
            Self::MissingDependency => "missing-deps",
            Self::IncorrectDocstring => "incorrect-docs",
            Self::MissingDocstring => "missing-docs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::CircularDependency => 0,
            Self::MissingDependency => 1,
            Self::IncorrectDocstring => 2,
            Self::MissingDocstring => 3,
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        IssueCategory::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.endpoint() == wanted)
            .ok_or_else(|| {
                let keys: Vec<_> = IssueCategory::ALL.iter().map(|c| c.key()).collect();
                format!("unknown issue category '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

/// Visual state of a category's summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// No findings: rendered green and not selectable.
    Healthy,
    /// At least one finding: rendered red and selectable.
    Unhealthy,
}

/// Summary card for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueCard {
    pub category: IssueCategory,
    pub value: usize,
    pub health: Health,
}

impl IssueCard {
    pub fn is_interactive(&self) -> bool {
        self.health == Health::Unhealthy
    }
}

/// All four issue datasets for one graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueReport {
    datasets: [TabularResult; 4],
}

impl IssueReport {
    pub fn new(datasets: [TabularResult; 4]) -> Self {
        Self { datasets }
    }

    /// Fetches every category concurrently; any failure fails the report.
    pub async fn fetch<B: Backend>(backend: &B, graph: &GraphListing) -> Result<Self, ClientError> {
        if !graph.status.is_ready() {
            return Err(ClientError::GraphNotReady(graph.name.clone()));
        }

        let name = graph.route_name();
        debug!(graph = name, "fetching issue report");

        let (circular, missing_deps, incorrect_docs, missing_docs) = futures::try_join!(
            backend.issues(name, IssueCategory::CircularDependency),
            backend.issues(name, IssueCategory::MissingDependency),
            backend.issues(name, IssueCategory::IncorrectDocstring),
            backend.issues(name, IssueCategory::MissingDocstring),
        )?;

        Ok(Self::new([circular, missing_deps, incorrect_docs, missing_docs]))
    }

    pub fn dataset(&self, category: IssueCategory) -> &TabularResult {
        &self.datasets[category.index()]
    }

    /// Summary cards in display order.
    pub fn cards(&self) -> Vec<IssueCard> {
        IssueCategory::ALL
            .into_iter()
            .map(|category| {
                let value = self.dataset(category).total();
                let health = if value == 0 {
                    Health::Healthy
                } else {
                    Health::Unhealthy
                };
                IssueCard {
                    category,
                    value,
                    health,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct ActiveCategory {
    category: IssueCategory,
    pagination: Pagination,
}

/// Chooses which category's detail table is shown and pages through it.
#[derive(Debug, Clone)]
pub struct IssueSelector {
    report: IssueReport,
    page_size: usize,
    active: Option<ActiveCategory>,
}

impl IssueSelector {
    pub fn new(report: IssueReport, page_size: usize) -> Self {
        Self {
            report,
            page_size,
            active: None,
        }
    }

    pub fn report(&self) -> &IssueReport {
        &self.report
    }

    pub fn selected(&self) -> Option<IssueCategory> {
        self.active.as_ref().map(|a| a.category)
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.active.as_ref().map(|a| &a.pagination)
    }

    /// Shows `category` from its first page.
    ///
    /// Healthy categories have no detail table: the selection is cleared and
    /// `None` is returned.
    pub fn select_category(&mut self, category: IssueCategory) -> Option<ResultPage> {
        let total = self.report.dataset(category).total();
        if total == 0 {
            self.active = None;
            return None;
        }

        self.active = Some(ActiveCategory {
            category,
            pagination: Pagination::with_total(self.page_size, total),
        });
        self.current_page()
    }

    /// Clears the selection (back to the summary cards).
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn next_page(&mut self) -> Option<ResultPage> {
        let active = self.active.as_mut()?;
        if !active.pagination.next() {
            return None;
        }
        self.current_page()
    }

    pub fn previous_page(&mut self) -> Option<ResultPage> {
        let active = self.active.as_mut()?;
        if !active.pagination.previous() {
            return None;
        }
        self.current_page()
    }

    /// The page of the selected category at the current offset.
    pub fn current_page(&self) -> Option<ResultPage> {
        let active = self.active.as_ref()?;
        let dataset = self.report.dataset(active.category);
        Some(ResultPage::Tabular {
            columns: dataset.columns.clone(),
            rows: active.pagination.slice(&dataset.data).to_vec(),
            total: active.pagination.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use serde_json::json;

    fn dataset(column: &str, n: usize) -> TabularResult {
        TabularResult {
            columns: vec![column.to_string()],
            data: (0..n).map(|i| Row(vec![json!(format!("{}-{}", column, i))])).collect(),
            size: None,
        }
    }

    fn report() -> IssueReport {
        IssueReport::new([
            dataset("cycle", 0),
            dataset("missing", 23),
            dataset("incorrect", 4),
            dataset("undocumented", 12),
        ])
    }

    #[test]
    fn test_cards_health() {
        let cards = report().cards();
        assert_eq!(cards[0].health, Health::Healthy);
        assert!(!cards[0].is_interactive());
        assert_eq!(cards[1].value, 23);
        assert!(cards[1].is_interactive());
    }

    #[test]
    fn test_healthy_category_has_no_table() {
        let mut selector = IssueSelector::new(report(), 10);
        assert!(selector.select_category(IssueCategory::CircularDependency).is_none());
        assert!(selector.pagination().is_none());
        assert!(selector.selected().is_none());
    }

    #[test]
    fn test_selecting_populates_table() {
        let mut selector = IssueSelector::new(report(), 10);
        let page = selector
            .select_category(IssueCategory::MissingDependency)
            .unwrap();
        match page {
            ResultPage::Tabular { columns, rows, total } => {
                assert_eq!(columns, vec!["missing"]);
                assert_eq!(rows.len(), 10);
                assert_eq!(total, 23);
            }
            other => panic!("unexpected page: {:?}", other),
        }
    }

    #[test]
    fn test_switching_back_restores_first_page() {
        let mut selector = IssueSelector::new(report(), 10);
        let original = selector
            .select_category(IssueCategory::MissingDependency)
            .unwrap();
        selector.next_page().unwrap();
        assert_eq!(selector.pagination().unwrap().offset(), 10);

        selector.select_category(IssueCategory::MissingDocstring).unwrap();
        let restored = selector
            .select_category(IssueCategory::MissingDependency)
            .unwrap();

        assert_eq!(restored, original);
        assert_eq!(selector.pagination().unwrap().offset(), 0);
    }

    #[test]
    fn test_client_side_paging() {
        let mut selector = IssueSelector::new(report(), 10);
        selector.select_category(IssueCategory::MissingDependency);
        selector.next_page().unwrap();
        let last = selector.next_page().unwrap();
        assert_eq!(last.len(), 3);
        assert!(selector.next_page().is_none());
        assert_eq!(selector.previous_page().unwrap().len(), 10);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("circular".parse(), Ok(IssueCategory::CircularDependency));
        assert_eq!("missing-docstrings".parse(), Ok(IssueCategory::MissingDocstring));
        assert!("bogus".parse::<IssueCategory>().is_err());
    }
}
