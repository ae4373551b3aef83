//! Graph metadata returned by the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Processing status of a graph.
///
/// A graph is uploaded as `Pending` and moves to `Created` once the
/// backend has finished building it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GraphStatus {
    Pending,
    /// Older backends omit the status entirely; their graphs are always built.
    #[default]
    Created,
}

impl GraphStatus {
    pub fn is_ready(self) -> bool {
        self == GraphStatus::Created
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GraphStatus::Pending => "Pending",
            GraphStatus::Created => "Created",
        }
    }
}

/// A graph entry from `/metadata/graphs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphListing {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "timestamp")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub status: GraphStatus,
    /// Name of the backing database, used in routes when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neo4j_name: Option<String>,
}

impl GraphListing {
    /// The name that addresses this graph in backend paths and routes.
    pub fn route_name(&self) -> &str {
        self.neo4j_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether `key` refers to this graph by id, display name or route name.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name == key || self.route_name() == key
    }

    /// Human-readable age, e.g. "3 hours ago".
    pub fn created_ago(&self, now: DateTime<Utc>) -> String {
        relative_time(self.created, now)
    }
}

/// Node and relationship counts from `/graph/{name}/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSummary {
    pub is_empty: bool,
    pub nodes_total: u64,
    pub relationships_total: u64,
    pub repositories: u64,
    pub packages: u64,
    pub modules: u64,
    pub functions: u64,
    pub classes: u64,
}

impl GraphSummary {
    /// Labelled counts in display order.
    pub fn stats(&self) -> [(&'static str, u64); 7] {
        [
            ("Total Nodes", self.nodes_total),
            ("Total Relationships", self.relationships_total),
            ("Repositories", self.repositories),
            ("Packages", self.packages),
            ("Modules", self.modules),
            ("Functions", self.functions),
            ("Classes", self.classes),
        ]
    }
}

/// A function node in a call graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphFunction {
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub title: String,
}

/// A call from one function to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphRelationship {
    pub from_node: i64,
    pub to_node: i64,
}

/// Call graph rooted at a node, from `/graph/{name}/node/{id}/call_graph`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    #[serde(default)]
    pub nodes: Vec<CallGraphFunction>,
    #[serde(default)]
    pub edges: Vec<CallGraphRelationship>,
}

impl CallGraph {
    pub fn label(&self, id: i64) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.label.as_str())
    }

    /// Edges as `(caller, callee)` labels; unknown ids fall back to `#id`.
    pub fn labelled_edges(&self) -> Vec<(String, String)> {
        let name = |id: i64| {
            self.label(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", id))
        };
        self.edges
            .iter()
            .map(|e| (name(e.from_node), name(e.to_node)))
            .collect()
    }
}

fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }
    let (value, unit) = match secs {
        0..=44 => return "a few seconds ago".to_string(),
        45..=3_599 => ((secs + 30) / 60, "minute"),
        3_600..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        86_400..=2_591_999 => ((secs + 43_200) / 86_400, "day"),
        2_592_000..=31_535_999 => ((secs + 1_296_000) / 2_592_000, "month"),
        _ => ((secs + 15_768_000) / 31_536_000, "year"),
    };
    let value = value.max(1);
    if value == 1 {
        format!("a {} ago", unit).replace("a hour", "an hour")
    } else {
        format!("{} {}s ago", value, unit)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Accepts RFC 3339 and naive ISO timestamps (the latter read as UTC).
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_listing_from_backend_json() {
        let listing: GraphListing = serde_json::from_str(
            r#"{"id": 7, "name": "repo1", "description": "d",
                "created": "2023-03-01T10:00:00", "status": "PENDING"}"#,
        )
        .unwrap();
        assert_eq!(listing.id, "7");
        assert_eq!(listing.status, GraphStatus::Pending);
        assert_eq!(listing.route_name(), "repo1");
        assert_eq!(
            listing.created,
            Utc.with_ymd_and_hms(2023, 3, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_status_defaults_to_created() {
        let listing: GraphListing = serde_json::from_str(
            r#"{"id": "a", "name": "g", "created": "2023-03-01T10:00:00Z", "neo4j_name": "g_db"}"#,
        )
        .unwrap();
        assert!(listing.status.is_ready());
        assert_eq!(listing.route_name(), "g_db");
        assert!(listing.matches("g"));
        assert!(listing.matches("g_db"));
        assert!(!listing.matches("other"));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "a few seconds ago");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(1), now), "an hour ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn test_summary_tolerates_missing_counts() {
        let summary: GraphSummary =
            serde_json::from_str(r#"{"is_empty": false, "functions": 12}"#).unwrap();
        assert_eq!(summary.functions, 12);
        assert_eq!(summary.nodes_total, 0);
        assert_eq!(summary.stats()[5], ("Functions", 12));
    }

    #[test]
    fn test_call_graph_labels() {
        let graph: CallGraph = serde_json::from_str(
            r#"{"nodes": [{"id": 1, "label": "main", "title": ""}, {"id": 2, "label": "run", "title": ""}],
                "edges": [{"from_node": 1, "to_node": 2}, {"from_node": 2, "to_node": 9}]}"#,
        )
        .unwrap();
        assert_eq!(
            graph.labelled_edges(),
            vec![
                ("main".to_string(), "run".to_string()),
                ("run".to_string(), "#9".to_string())
            ]
        );
    }
}
