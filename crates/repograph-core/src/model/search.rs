//! Search payloads: semantic result sets, named queries and tabular results.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A function node as returned inside a semantic search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub repository_name: String,
    #[serde(default)]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub source_code: Option<String>,
    #[serde(default)]
    pub min_line_number: Option<u32>,
    #[serde(default)]
    pub max_line_number: Option<u32>,
}

impl FunctionInfo {
    /// `canonical_name` when known, otherwise the bare name.
    pub fn display_name(&self) -> &str {
        self.canonical_name.as_deref().unwrap_or(&self.name)
    }

    /// Line span such as `L12-L40`, if the backend reported one.
    pub fn line_span(&self) -> Option<String> {
        match (self.min_line_number, self.max_line_number) {
            (Some(a), Some(b)) => Some(format!("L{}-L{}", a, b)),
            (Some(a), None) => Some(format!("L{}", a)),
            _ => None,
        }
    }
}

/// One scored hit from semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub repository: Option<String>,
    pub function: FunctionInfo,
    #[serde(default)]
    pub summarization: String,
    pub score: f32,
}

/// Response of `/graph/{name}/search/semantic`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub total: usize,
}

/// A predefined query offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailableQuery {
    pub id: u32,
    pub name: String,
}

/// A table row. Backends send rows either as arrays or as objects; object
/// rows keep their values in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(pub Vec<Value>);

impl Row {
    /// Cell values rendered for display (`null` becomes empty).
    pub fn cells(&self) -> Vec<String> {
        self.0.iter().map(cell_text).collect()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRow {
            Array(Vec<Value>),
            Object(serde_json::Map<String, Value>),
            Scalar(Value),
        }

        Ok(match RawRow::deserialize(deserializer)? {
            RawRow::Array(values) => Row(values),
            RawRow::Object(map) => Row(map.into_iter().map(|(_, v)| v).collect()),
            RawRow::Scalar(value) => Row(vec![value]),
        })
    }
}

/// Columns plus rows, as returned by named queries and issue endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    /// Size of the whole result set, when the backend reports it.
    #[serde(default, alias = "total", skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl TabularResult {
    /// Total row count across all pages.
    pub fn total(&self) -> usize {
        self.size.unwrap_or(self.data.len()).max(self.data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_rows_keep_key_order() {
        let result: TabularResult = serde_json::from_str(
            r#"{"columns": ["module", "count"],
                "data": [{"module": "a.b", "count": 3}, ["c.d", null]]}"#,
        )
        .unwrap();
        assert_eq!(result.data[0].cells(), vec!["a.b", "3"]);
        assert_eq!(result.data[1].cells(), vec!["c.d", ""]);
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn test_reported_size_wins_over_page_length() {
        let result: TabularResult =
            serde_json::from_str(r#"{"columns": ["x"], "data": [[1]], "size": 40}"#).unwrap();
        assert_eq!(result.total(), 40);
    }

    #[test]
    fn test_semantic_hit() {
        let set: SearchResultSet = serde_json::from_str(
            r#"{"results": [{"function": {"id": 3, "name": "parse", "type": "Function",
                "builtin": false, "repository_name": "repo1", "min_line_number": 4,
                "max_line_number": 9}, "summarization": "Parses input", "score": 0.87}],
                "offset": 0, "limit": 5, "total": 11}"#,
        )
        .unwrap();
        let hit = &set.results[0];
        assert_eq!(hit.function.display_name(), "parse");
        assert_eq!(hit.function.line_span().as_deref(), Some("L4-L9"));
        assert_eq!(set.total, 11);
    }
}
