//! Data types exchanged with the RepoGraph backend.

mod graph;
mod search;

pub use graph::{
    CallGraph, CallGraphFunction, CallGraphRelationship, GraphListing, GraphStatus, GraphSummary,
};
pub use search::{AvailableQuery, FunctionInfo, Row, SearchResult, SearchResultSet, TabularResult};
