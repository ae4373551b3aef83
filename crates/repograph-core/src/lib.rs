//! Core library for RepoGraph: a typed client for the graph backend plus the
//! client-side state behind the search and issues views.

pub mod catalog;
pub mod client;
pub mod config;
pub mod issues;
pub mod lifecycle;
pub mod model;
pub mod pagination;
pub mod query;
pub mod route;

pub use catalog::{GraphCatalog, ListingPoller, ListingUpdate};
pub use client::{Backend, BackendClient, ClientError, GraphUpload, UploadFile};
pub use config::{Config, ConfigError};
pub use issues::{Health, IssueCard, IssueCategory, IssueReport, IssueSelector};
pub use lifecycle::{
    create_graph, delete_graph, request_delete, Confirmed, DeleteDialog, Deleted, Field,
    LifecycleError, NewGraphForm, ValidationError, ValidationErrors,
};
pub use model::{GraphListing, GraphStatus, GraphSummary};
pub use pagination::Pagination;
pub use query::{QueryDescriptor, QueryExecutor, ResultPage, SearchSession, SessionError};
pub use route::Route;
