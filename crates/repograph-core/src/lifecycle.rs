//! Creating and deleting graphs.
//!
//! Both operations validate locally first and return the [`Route`] to show
//! next instead of navigating.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::GraphCatalog;
use crate::client::{Backend, ClientError, GraphUpload, UploadFile};
use crate::model::GraphListing;
use crate::route::Route;

/// Status the backend answers a successful delete with.
pub const DELETE_SUCCESS_STATUS: u16 = 204;

/// Fields of the new-graph form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Files,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Files => "Files",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please give your graph a name")]
    MissingName,

    #[error("Graph names may only contain letters, digits, '-', '_' and '.', and cannot be only dots")]
    InvalidName,

    #[error("Please provide a description")]
    MissingDescription,

    #[error("You must upload at least one repository")]
    NoFiles,

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
}

/// Field-to-error map. At most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .iter()
            .map(|(field, err)| format!("{}: {}", field.label(), err))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// Errors from lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid graph: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to delete graph '{graph}' (status {status})")]
    DeleteRejected { graph: String, status: u16 },

    #[error("Deletion was not confirmed")]
    NotConfirmed,
}

/// Input of the new-graph form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGraphForm {
    pub name: String,
    pub description: String,
    pub files: Vec<PathBuf>,
}

struct FieldRule {
    field: Field,
    check: fn(&NewGraphForm) -> Option<ValidationError>,
}

// Evaluated in order; the first failing rule of a field wins.
static RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        check: |form| form.name.trim().is_empty().then_some(ValidationError::MissingName),
    },
    FieldRule {
        field: Field::Name,
        check: |form| (!is_path_safe(form.name.trim())).then_some(ValidationError::InvalidName),
    },
    FieldRule {
        field: Field::Description,
        check: |form| {
            form.description
                .trim()
                .is_empty()
                .then_some(ValidationError::MissingDescription)
        },
    },
    FieldRule {
        field: Field::Files,
        check: |form| form.files.is_empty().then_some(ValidationError::NoFiles),
    },
    FieldRule {
        field: Field::Files,
        check: |form| {
            form.files
                .iter()
                .find(|path| !path.is_file())
                .map(|path| ValidationError::MissingFile(path.clone()))
        },
    },
];

const NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

/// Graph names become URL path segments, where `.` and `..` would be
/// resolved away.
fn is_path_safe(name: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let matches = PATTERN
        .get_or_init(|| Regex::new(NAME_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name));
    matches && !name.trim_matches('.').is_empty()
}

impl NewGraphForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            files,
        }
    }

    /// Runs every rule; an empty result means the form may be submitted.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = BTreeMap::new();
        for rule in RULES {
            if errors.contains_key(&rule.field) {
                continue;
            }
            if let Some(err) = (rule.check)(self) {
                errors.insert(rule.field, err);
            }
        }
        ValidationErrors(errors)
    }
}

/// Validates the form, uploads it and returns the new graph's route.
///
/// Nothing is sent when validation fails.
pub async fn create_graph<B: Backend>(backend: &B, form: &NewGraphForm) -> Result<Route, LifecycleError> {
    let errors = form.validate();
    if !errors.is_empty() {
        debug!(%errors, "new graph form rejected");
        return Err(LifecycleError::Invalid(errors));
    }

    let name = form.name.trim().to_string();
    let mut files = Vec::with_capacity(form.files.len());
    for path in &form.files {
        files.push(read_upload(path).await?);
    }

    info!(graph = %name, files = files.len(), "building graph");
    backend
        .build_graph(GraphUpload {
            name: name.clone(),
            description: form.description.trim().to_string(),
            files,
        })
        .await?;

    Ok(Route::GraphHome(name))
}

async fn read_upload(path: &Path) -> Result<UploadFile, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile { file_name, bytes })
}

/// Confirmation step in front of a delete.
#[derive(Debug, Clone)]
pub struct DeleteDialog {
    graph: GraphListing,
    open: bool,
}

/// Proof that the user confirmed deleting this graph.
#[derive(Debug, Clone)]
pub struct Confirmed {
    graph: GraphListing,
}

impl Confirmed {
    pub fn graph(&self) -> &GraphListing {
        &self.graph
    }
}

impl DeleteDialog {
    /// A closed dialog for `graph`.
    pub fn new(graph: GraphListing) -> Self {
        Self { graph, open: false }
    }

    pub fn graph(&self) -> &GraphListing {
        &self.graph
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Only an open dialog can be confirmed.
    pub fn confirm(&mut self) -> Result<Confirmed, LifecycleError> {
        if !self.open {
            return Err(LifecycleError::NotConfirmed);
        }
        self.open = false;
        Ok(Confirmed {
            graph: self.graph.clone(),
        })
    }
}

/// A graph the backend confirmed deleting (status 204).
#[derive(Debug, Clone)]
pub struct Deleted {
    graph: GraphListing,
}

impl Deleted {
    pub fn graph(&self) -> &GraphListing {
        &self.graph
    }

    /// Drops exactly this graph from the catalog and returns the listing
    /// route.
    pub fn apply(self, catalog: &mut GraphCatalog) -> Route {
        catalog.remove(&self.graph.id);
        Route::Home
    }
}

/// Sends the delete for a confirmed graph without touching any local state.
///
/// Only a 204 counts as success; any other status is returned as
/// [`LifecycleError::DeleteRejected`].
pub async fn request_delete<B: Backend>(backend: &B, confirmed: Confirmed) -> Result<Deleted, LifecycleError> {
    let graph = confirmed.graph;
    let status = backend.delete_graph(graph.route_name()).await?;

    if status != DELETE_SUCCESS_STATUS {
        warn!(graph = %graph.name, status, "delete rejected");
        return Err(LifecycleError::DeleteRejected {
            graph: graph.name,
            status,
        });
    }

    info!(graph = %graph.name, "graph deleted");
    Ok(Deleted { graph })
}

/// Deletes a confirmed graph and, on success, drops it from the catalog.
///
/// Any status other than 204 leaves the catalog untouched.
pub async fn delete_graph<B: Backend>(
    backend: &B,
    confirmed: Confirmed,
    catalog: &mut GraphCatalog,
) -> Result<Route, LifecycleError> {
    let deleted = request_delete(backend, confirmed).await?;
    Ok(deleted.apply(catalog))
}
