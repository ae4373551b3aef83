use std::fmt;

/// Navigation targets. Operations return the route to show next instead of
/// navigating themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Graph listing.
    Home,
    /// New graph form.
    NewGraph,
    /// Summary of one graph.
    GraphHome(String),
    /// Search view of one graph.
    Search(String),
    /// Issues view of one graph.
    Issues(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::NewGraph => "/graph/new".to_string(),
            Route::GraphHome(name) => format!("/graph/{}", name),
            Route::Search(name) => format!("/graph/{}/search", name),
            Route::Issues(name) => format!("/graph/{}/issues", name),
        }
    }

    /// The graph this route belongs to, if any.
    pub fn graph(&self) -> Option<&str> {
        match self {
            Route::GraphHome(name) | Route::Search(name) | Route::Issues(name) => Some(name),
            Route::Home | Route::NewGraph => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::NewGraph.path(), "/graph/new");
        assert_eq!(Route::GraphHome("repo1".into()).path(), "/graph/repo1");
        assert_eq!(Route::Issues("repo1".into()).to_string(), "/graph/repo1/issues");
        assert_eq!(Route::Search("g".into()).graph(), Some("g"));
        assert_eq!(Route::NewGraph.graph(), None);
    }
}
