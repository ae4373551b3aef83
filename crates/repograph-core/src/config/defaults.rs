//! Default values for RepoGraph configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Backend Defaults
// ============================================================================

/// Default backend origin (the development address of `repograph-backend`).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Search Defaults
// ============================================================================

/// Page size for semantic search results.
pub const DEFAULT_SEMANTIC_LIMIT: usize = 5;

/// Page size for named query results.
pub const DEFAULT_QUERY_LIMIT: usize = 10;

// ============================================================================
// Issues Defaults
// ============================================================================

/// Page size for issue detail tables.
pub const DEFAULT_ISSUES_PAGE_SIZE: usize = 10;

// ============================================================================
// Listing Defaults
// ============================================================================

/// Interval between graph listing polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory (logs live under it).
pub const DEFAULT_DATA_DIR: &str = ".repograph";

/// Default log subdirectory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "repograph.toml";

/// Name of the config directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "repograph";

// ============================================================================
// Environment Variables
// ============================================================================

/// Backend origin override.
pub const ENV_BACKEND_URL: &str = "REPOGRAPH_BACKEND_URL";

/// Backend origin override shared with the web front end's deployment.
pub const ENV_PUBLIC_BACKEND_URL: &str = "NEXT_PUBLIC_BACKEND_URL";

/// Request timeout override.
pub const ENV_TIMEOUT_SECS: &str = "REPOGRAPH_TIMEOUT_SECS";

/// Poll interval override.
pub const ENV_POLL_INTERVAL_SECS: &str = "REPOGRAPH_POLL_INTERVAL_SECS";

/// Data directory override.
pub const ENV_DATA_DIR: &str = "REPOGRAPH_DATA_DIR";
