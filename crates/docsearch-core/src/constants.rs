//! Common constants used throughout docsearch-core.
//!
//! This module centralizes option defaults and configuration locations so the
//! controller, the feature loader and the CLI agree on them.

// ============================================================================
// Configuration Locations
// ============================================================================

/// The name of the user-level configuration directory.
///
/// Located at `~/.docsearch/` on Unix-like systems.
pub const DOCSEARCH_HOME_DIR: &str = ".docsearch";

/// The name of the client configuration file inside [`DOCSEARCH_HOME_DIR`].
pub const CLIENT_CONFIG_FILENAME: &str = "config.yaml";

/// Default deployment endpoint (the local development backend).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:50505";

/// Default query language sent with each request.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default semantic configuration name sent with each request.
pub const DEFAULT_SEMANTIC_CONFIGURATION: &str = "default";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Retrieval Option Defaults
// ============================================================================

/// Default generation temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Default minimum reranker score.
pub const DEFAULT_MINIMUM_RERANKER_SCORE: f64 = 1.9;

/// Default minimum search score.
pub const DEFAULT_MINIMUM_SEARCH_SCORE: f64 = 0.0;

/// Default number of results requested.
pub const DEFAULT_RETRIEVE_COUNT: u32 = 3;

/// Result count used when the deployment offers agentic retrieval.
pub const AGENTIC_RETRIEVE_COUNT: u32 = 10;
