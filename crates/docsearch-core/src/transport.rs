//! Seams to the external collaborators.
//!
//! The core never performs I/O itself. Search requests, feature fetches and
//! token acquisition go through these traits; `docsearch-http` provides the
//! production implementations and tests provide in-memory doubles.

use async_trait::async_trait;

use crate::errors::{DocSearchError, DocSearchResult};
use crate::features::DeploymentFeatures;
use crate::types::{SearchRequest, SearchResponse};

/// Executes search requests.
///
/// Failures must be reported as [`DocSearchError::SearchTransport`] carrying
/// a human-readable description.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Run one search. `token` is the bearer token when login is enabled.
    async fn search(
        &self,
        request: &SearchRequest,
        token: Option<&str>,
    ) -> DocSearchResult<SearchResponse>;
}

/// Supplies the deployment feature flags.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch_features(&self) -> DocSearchResult<DeploymentFeatures>;
}

/// Supplies an authorization token for search requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> DocSearchResult<String>;
}

/// A token fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> DocSearchResult<String> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every acquisition, so a
/// refreshed value is picked up without restarting the session.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the environment variable.
    pub fn var(&self) -> &str {
        &self.var
    }
}

#[async_trait]
impl TokenProvider for EnvToken {
    async fn token(&self) -> DocSearchResult<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => Err(DocSearchError::TokenUnavailable(format!(
                "environment variable {} is empty",
                self.var
            ))),
            Err(_) => Err(DocSearchError::TokenUnavailable(format!(
                "environment variable {} is not set",
                self.var
            ))),
        }
    }
}
