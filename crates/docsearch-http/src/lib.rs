//! # docsearch-http
//!
//! HTTP backend for docsearch.
//!
//! [`HttpBackend`] talks to a deployment over plain JSON:
//!
//! - `GET  {endpoint}/config` – deployment feature flags ([`FeatureSource`])
//! - `POST {endpoint}/search` – search requests ([`SearchTransport`])
//!
//! A bearer token is attached when the session supplies one. Non-success
//! responses are turned into readable messages, preferring the backend's own
//! `{"error": "..."}` body when present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use docsearch_core::{
    DeploymentFeatures, DocSearchError, DocSearchResult, FeatureSource, SearchRequest,
    SearchResponse, SearchTransport,
};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The request never got a response (connect, timeout, TLS).
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl HttpError {
    /// Convert for the search seam.
    pub fn into_search_error(self) -> DocSearchError {
        DocSearchError::SearchTransport(self.to_string())
    }

    /// Convert for the feature seam.
    pub fn into_config_error(self) -> DocSearchError {
        DocSearchError::ConfigLoad(self.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Human-readable message for a failed response.
fn status_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.trim().is_empty() {
            return parsed.error;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status.as_u16(), body)
    }
}

// ============================================================================
// HttpBackend
// ============================================================================

/// JSON-over-HTTP client for a docsearch deployment.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    endpoint: String,
}

impl HttpBackend {
    /// Create a backend for `endpoint` with a per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, HttpError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Fetch the deployment feature flags.
    pub async fn fetch_config(&self) -> Result<DeploymentFeatures, HttpError> {
        let url = self.url("config");
        tracing::debug!(%url, "Fetching deployment features");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HttpError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;
        decode_body(&url, response).await
    }

    /// Run one search request.
    pub async fn post_search(
        &self,
        request: &SearchRequest,
        token: Option<&str>,
    ) -> Result<SearchResponse, HttpError> {
        let url = self.url("search");
        tracing::debug!(%url, query = %request.query, "Posting search");

        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| HttpError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;
        decode_body(&url, response).await
    }
}

async fn decode_body<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, HttpError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| HttpError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            message: status_message(status, &body),
        });
    }

    serde_json::from_str(&body).map_err(|e| HttpError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl SearchTransport for HttpBackend {
    async fn search(
        &self,
        request: &SearchRequest,
        token: Option<&str>,
    ) -> DocSearchResult<SearchResponse> {
        self.post_search(request, token)
            .await
            .map_err(HttpError::into_search_error)
    }
}

#[async_trait]
impl FeatureSource for HttpBackend {
    async fn fetch_features(&self) -> DocSearchResult<DeploymentFeatures> {
        self.fetch_config().await.map_err(HttpError::into_config_error)
    }
}
