//! Search orchestration.
//!
//! [`SearchController`] turns a query plus the current [`RetrievalConfig`]
//! into a [`SearchRequest`], tracks the submission through
//! `Idle → Loading → Success | Error`, and publishes the outcome.
//!
//! Every submission gets a [`SubmissionId`]. Only the completion carrying the
//! latest id is applied; a slower, superseded request that resolves later is
//! dropped instead of overwriting the newer session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::DEFAULT_SEMANTIC_CONFIGURATION;
use crate::errors::DocSearchResult;
use crate::retrieval::{RetrievalConfig, RetrievalOptions};
use crate::transport::SearchTransport;
use crate::types::{SearchDocument, SearchRequest, SearchResponse};

// ============================================================================
// Types
// ============================================================================

/// Monotonically increasing submission sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubmissionId(u64);

impl SubmissionId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Status of the published search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One query submission and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
    pub id: SubmissionId,
    pub query: String,
    /// Filter expression computed at submit time.
    pub filter: String,
    /// Options snapshot taken at submit time.
    pub options: RetrievalOptions,
    pub status: SearchStatus,
    pub results: Vec<SearchDocument>,
    /// Human-readable failure; set only in [`SearchStatus::Error`].
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A submission that has been recorded but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    pub id: SubmissionId,
    pub request: SearchRequest,
}

// ============================================================================
// SearchController
// ============================================================================

/// Owns the published [`SearchSession`].
#[derive(Debug)]
pub struct SearchController {
    semantic_configuration: String,
    last_issued: u64,
    session: Option<SearchSession>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_SEMANTIC_CONFIGURATION)
    }
}

impl SearchController {
    pub fn new(semantic_configuration: impl Into<String>) -> Self {
        Self {
            semantic_configuration: semantic_configuration.into(),
            last_issued: 0,
            session: None,
        }
    }

    pub fn semantic_configuration(&self) -> &str {
        &self.semantic_configuration
    }

    /// Current status; `Idle` before the first submission.
    pub fn status(&self) -> SearchStatus {
        self.session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or(SearchStatus::Idle)
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    /// Results of the published session (empty unless it succeeded).
    pub fn results(&self) -> &[SearchDocument] {
        self.session
            .as_ref()
            .map(|s| s.results.as_slice())
            .unwrap_or(&[])
    }

    /// Record a new submission and build its request.
    ///
    /// A blank query is ignored and returns `None` without touching the
    /// published session. Otherwise the previous session is replaced by a
    /// `Loading` one.
    pub fn begin(
        &mut self,
        query: &str,
        config: &RetrievalConfig,
        language: &str,
    ) -> Option<PendingSearch> {
        if query.trim().is_empty() {
            tracing::debug!("Ignoring blank query");
            return None;
        }

        self.last_issued += 1;
        let id = SubmissionId(self.last_issued);
        let options = config.options().clone();
        let filter = options.filter_expression();

        let request = SearchRequest {
            query: query.to_string(),
            top: options.retrieve_count,
            filter: filter.clone(),
            query_type: options.query_type(),
            query_language: language.to_string(),
            semantic_configuration: self.semantic_configuration.clone(),
        };

        tracing::info!(%id, query, "Submitting search");
        self.session = Some(SearchSession {
            id,
            query: query.to_string(),
            filter,
            options,
            status: SearchStatus::Loading,
            results: Vec::new(),
            error: None,
            submitted_at: Utc::now(),
            completed_at: None,
        });

        Some(PendingSearch { id, request })
    }

    /// Apply the transport outcome for submission `id`.
    ///
    /// Returns false (and changes nothing) when `id` is not the latest
    /// submission or that submission has already completed.
    pub fn complete(&mut self, id: SubmissionId, outcome: DocSearchResult<SearchResponse>) -> bool {
        let session = match self.session.as_mut() {
            Some(session) if session.id == id && session.status == SearchStatus::Loading => {
                session
            }
            _ => {
                tracing::warn!(%id, "Dropping stale search completion");
                return false;
            }
        };

        session.completed_at = Some(Utc::now());
        match outcome {
            Ok(response) => {
                tracing::info!(%id, results = response.results.len(), "Search succeeded");
                session.results = response.results;
                session.error = None;
                session.status = SearchStatus::Success;
            }
            Err(e) => {
                tracing::info!(%id, error = %e, "Search failed");
                session.results.clear();
                session.error = Some(e.to_string());
                session.status = SearchStatus::Error;
            }
        }
        true
    }

    /// Begin, send, and complete one submission.
    ///
    /// Returns the submission id, or `None` for a blank query.
    pub async fn submit<T>(
        &mut self,
        query: &str,
        config: &RetrievalConfig,
        language: &str,
        transport: &T,
        token: Option<&str>,
    ) -> Option<SubmissionId>
    where
        T: SearchTransport + ?Sized,
    {
        let pending = self.begin(query, config, language)?;
        let outcome = transport.search(&pending.request, token).await;
        self.complete(pending.id, outcome);
        Some(pending.id)
    }
}
