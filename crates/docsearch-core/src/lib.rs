//! # docsearch-core
//!
//! **Document search session controller** – core library.
//!
//! This crate turns user-adjustable retrieval options into well-formed search
//! requests, tracks each query through its lifecycle, and coordinates the
//! selection state that depends on it (active citation, open analysis tab,
//! audio playback). It performs no I/O of its own: the search backend, the
//! deployment feature flags and token acquisition are reached through the
//! traits in [`transport`].
//!
//! ## Main Types
//!
//! - [`DocumentSearchSession`] – the entry point a front-end drives
//! - [`RetrievalConfig`] – retrieval options plus deployment visibility
//! - [`SettingChange`] – the closed set of option edits
//! - [`SearchController`] – the `idle → loading → success | error` machine
//! - [`SelectionState`] – citation/tab toggle state
//! - [`DocSearchError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`filter`] – filter expression builder
//! - [`features`] – deployment feature flags and the one-shot loader
//! - [`retrieval`] – retrieval options and visibility
//! - [`settings`] – setting changes and the dispatcher
//! - [`search`] – search orchestration
//! - [`selection`] – selection state
//! - [`playback`] – session-owned audio playback
//! - [`session`] – the session facade
//! - [`client_config`] – client configuration file
//!
//! ## Example
//!
//! ```ignore
//! use docsearch_core::{DocumentSearchSession, SessionEvent, SessionOptions, SilentPlayer};
//!
//! let mut session =
//!     DocumentSearchSession::start(backend.clone(), SilentPlayer, &backend, SessionOptions::default())
//!         .await;
//!
//! session.handle(SessionEvent::SubmitQuery("invoice".into())).await?;
//! println!("{} results", session.search().results().len());
//! ```

// Modules
pub mod client_config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod filter;
pub mod playback;
pub mod retrieval;
pub mod search;
pub mod selection;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client_config::{AuthConfig, ClientConfig};
pub use errors::{DocSearchError, DocSearchResult};
pub use features::{load_features, DeploymentFeatures};
pub use filter::{build_filter, escape_literal, sanitize_field};
pub use playback::{AudioPlayer, PlaybackSlot, SilentPlayer};
pub use retrieval::{RetrievalConfig, RetrievalOptions, Visibility};
pub use search::{
    PendingSearch, SearchController, SearchSession, SearchStatus, SubmissionId,
};
pub use selection::SelectionState;
pub use session::{DocumentSearchSession, EventOutcome, SessionEvent, SessionOptions};
pub use settings::{SettingChange, SettingOutcome, SETTING_FIELDS};
pub use transport::{EnvToken, FeatureSource, SearchTransport, StaticToken, TokenProvider};
pub use types::{
    split_fragment, AnalysisTab, DocumentKind, FilterPair, QueryType, ReasoningEffort,
    RetrievalMode, SearchDocument, SearchRequest, SearchResponse,
};
