//! Retrieval configuration state.
//!
//! [`RetrievalConfig`] consolidates every user-tunable retrieval/generation
//! option together with the visibility flags derived from the deployment
//! features. It is built once from [`DeploymentFeatures`] and afterwards only
//! changes through [`RetrievalConfig::apply`] (see `settings.rs`), which keeps
//! the gating and coupling rules in one place.

use serde::Serialize;

use crate::constants::{
    AGENTIC_RETRIEVE_COUNT, DEFAULT_MINIMUM_RERANKER_SCORE, DEFAULT_MINIMUM_SEARCH_SCORE,
    DEFAULT_RETRIEVE_COUNT, DEFAULT_TEMPERATURE,
};
use crate::features::DeploymentFeatures;
use crate::filter::build_filter;
use crate::types::{FilterPair, QueryType, ReasoningEffort, RetrievalMode};

// ============================================================================
// RetrievalOptions
// ============================================================================

/// The user-tunable options.
///
/// Read-only outside this crate: sessions hand out `&RetrievalOptions` and
/// snapshot it by cloning at submit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalOptions {
    pub prompt_template: String,
    pub prompt_template_prefix: String,
    pub prompt_template_suffix: String,

    pub temperature: f64,
    pub seed: Option<i64>,
    pub minimum_reranker_score: f64,
    pub minimum_search_score: f64,
    pub retrieve_count: u32,

    pub retrieval_mode: RetrievalMode,
    /// Generation reasoning effort; `None` is unset.
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Agentic retrieval reasoning effort; `None` is unset.
    pub agentic_reasoning_effort: Option<ReasoningEffort>,

    pub use_semantic_ranker: bool,
    pub use_semantic_captions: bool,
    pub use_query_rewriting: bool,
    pub send_text_sources: bool,
    pub send_image_sources: bool,
    pub search_text_embeddings: bool,
    pub search_image_embeddings: bool,
    pub use_agentic_knowledge_base: bool,
    pub use_web_source: bool,
    pub use_sharepoint_source: bool,

    /// Comma-joined category list to include.
    pub include_category: String,
    /// Comma-joined category list to exclude.
    pub exclude_category: String,
    /// Ad-hoc equality filters, in insertion order.
    pub filters: Vec<FilterPair>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            prompt_template: String::new(),
            prompt_template_prefix: String::new(),
            prompt_template_suffix: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            seed: None,
            minimum_reranker_score: DEFAULT_MINIMUM_RERANKER_SCORE,
            minimum_search_score: DEFAULT_MINIMUM_SEARCH_SCORE,
            retrieve_count: DEFAULT_RETRIEVE_COUNT,
            retrieval_mode: RetrievalMode::Hybrid,
            reasoning_effort: None,
            agentic_reasoning_effort: Some(ReasoningEffort::Minimal),
            use_semantic_ranker: true,
            use_semantic_captions: false,
            use_query_rewriting: false,
            send_text_sources: true,
            send_image_sources: false,
            search_text_embeddings: true,
            search_image_embeddings: false,
            use_agentic_knowledge_base: false,
            use_web_source: false,
            use_sharepoint_source: false,
            include_category: String::new(),
            exclude_category: String::new(),
            filters: Vec::new(),
        }
    }
}

impl RetrievalOptions {
    /// Filter expression for these options.
    pub fn filter_expression(&self) -> String {
        build_filter(&self.include_category, &self.exclude_category, &self.filters)
    }

    /// Query type implied by the semantic ranker toggle.
    pub fn query_type(&self) -> QueryType {
        if self.use_semantic_ranker {
            QueryType::Semantic
        } else {
            QueryType::Simple
        }
    }
}

// ============================================================================
// Visibility
// ============================================================================

/// Which options the deployment exposes.
///
/// Derived from [`DeploymentFeatures`] exactly once; a [`RetrievalConfig`]
/// never changes its visibility after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub show_multimodal_options: bool,
    pub show_semantic_ranker_option: bool,
    pub show_query_rewriting_option: bool,
    pub show_reasoning_effort_option: bool,
    pub show_vector_option: bool,
    pub show_user_upload: bool,
    pub show_language_picker: bool,
    pub show_speech_input: bool,
    pub show_speech_output_browser: bool,
    pub show_speech_output_azure: bool,
    pub show_agentic_retrieval_option: bool,
    pub web_source_supported: bool,
    pub sharepoint_source_supported: bool,
}

impl Visibility {
    pub fn from_features(features: &DeploymentFeatures) -> Self {
        Self {
            show_multimodal_options: features.show_multimodal_options,
            show_semantic_ranker_option: features.show_semantic_ranker_option,
            show_query_rewriting_option: features.show_query_rewriting_option,
            show_reasoning_effort_option: features.show_reasoning_effort_option,
            show_vector_option: features.show_vector_option,
            show_user_upload: features.show_user_upload,
            show_language_picker: features.show_language_picker,
            show_speech_input: features.show_speech_input,
            show_speech_output_browser: features.show_speech_output_browser,
            show_speech_output_azure: features.show_speech_output_azure,
            show_agentic_retrieval_option: features.show_agentic_retrieval_option,
            web_source_supported: features.web_source_enabled,
            sharepoint_source_supported: features.sharepoint_source_enabled,
        }
    }
}

// ============================================================================
// RetrievalConfig
// ============================================================================

/// Options, visibility, and the one piece of derived UI state that the
/// options influence (whether the minimal agentic effort is offered).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub(crate) options: RetrievalOptions,
    pub(crate) visibility: Visibility,
    pub(crate) hide_minimal_retrieval_reasoning_option: bool,
}

impl Default for RetrievalConfig {
    /// The degraded configuration: every gated option hidden and disabled.
    fn default() -> Self {
        Self::from_features(&DeploymentFeatures::default())
    }
}

impl RetrievalConfig {
    /// Build the initial configuration for a deployment.
    ///
    /// Deterministic: identical features always produce identical configs.
    pub fn from_features(features: &DeploymentFeatures) -> Self {
        let visibility = Visibility::from_features(features);
        let mut options = RetrievalOptions::default();

        if features.show_multimodal_options {
            options.send_text_sources = features.rag_send_text_sources.unwrap_or(true);
            options.send_image_sources = features.rag_send_image_sources;
            options.search_text_embeddings = features.rag_search_text_embeddings;
            options.search_image_embeddings = features.rag_search_image_embeddings;
        }

        options.use_semantic_ranker = features.show_semantic_ranker_option;
        options.use_query_rewriting = features.show_query_rewriting_option;

        if features.show_reasoning_effort_option {
            options.reasoning_effort =
                parse_server_effort("defaultReasoningEffort", &features.default_reasoning_effort);
        }

        if !features.show_vector_option {
            options.retrieval_mode = RetrievalMode::Text;
        }

        options.use_agentic_knowledge_base = features.show_agentic_retrieval_option;
        if features.show_agentic_retrieval_option {
            options.retrieve_count = AGENTIC_RETRIEVE_COUNT;
        }

        options.use_web_source = features.web_source_enabled;
        options.use_sharepoint_source = features.sharepoint_source_enabled;

        options.agentic_reasoning_effort = match &features.default_retrieval_reasoning_effort {
            Some(raw) => parse_server_effort("defaultRetrievalReasoningEffort", raw),
            None => Some(ReasoningEffort::Minimal),
        };

        let hide_minimal = features.web_source_enabled;
        if hide_minimal && options.agentic_reasoning_effort == Some(ReasoningEffort::Minimal) {
            options.agentic_reasoning_effort = Some(ReasoningEffort::Low);
        }

        Self {
            options,
            visibility,
            hide_minimal_retrieval_reasoning_option: hide_minimal,
        }
    }

    pub fn options(&self) -> &RetrievalOptions {
        &self.options
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// True while the minimal agentic effort must not be offered.
    pub fn hide_minimal_retrieval_reasoning_option(&self) -> bool {
        self.hide_minimal_retrieval_reasoning_option
    }

    /// Filter expression for the current options.
    pub fn filter_expression(&self) -> String {
        self.options.filter_expression()
    }
}

/// Parse a server-provided effort, treating junk as unset rather than failing.
fn parse_server_effort(key: &str, raw: &str) -> Option<ReasoningEffort> {
    match ReasoningEffort::parse_optional(raw) {
        Ok(effort) => effort,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", key, e);
            None
        }
    }
}
