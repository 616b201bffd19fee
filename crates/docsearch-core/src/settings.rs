//! Setting changes: the single mutation path for [`RetrievalConfig`].
//!
//! The settings panel reports edits as `(field, value)` pairs. They are
//! parsed into the closed [`SettingChange`] enum, and
//! [`RetrievalConfig::apply`] handles every variant exhaustively, enforcing:
//!
//! - **Gating**: a capability the deployment does not offer cannot be
//!   enabled. The enabled-flag is forced off and the change is rejected.
//! - **Coupling**: the web source and the minimal agentic reasoning effort
//!   exclude each other.
//!
//! Unknown field names parse to `None` and are therefore a no-op.

use serde_json::Value;

use crate::errors::{DocSearchError, DocSearchResult};
use crate::retrieval::RetrievalConfig;
use crate::types::{FilterPair, ReasoningEffort, RetrievalMode};

// ============================================================================
// SettingChange
// ============================================================================

/// One edit to the retrieval configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    PromptTemplate(String),
    PromptTemplatePrefix(String),
    PromptTemplateSuffix(String),
    Temperature(f64),
    Seed(Option<i64>),
    MinimumRerankerScore(f64),
    MinimumSearchScore(f64),
    RetrieveCount(u32),
    AgenticReasoningEffort(Option<ReasoningEffort>),
    UseSemanticRanker(bool),
    UseSemanticCaptions(bool),
    UseQueryRewriting(bool),
    ReasoningEffort(Option<ReasoningEffort>),
    IncludeCategory(String),
    ExcludeCategory(String),
    SendTextSources(bool),
    SendImageSources(bool),
    SearchTextEmbeddings(bool),
    SearchImageEmbeddings(bool),
    RetrievalMode(RetrievalMode),
    UseAgenticKnowledgeBase(bool),
    UseWebSource(bool),
    UseSharePointSource(bool),
    AddFilter(FilterPair),
    ClearFilters,
}

/// Field names understood by [`SettingChange::from_value`].
pub const SETTING_FIELDS: &[&str] = &[
    "promptTemplate",
    "promptTemplatePrefix",
    "promptTemplateSuffix",
    "temperature",
    "seed",
    "minimumRerankerScore",
    "minimumSearchScore",
    "retrieveCount",
    "agenticReasoningEffort",
    "useSemanticRanker",
    "useSemanticCaptions",
    "useQueryRewriting",
    "reasoningEffort",
    "includeCategory",
    "excludeCategory",
    "sendTextSources",
    "sendImageSources",
    "searchTextEmbeddings",
    "searchImageEmbeddings",
    "retrievalMode",
    "useAgenticKnowledgeBase",
    "useWebSource",
    "useSharePointSource",
    "filter",
    "clearFilters",
];

impl SettingChange {
    /// Wire name of the field this change targets.
    pub fn field(&self) -> &'static str {
        match self {
            Self::PromptTemplate(_) => "promptTemplate",
            Self::PromptTemplatePrefix(_) => "promptTemplatePrefix",
            Self::PromptTemplateSuffix(_) => "promptTemplateSuffix",
            Self::Temperature(_) => "temperature",
            Self::Seed(_) => "seed",
            Self::MinimumRerankerScore(_) => "minimumRerankerScore",
            Self::MinimumSearchScore(_) => "minimumSearchScore",
            Self::RetrieveCount(_) => "retrieveCount",
            Self::AgenticReasoningEffort(_) => "agenticReasoningEffort",
            Self::UseSemanticRanker(_) => "useSemanticRanker",
            Self::UseSemanticCaptions(_) => "useSemanticCaptions",
            Self::UseQueryRewriting(_) => "useQueryRewriting",
            Self::ReasoningEffort(_) => "reasoningEffort",
            Self::IncludeCategory(_) => "includeCategory",
            Self::ExcludeCategory(_) => "excludeCategory",
            Self::SendTextSources(_) => "sendTextSources",
            Self::SendImageSources(_) => "sendImageSources",
            Self::SearchTextEmbeddings(_) => "searchTextEmbeddings",
            Self::SearchImageEmbeddings(_) => "searchImageEmbeddings",
            Self::RetrievalMode(_) => "retrievalMode",
            Self::UseAgenticKnowledgeBase(_) => "useAgenticKnowledgeBase",
            Self::UseWebSource(_) => "useWebSource",
            Self::UseSharePointSource(_) => "useSharePointSource",
            Self::AddFilter(_) => "filter",
            Self::ClearFilters => "clearFilters",
        }
    }

    /// Build a change from a field name and a JSON value.
    ///
    /// Returns `Ok(None)` for field names this controller does not recognize
    /// (including the presentation-only `llmInputs`), so newer settings
    /// panels keep working against older controllers.
    ///
    /// # Errors
    ///
    /// Returns [`DocSearchError::InvalidSettingValue`] when a known field gets
    /// a value of the wrong shape.
    pub fn from_value(field: &str, value: &Value) -> DocSearchResult<Option<Self>> {
        let change = match field {
            "promptTemplate" => Self::PromptTemplate(as_text(value)),
            "promptTemplatePrefix" => Self::PromptTemplatePrefix(as_text(value)),
            "promptTemplateSuffix" => Self::PromptTemplateSuffix(as_text(value)),
            "temperature" => Self::Temperature(as_f64(field, value)?),
            "seed" => Self::Seed(as_seed(field, value)?),
            "minimumRerankerScore" => Self::MinimumRerankerScore(as_f64(field, value)?),
            "minimumSearchScore" => Self::MinimumSearchScore(as_f64(field, value)?),
            "retrieveCount" => Self::RetrieveCount(as_u32(field, value)?),
            "agenticReasoningEffort" => Self::AgenticReasoningEffort(as_effort(field, value)?),
            "useSemanticRanker" => Self::UseSemanticRanker(as_bool(field, value)?),
            "useSemanticCaptions" => Self::UseSemanticCaptions(as_bool(field, value)?),
            "useQueryRewriting" => Self::UseQueryRewriting(as_bool(field, value)?),
            "reasoningEffort" => Self::ReasoningEffort(as_effort(field, value)?),
            "includeCategory" => Self::IncludeCategory(as_text(value)),
            "excludeCategory" => Self::ExcludeCategory(as_text(value)),
            "sendTextSources" => Self::SendTextSources(as_bool(field, value)?),
            "sendImageSources" => Self::SendImageSources(as_bool(field, value)?),
            "searchTextEmbeddings" => Self::SearchTextEmbeddings(as_bool(field, value)?),
            "searchImageEmbeddings" => Self::SearchImageEmbeddings(as_bool(field, value)?),
            "retrievalMode" => Self::RetrievalMode(
                as_text(value)
                    .parse::<RetrievalMode>()
                    .map_err(|e: String| invalid(field, e))?,
            ),
            "useAgenticKnowledgeBase" => Self::UseAgenticKnowledgeBase(as_bool(field, value)?),
            "useWebSource" => Self::UseWebSource(as_bool(field, value)?),
            "useSharePointSource" => Self::UseSharePointSource(as_bool(field, value)?),
            "filter" => Self::AddFilter(
                as_text(value)
                    .parse::<FilterPair>()
                    .map_err(|e: String| invalid(field, e))?,
            ),
            "clearFilters" => Self::ClearFilters,
            _ => {
                tracing::debug!("Ignoring unknown setting field `{}`", field);
                return Ok(None);
            }
        };
        Ok(Some(change))
    }

    /// Build a change from a raw command-line value.
    ///
    /// The raw text is read as JSON when possible (`true`, `0.5`, `null`) and
    /// as a plain string otherwise (`minimal`, `hr,finance`).
    pub fn parse(field: &str, raw: &str) -> DocSearchResult<Option<Self>> {
        let value = serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|v| !v.is_object() && !v.is_array())
            .unwrap_or_else(|| Value::String(raw.to_string()));
        Self::from_value(field, &value)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> DocSearchError {
    DocSearchError::InvalidSettingValue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_bool(field: &str, value: &Value) -> DocSearchResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(invalid(field, format!("expected a boolean, got '{}'", s))),
        },
        other => Err(invalid(field, format!("expected a boolean, got {}", other))),
    }
}

fn as_f64(field: &str, value: &Value) -> DocSearchResult<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(invalid(field, format!("expected a finite number, got {}", value))),
    }
}

fn as_u32(field: &str, value: &Value) -> DocSearchResult<u32> {
    let number = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    number.ok_or_else(|| invalid(field, format!("expected a non-negative integer, got {}", value)))
}

fn as_seed(field: &str, value: &Value) -> DocSearchResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(field, format!("expected an integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() || s.trim() == "none" => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(field, format!("expected an integer, got '{}'", s))),
        other => Err(invalid(field, format!("expected an integer, got {}", other))),
    }
}

fn as_effort(field: &str, value: &Value) -> DocSearchResult<Option<ReasoningEffort>> {
    ReasoningEffort::parse_optional(&as_text(value)).map_err(|e| invalid(field, e))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Result of applying a [`SettingChange`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingOutcome {
    /// The value was stored (plus any coupled side effects).
    Applied,
    /// The option is gated off; the enabled-flag was forced to false.
    Rejected(DocSearchError),
}

impl SettingOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

fn rejected(field: &'static str, flag: &str) -> SettingOutcome {
    let err = DocSearchError::InvalidSettingChange {
        field,
        reason: format!("{} is not offered by this deployment", flag),
    };
    tracing::info!("{}", err);
    SettingOutcome::Rejected(err)
}

/// Assign a gated boolean toggle.
fn gated(
    slot: &mut bool,
    requested: bool,
    offered: bool,
    field: &'static str,
    flag: &str,
) -> SettingOutcome {
    if requested && !offered {
        *slot = false;
        return rejected(field, flag);
    }
    *slot = requested;
    SettingOutcome::Applied
}

impl RetrievalConfig {
    /// Apply one setting change.
    pub fn apply(&mut self, change: SettingChange) -> SettingOutcome {
        tracing::debug!(?change, "Applying setting change");
        let field = change.field();
        let visibility = &self.visibility;
        let options = &mut self.options;

        match change {
            SettingChange::PromptTemplate(v) => options.prompt_template = v,
            SettingChange::PromptTemplatePrefix(v) => options.prompt_template_prefix = v,
            SettingChange::PromptTemplateSuffix(v) => options.prompt_template_suffix = v,
            SettingChange::Temperature(v) => options.temperature = v,
            SettingChange::Seed(v) => options.seed = v,
            SettingChange::MinimumRerankerScore(v) => options.minimum_reranker_score = v,
            SettingChange::MinimumSearchScore(v) => options.minimum_search_score = v,
            SettingChange::RetrieveCount(v) => options.retrieve_count = v,
            SettingChange::IncludeCategory(v) => options.include_category = v,
            SettingChange::ExcludeCategory(v) => options.exclude_category = v,
            SettingChange::SendTextSources(v) => options.send_text_sources = v,
            SettingChange::SearchTextEmbeddings(v) => options.search_text_embeddings = v,
            SettingChange::AddFilter(pair) => options.filters.push(pair),
            SettingChange::ClearFilters => options.filters.clear(),

            SettingChange::AgenticReasoningEffort(v) => {
                options.agentic_reasoning_effort = v;
                if v == Some(ReasoningEffort::Minimal) && options.use_web_source {
                    options.use_web_source = false;
                    self.hide_minimal_retrieval_reasoning_option = false;
                    tracing::info!("Minimal agentic reasoning effort disables the web source");
                }
            }

            SettingChange::UseWebSource(v) => {
                if v && !visibility.web_source_supported {
                    options.use_web_source = false;
                    return rejected(field, "webSourceEnabled");
                }
                options.use_web_source = v;
                self.hide_minimal_retrieval_reasoning_option = v;
                if v && options.agentic_reasoning_effort == Some(ReasoningEffort::Minimal) {
                    options.agentic_reasoning_effort = Some(ReasoningEffort::Low);
                    tracing::info!("Web source raises agentic reasoning effort from minimal to low");
                }
            }

            SettingChange::UseSharePointSource(v) => {
                return gated(
                    &mut options.use_sharepoint_source,
                    v,
                    visibility.sharepoint_source_supported,
                    field,
                    "sharepointSourceEnabled",
                );
            }
            SettingChange::UseSemanticRanker(v) => {
                return gated(
                    &mut options.use_semantic_ranker,
                    v,
                    visibility.show_semantic_ranker_option,
                    field,
                    "showSemanticRankerOption",
                );
            }
            SettingChange::UseSemanticCaptions(v) => {
                return gated(
                    &mut options.use_semantic_captions,
                    v,
                    visibility.show_semantic_ranker_option,
                    field,
                    "showSemanticRankerOption",
                );
            }
            SettingChange::UseQueryRewriting(v) => {
                return gated(
                    &mut options.use_query_rewriting,
                    v,
                    visibility.show_query_rewriting_option,
                    field,
                    "showQueryRewritingOption",
                );
            }
            SettingChange::UseAgenticKnowledgeBase(v) => {
                return gated(
                    &mut options.use_agentic_knowledge_base,
                    v,
                    visibility.show_agentic_retrieval_option,
                    field,
                    "showAgenticRetrievalOption",
                );
            }
            SettingChange::SendImageSources(v) => {
                return gated(
                    &mut options.send_image_sources,
                    v,
                    visibility.show_multimodal_options,
                    field,
                    "showMultimodalOptions",
                );
            }
            SettingChange::SearchImageEmbeddings(v) => {
                return gated(
                    &mut options.search_image_embeddings,
                    v,
                    visibility.show_multimodal_options,
                    field,
                    "showMultimodalOptions",
                );
            }

            SettingChange::RetrievalMode(mode) => {
                if mode.uses_vectors() && !visibility.show_vector_option {
                    options.retrieval_mode = RetrievalMode::Text;
                    return rejected(field, "showVectorOption");
                }
                options.retrieval_mode = mode;
            }

            SettingChange::ReasoningEffort(v) => {
                if v.is_some() && !visibility.show_reasoning_effort_option {
                    options.reasoning_effort = None;
                    return rejected(field, "showReasoningEffortOption");
                }
                options.reasoning_effort = v;
            }
        }

        SettingOutcome::Applied
    }
}
