//! Common types used throughout docsearch-core.
//!
//! This module contains the option enums, the search request/response wire
//! types, and small presentation helpers for search results and citations.

use serde::{Deserialize, Serialize};

// ============================================================================
// RetrievalMode
// ============================================================================

/// Whether search matches on lexical text, vector embeddings, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Lexical matching only.
    Text,
    /// Vector similarity only.
    Vectors,
    /// Lexical and vector matching combined.
    #[default]
    Hybrid,
}

impl RetrievalMode {
    /// Returns true if this mode needs vector search to be offered.
    pub fn uses_vectors(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Vectors => write!(f, "vectors"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for RetrievalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "vectors" | "vector" => Ok(Self::Vectors),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!(
                "Unknown retrieval mode: '{}'. Use 'text', 'vectors', or 'hybrid'.",
                s
            )),
        }
    }
}

// ============================================================================
// ReasoningEffort
// ============================================================================

/// Reasoning budget for generation or agentic retrieval.
///
/// An unset effort is represented as `Option::<ReasoningEffort>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    /// Parse an optional effort where the empty string means "unset".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl std::fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "minimal"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "Unknown reasoning effort: '{}'. Use 'minimal', 'low', 'medium', or 'high'.",
                s
            )),
        }
    }
}

// ============================================================================
// QueryType / AnalysisTab
// ============================================================================

/// Query type sent to the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Semantic reranking enabled.
    Semantic,
    /// Plain lexical/vector query.
    Simple,
}

/// One of the mutually exclusive inspection views shown beside a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisTab {
    Citation,
    ThoughtProcess,
    SupportingContent,
}

impl std::fmt::Display for AnalysisTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Citation => write!(f, "citation"),
            Self::ThoughtProcess => write!(f, "thought-process"),
            Self::SupportingContent => write!(f, "supporting-content"),
        }
    }
}

impl std::str::FromStr for AnalysisTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citation" => Ok(Self::Citation),
            "thought" | "thought-process" | "thoughtprocess" => Ok(Self::ThoughtProcess),
            "supporting" | "supporting-content" | "supportingcontent" => {
                Ok(Self::SupportingContent)
            }
            _ => Err(format!(
                "Unknown analysis tab: '{}'. Use 'citation', 'thought', or 'supporting'.",
                s
            )),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// An ad-hoc equality filter on a document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPair {
    pub key: String,
    pub value: String,
}

impl FilterPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for FilterPair {
    type Err = String;

    /// Parse `key=value`. Only the first `=` splits, so values may contain `=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok(Self::new(key.trim(), value))
            }
            _ => Err(format!("Expected `key=value`, got '{}'", s)),
        }
    }
}

// ============================================================================
// Search Request / Response
// ============================================================================

/// Body of a search request sent to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub top: u32,
    pub filter: String,
    pub query_type: QueryType,
    pub query_language: String,
    pub semantic_configuration: String,
}

/// Body of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchDocument>,
}

/// A single search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    #[serde(default)]
    pub id: Option<String>,

    /// Source file path (e.g. `manuals/benefits.pdf`).
    #[serde(default)]
    pub sourcefile: Option<String>,

    /// Direct storage URL for the source file.
    #[serde(default)]
    pub storage_url: Option<String>,

    /// Source page reference, usually `<file>#page=N`.
    #[serde(default)]
    pub sourcepage: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Markdown/HTML-safe content body.
    #[serde(default)]
    pub content: String,
}

impl SearchDocument {
    /// Title shown for the hit: the file stem of the last path segment.
    ///
    /// Falls back to `"Document"` when there is no usable source file.
    pub fn display_title(&self) -> String {
        self.sourcefile
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("Document")
            .to_string()
    }

    /// Upper-cased extension of the source file, if it has one.
    pub fn file_extension(&self) -> Option<String> {
        let name = self.sourcefile.as_deref()?.rsplit('/').next()?;
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_uppercase())
        }
    }

    /// Page number parsed from the `#page=N` anchor of `sourcepage`.
    pub fn page_number(&self) -> Option<&str> {
        let (_, page) = self.sourcepage.as_deref()?.split_once("#page=")?;
        if page.is_empty() {
            None
        } else {
            Some(page)
        }
    }
}

// ============================================================================
// Citations
// ============================================================================

/// How a citation target is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Shown as an image.
    Image,
    /// Rendered as markdown.
    Markdown,
    /// Embedded in a frame (PDF and everything else).
    Embedded,
}

impl DocumentKind {
    /// Classify a citation path by its extension (the fragment is ignored).
    pub fn from_path(path: &str) -> Self {
        let (path, _) = split_fragment(path);
        let ext = path
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());
        match ext.as_deref() {
            Some("png") => Self::Image,
            Some("md") => Self::Markdown,
            _ => Self::Embedded,
        }
    }
}

/// Split `path#fragment` into its parts.
///
/// The fragment (e.g. `page=4`) must be re-attached after the document is
/// fetched so viewers can jump to the cited page.
pub fn split_fragment(path: &str) -> (&str, Option<&str>) {
    match path.split_once('#') {
        Some((base, fragment)) if !fragment.is_empty() => (base, Some(fragment)),
        Some((base, _)) => (base, None),
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(sourcefile: Option<&str>, sourcepage: Option<&str>) -> SearchDocument {
        SearchDocument {
            sourcefile: sourcefile.map(String::from),
            sourcepage: sourcepage.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_retrieval_mode_from_str() {
        assert_eq!("text".parse::<RetrievalMode>(), Ok(RetrievalMode::Text));
        assert_eq!("Vectors".parse::<RetrievalMode>(), Ok(RetrievalMode::Vectors));
        assert_eq!("hybrid".parse::<RetrievalMode>(), Ok(RetrievalMode::Hybrid));
        assert!("both".parse::<RetrievalMode>().is_err());
        assert!(!RetrievalMode::Text.uses_vectors());
        assert!(RetrievalMode::Hybrid.uses_vectors());
    }

    #[test]
    fn test_reasoning_effort_parse_optional() {
        assert_eq!(ReasoningEffort::parse_optional(""), Ok(None));
        assert_eq!(ReasoningEffort::parse_optional("  "), Ok(None));
        assert_eq!(
            ReasoningEffort::parse_optional("medium"),
            Ok(Some(ReasoningEffort::Medium))
        );
        assert!(ReasoningEffort::parse_optional("extreme").is_err());
    }

    #[test]
    fn test_filter_pair_from_str() {
        let pair: FilterPair = "author=a=b".parse().unwrap();
        assert_eq!(pair, FilterPair::new("author", "a=b"));
        assert!("novalue".parse::<FilterPair>().is_err());
        assert!("=value".parse::<FilterPair>().is_err());
    }

    #[test]
    fn test_search_request_wire_shape() {
        let request = SearchRequest {
            query: "invoice".to_string(),
            top: 3,
            filter: String::new(),
            query_type: QueryType::Semantic,
            query_language: "en".to_string(),
            semantic_configuration: "default".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["queryType"], "semantic");
        assert_eq!(json["queryLanguage"], "en");
        assert_eq!(json["semanticConfiguration"], "default");
        assert_eq!(json["top"], 3);
    }

    #[test]
    fn test_search_response_missing_results() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());

        let response: SearchResponse = serde_json::from_str(
            r#"{"results":[{"id":"1","sourcefile":"a/b.pdf","storageUrl":"https://x/b.pdf","content":"hi"}]}"#,
        )
        .unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(
            response.results[0].storage_url.as_deref(),
            Some("https://x/b.pdf")
        );
    }

    #[test]
    fn test_display_title_and_extension() {
        let d = doc(Some("manuals/Benefit_Options.pdf"), None);
        assert_eq!(d.display_title(), "Benefit_Options");
        assert_eq!(d.file_extension().as_deref(), Some("PDF"));

        let d = doc(None, None);
        assert_eq!(d.display_title(), "Document");
        assert_eq!(d.file_extension(), None);

        let d = doc(Some("README"), None);
        assert_eq!(d.file_extension(), None);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(doc(None, Some("b.pdf#page=12")).page_number(), Some("12"));
        assert_eq!(doc(None, Some("b.pdf")).page_number(), None);
        assert_eq!(doc(None, Some("b.pdf#page=")).page_number(), None);
    }

    #[test]
    fn test_document_kind_and_fragment() {
        assert_eq!(split_fragment("a.pdf#page=4"), ("a.pdf", Some("page=4")));
        assert_eq!(split_fragment("a.pdf#"), ("a.pdf", None));
        assert_eq!(split_fragment("a.pdf"), ("a.pdf", None));
        assert_eq!(DocumentKind::from_path("img/chart.PNG"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_path("notes.md#intro"), DocumentKind::Markdown);
        assert_eq!(DocumentKind::from_path("a.pdf#page=4"), DocumentKind::Embedded);
    }
}
