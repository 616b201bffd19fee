//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `docsearch search` | `render_results_table()` |
//! | `docsearch features` | `render_options_table()`, `render_visibility_table()` |

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use docsearch_core::{RetrievalConfig, SearchDocument, Visibility};

use super::format::{or_dash, single_line, truncate_str};

/// Render search hits, numbered from 1.
///
/// # Example Output
///
/// ```text
/// #  TITLE      TYPE  PAGE  CATEGORY  CONTENT
/// 1  benefits   PDF   4     hr        Employees are eligible for...
/// 2  handbook   MD    -     -         The handbook describes...
/// ```
pub fn render_results_table(results: &[SearchDocument], content_width: usize) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("#").set_alignment(CellAlignment::Right),
        Cell::new("TITLE"),
        Cell::new("TYPE"),
        Cell::new("PAGE"),
        Cell::new("CATEGORY"),
        Cell::new("CONTENT"),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(2)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
    ]);

    for (i, doc) in results.iter().enumerate() {
        let extension = doc.file_extension();
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(truncate_str(&doc.display_title(), 30)),
            Cell::new(or_dash(extension.as_deref())),
            Cell::new(or_dash(doc.page_number())),
            Cell::new(or_dash(doc.category.as_deref())),
            Cell::new(truncate_str(&single_line(&doc.content), content_width)),
        ]);
    }

    table.trim_fmt().to_string()
}

fn render_pairs(header: &str, rows: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![Cell::new(header), Cell::new("VALUE")]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(24)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
    ]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table.trim_fmt().to_string()
}

fn effort(value: Option<docsearch_core::ReasoningEffort>) -> String {
    value.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render the effective retrieval options.
pub fn render_options_table(config: &RetrievalConfig) -> String {
    let o = config.options();
    let filter = config.filter_expression();
    let seed = o.seed.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());

    render_pairs(
        "OPTION",
        vec![
            ("retrievalMode", o.retrieval_mode.to_string()),
            ("retrieveCount", o.retrieve_count.to_string()),
            ("temperature", o.temperature.to_string()),
            ("seed", seed),
            ("minimumRerankerScore", o.minimum_reranker_score.to_string()),
            ("minimumSearchScore", o.minimum_search_score.to_string()),
            ("reasoningEffort", effort(o.reasoning_effort)),
            ("agenticReasoningEffort", effort(o.agentic_reasoning_effort)),
            ("useSemanticRanker", o.use_semantic_ranker.to_string()),
            ("useSemanticCaptions", o.use_semantic_captions.to_string()),
            ("useQueryRewriting", o.use_query_rewriting.to_string()),
            ("sendTextSources", o.send_text_sources.to_string()),
            ("sendImageSources", o.send_image_sources.to_string()),
            ("searchTextEmbeddings", o.search_text_embeddings.to_string()),
            ("searchImageEmbeddings", o.search_image_embeddings.to_string()),
            ("useAgenticKnowledgeBase", o.use_agentic_knowledge_base.to_string()),
            ("useWebSource", o.use_web_source.to_string()),
            ("useSharePointSource", o.use_sharepoint_source.to_string()),
            ("filter", or_dash(Some(filter.as_str())).to_string()),
        ],
    )
}

/// Render which options the deployment exposes.
pub fn render_visibility_table(config: &RetrievalConfig) -> String {
    let v: &Visibility = config.visibility();
    render_pairs(
        "CAPABILITY",
        vec![
            ("multimodalOptions", v.show_multimodal_options.to_string()),
            ("semanticRankerOption", v.show_semantic_ranker_option.to_string()),
            ("queryRewritingOption", v.show_query_rewriting_option.to_string()),
            ("reasoningEffortOption", v.show_reasoning_effort_option.to_string()),
            ("vectorOption", v.show_vector_option.to_string()),
            ("agenticRetrievalOption", v.show_agentic_retrieval_option.to_string()),
            ("webSource", v.web_source_supported.to_string()),
            ("sharepointSource", v.sharepoint_source_supported.to_string()),
            ("userUpload", v.show_user_upload.to_string()),
            ("languagePicker", v.show_language_picker.to_string()),
            ("speechInput", v.show_speech_input.to_string()),
            ("speechOutputBrowser", v.show_speech_output_browser.to_string()),
            ("speechOutputAzure", v.show_speech_output_azure.to_string()),
            (
                "minimalAgenticEffort",
                (!config.hide_minimal_retrieval_reasoning_option()).to_string(),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<SearchDocument> {
        vec![
            SearchDocument {
                id: Some("1".to_string()),
                sourcefile: Some("manuals/benefits.pdf".to_string()),
                sourcepage: Some("benefits.pdf#page=4".to_string()),
                category: Some("hr".to_string()),
                content: "Employees are\neligible for dental coverage".to_string(),
                ..Default::default()
            },
            SearchDocument {
                id: Some("2".to_string()),
                content: "No source file".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_results_table_structure() {
        let output = render_results_table(&sample_results(), 40);
        assert!(output.contains("TITLE"));
        assert!(output.contains("CATEGORY"));
        assert!(output.contains("benefits"));
        assert!(output.contains("PDF"));
        assert!(output.contains("Employees are eligible"));
        assert!(output.contains("Document"));
    }

    #[test]
    fn test_results_table_empty() {
        assert_eq!(render_results_table(&[], 40), "");
    }

    #[test]
    fn test_options_table_degraded() {
        let output = render_options_table(&RetrievalConfig::default());
        assert!(output.contains("retrievalMode"));
        assert!(output.contains("text"));
        assert!(output.contains("minimal"));
    }

    #[test]
    fn test_visibility_table_degraded() {
        let output = render_visibility_table(&RetrievalConfig::default());
        assert!(output.contains("webSource"));
        // Only the minimal agentic effort stays offered.
        assert_eq!(output.matches("true").count(), 1);
    }
}
