//! Deployment feature flags (the config loader).
//!
//! The backend advertises which retrieval options a deployment supports. The
//! flags are fetched exactly once when a session starts; a failed fetch is
//! absorbed here and degrades to [`DeploymentFeatures::default`], which hides
//! and disables every gated option.

use serde::{Deserialize, Serialize};

use crate::transport::FeatureSource;

/// Flat feature-flag object returned by the deployment.
///
/// Unknown keys are ignored. Missing keys default to `false`/absent, except
/// `ragSearchTextEmbeddings` which defaults to `true` to match the option's
/// own default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentFeatures {
    #[serde(default)]
    pub show_multimodal_options: bool,
    #[serde(default)]
    pub rag_send_text_sources: Option<bool>,
    #[serde(default)]
    pub rag_send_image_sources: bool,
    #[serde(default = "default_true")]
    pub rag_search_text_embeddings: bool,
    #[serde(default)]
    pub rag_search_image_embeddings: bool,

    #[serde(default)]
    pub show_semantic_ranker_option: bool,
    #[serde(default)]
    pub show_query_rewriting_option: bool,

    #[serde(default)]
    pub show_reasoning_effort_option: bool,
    /// Generation reasoning effort; empty means unset.
    #[serde(default)]
    pub default_reasoning_effort: String,

    #[serde(default)]
    pub show_vector_option: bool,
    #[serde(default)]
    pub show_user_upload: bool,
    #[serde(default)]
    pub show_language_picker: bool,
    #[serde(default)]
    pub show_speech_input: bool,
    #[serde(default)]
    pub show_speech_output_browser: bool,
    #[serde(default)]
    pub show_speech_output_azure: bool,

    #[serde(default)]
    pub show_agentic_retrieval_option: bool,
    /// Agentic retrieval reasoning effort; absent means minimal.
    #[serde(default)]
    pub default_retrieval_reasoning_effort: Option<String>,

    #[serde(default)]
    pub web_source_enabled: bool,
    #[serde(default)]
    pub sharepoint_source_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DeploymentFeatures {
    fn default() -> Self {
        Self {
            show_multimodal_options: false,
            rag_send_text_sources: None,
            rag_send_image_sources: false,
            rag_search_text_embeddings: default_true(),
            rag_search_image_embeddings: false,
            show_semantic_ranker_option: false,
            show_query_rewriting_option: false,
            show_reasoning_effort_option: false,
            default_reasoning_effort: String::new(),
            show_vector_option: false,
            show_user_upload: false,
            show_language_picker: false,
            show_speech_input: false,
            show_speech_output_browser: false,
            show_speech_output_azure: false,
            show_agentic_retrieval_option: false,
            default_retrieval_reasoning_effort: None,
            web_source_enabled: false,
            sharepoint_source_enabled: false,
        }
    }
}

/// Fetch the deployment features once.
///
/// Never fails: on error the failure is logged and the degraded default is
/// returned. The call is not retried.
pub async fn load_features<S>(source: &S) -> DeploymentFeatures
where
    S: FeatureSource + ?Sized,
{
    match source.fetch_features().await {
        Ok(features) => {
            tracing::debug!(?features, "Loaded deployment features");
            features
        }
        Err(e) => {
            tracing::warn!("{}; gated options stay hidden", e);
            DeploymentFeatures::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DocSearchError, DocSearchResult};
    use async_trait::async_trait;

    struct FixedSource(DocSearchResult<DeploymentFeatures>);

    #[async_trait]
    impl FeatureSource for FixedSource {
        async fn fetch_features(&self) -> DocSearchResult<DeploymentFeatures> {
            self.0.clone()
        }
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let features: DeploymentFeatures = serde_json::from_str("{}").unwrap();
        assert_eq!(features, DeploymentFeatures::default());
        assert!(features.rag_search_text_embeddings);
        assert!(!features.show_semantic_ranker_option);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let features: DeploymentFeatures = serde_json::from_str(
            r#"{"showVectorOption": true, "someFutureFlag": "x", "webSourceEnabled": true}"#,
        )
        .unwrap();
        assert!(features.show_vector_option);
        assert!(features.web_source_enabled);
    }

    #[test]
    fn test_camel_case_keys() {
        let features: DeploymentFeatures = serde_json::from_str(
            r#"{"sharepointSourceEnabled": true, "defaultRetrievalReasoningEffort": "low", "ragSendTextSources": false}"#,
        )
        .unwrap();
        assert!(features.sharepoint_source_enabled);
        assert_eq!(
            features.default_retrieval_reasoning_effort.as_deref(),
            Some("low")
        );
        assert_eq!(features.rag_send_text_sources, Some(false));
    }

    #[tokio::test]
    async fn test_load_features_success() {
        let served = DeploymentFeatures {
            show_semantic_ranker_option: true,
            ..Default::default()
        };
        let source = FixedSource(Ok(served.clone()));
        assert_eq!(load_features(&source).await, served);
    }

    #[tokio::test]
    async fn test_load_features_failure_degrades() {
        let source = FixedSource(Err(DocSearchError::ConfigLoad("connection refused".into())));
        assert_eq!(load_features(&source).await, DeploymentFeatures::default());
    }
}
