//! The document search session.
//!
//! [`DocumentSearchSession`] ties the pieces together and is what a front-end
//! drives: it loads the deployment features once, owns the retrieval
//! configuration, the search controller, the selection state and the audio
//! slot, and reacts to [`SessionEvent`]s.
//!
//! Rendering collaborators only get shared references to the state.

use crate::client_config::ClientConfig;
use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_SEMANTIC_CONFIGURATION};
use crate::errors::DocSearchResult;
use crate::features::{load_features, DeploymentFeatures};
use crate::playback::{AudioPlayer, PlaybackSlot};
use crate::retrieval::RetrievalConfig;
use crate::search::{PendingSearch, SearchController, SubmissionId};
use crate::selection::SelectionState;
use crate::settings::{SettingChange, SettingOutcome};
use crate::transport::{EnvToken, FeatureSource, SearchTransport, TokenProvider};
use crate::types::{AnalysisTab, SearchResponse};

// ============================================================================
// Options / Events
// ============================================================================

/// How a session is set up.
pub struct SessionOptions {
    pub language: String,
    pub semantic_configuration: String,
    /// Present when login is enabled.
    pub token_provider: Option<Box<dyn TokenProvider>>,
    /// Applied in order after the features are loaded.
    pub initial_settings: Vec<SettingChange>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            semantic_configuration: DEFAULT_SEMANTIC_CONFIGURATION.to_string(),
            token_provider: None,
            initial_settings: Vec::new(),
        }
    }
}

impl std::fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("language", &self.language)
            .field("semantic_configuration", &self.semantic_configuration)
            .field("login", &self.token_provider.is_some())
            .field("initial_settings", &self.initial_settings)
            .finish()
    }
}

impl SessionOptions {
    /// Derive session options from the client configuration.
    pub fn from_client_config(config: &ClientConfig) -> DocSearchResult<Self> {
        let token_provider = config
            .token_env()
            .map(|var| Box::new(EnvToken::new(var)) as Box<dyn TokenProvider>);

        Ok(Self {
            language: config.language.clone(),
            semantic_configuration: config.semantic_configuration.clone(),
            token_provider,
            initial_settings: config.setting_changes()?,
        })
    }
}

/// Events a front-end feeds into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SubmitQuery(String),
    ChangeSetting(SettingChange),
    ShowCitation(String),
    ToggleTab(AnalysisTab),
    SelectResult(usize),
    /// Play the spoken answer at this URL.
    PlaySpeech(String),
    StopSpeech,
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// A search ran to completion under this id.
    Submitted(SubmissionId),
    /// The setting dispatcher's verdict.
    Setting(SettingOutcome),
    /// Selection or playback state changed.
    Updated,
    /// Nothing happened (blank query).
    Ignored,
}

// ============================================================================
// DocumentSearchSession
// ============================================================================

/// A single user's search session.
pub struct DocumentSearchSession<T: SearchTransport, P: AudioPlayer> {
    transport: T,
    features: DeploymentFeatures,
    config: RetrievalConfig,
    search: SearchController,
    selection: SelectionState,
    playback: PlaybackSlot<P>,
    language: String,
    token_provider: Option<Box<dyn TokenProvider>>,
}

impl<T: SearchTransport, P: AudioPlayer> DocumentSearchSession<T, P> {
    /// Start a session.
    ///
    /// Fetches the deployment features exactly once (degrading on failure),
    /// derives the retrieval configuration, then applies the initial settings
    /// through the dispatcher so gating holds for them too.
    pub async fn start<F>(transport: T, player: P, feature_source: &F, options: SessionOptions) -> Self
    where
        F: FeatureSource + ?Sized,
    {
        let features = load_features(feature_source).await;
        let mut config = RetrievalConfig::from_features(&features);

        for change in options.initial_settings {
            let field = change.field();
            if let SettingOutcome::Rejected(e) = config.apply(change) {
                tracing::warn!("Initial setting `{}` not applied: {}", field, e);
            }
        }

        tracing::debug!(
            language = %options.language,
            login = options.token_provider.is_some(),
            "Session started"
        );

        Self {
            transport,
            features,
            config,
            search: SearchController::new(options.semantic_configuration),
            selection: SelectionState::new(),
            playback: PlaybackSlot::new(player),
            language: options.language,
            token_provider: options.token_provider,
        }
    }

    pub fn features(&self) -> &DeploymentFeatures {
        &self.features
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn playback(&self) -> &PlaybackSlot<P> {
        &self.playback
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Change the query language used by later submissions.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Handle one front-end event.
    ///
    /// Only playback failures are returned as errors; search and setting
    /// failures become session state.
    pub async fn handle(&mut self, event: SessionEvent) -> DocSearchResult<EventOutcome> {
        let outcome = match event {
            SessionEvent::SubmitQuery(query) => match self.submit(&query).await {
                Some(id) => EventOutcome::Submitted(id),
                None => EventOutcome::Ignored,
            },
            SessionEvent::ChangeSetting(change) => EventOutcome::Setting(self.config.apply(change)),
            SessionEvent::ShowCitation(id) => {
                self.selection.show_citation(&id);
                EventOutcome::Updated
            }
            SessionEvent::ToggleTab(tab) => {
                self.selection.toggle_tab(tab);
                EventOutcome::Updated
            }
            SessionEvent::SelectResult(index) => {
                self.selection.select_result(index);
                EventOutcome::Updated
            }
            SessionEvent::PlaySpeech(url) => {
                self.playback.play(&url)?;
                EventOutcome::Updated
            }
            SessionEvent::StopSpeech => {
                self.playback.stop()?;
                EventOutcome::Updated
            }
        };
        Ok(outcome)
    }

    /// Record a submission without sending it.
    ///
    /// Resets the selection and stops playback; the previous results are
    /// superseded. Returns `None` for a blank query.
    pub fn begin_search(&mut self, query: &str) -> Option<PendingSearch> {
        let pending = self.search.begin(query, &self.config, &self.language)?;
        self.selection.reset();
        if let Err(e) = self.playback.stop() {
            tracing::warn!("{}", e);
        }
        Some(pending)
    }

    /// Apply a transport outcome. Stale ids are dropped.
    pub fn finish_search(&mut self, id: SubmissionId, outcome: DocSearchResult<SearchResponse>) -> bool {
        self.search.complete(id, outcome)
    }

    /// Run one submission end to end.
    ///
    /// With login enabled a token is acquired first; failing to get one puts
    /// the session in the error state without calling the transport.
    pub async fn submit(&mut self, query: &str) -> Option<SubmissionId> {
        let pending = self.begin_search(query)?;

        let token = match &self.token_provider {
            Some(provider) => match provider.token().await {
                Ok(token) => Some(token),
                Err(e) => {
                    self.finish_search(pending.id, Err(e));
                    return Some(pending.id);
                }
            },
            None => None,
        };

        let outcome = self
            .transport
            .search(&pending.request, token.as_deref())
            .await;
        self.finish_search(pending.id, outcome);
        Some(pending.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DocSearchError;
    use crate::search::SearchStatus;
    use crate::transport::StaticToken;
    use crate::types::{ReasoningEffort, SearchDocument, SearchRequest};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;

    struct FakeTransport {
        outcome: DocSearchResult<SearchResponse>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl FakeTransport {
        fn ok(ids: &[&str]) -> Self {
            let results = ids
                .iter()
                .map(|id| SearchDocument {
                    id: Some(id.to_string()),
                    ..Default::default()
                })
                .collect();
            Self {
                outcome: Ok(SearchResponse { results }),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.tokens.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchTransport for FakeTransport {
        async fn search(
            &self,
            _request: &SearchRequest,
            token: Option<&str>,
        ) -> DocSearchResult<SearchResponse> {
            self.tokens.lock().unwrap().push(token.map(String::from));
            self.outcome.clone()
        }
    }

    struct Features(DocSearchResult<DeploymentFeatures>);

    #[async_trait]
    impl FeatureSource for Features {
        async fn fetch_features(&self) -> DocSearchResult<DeploymentFeatures> {
            self.0.clone()
        }
    }

    struct NoToken;

    #[async_trait]
    impl TokenProvider for NoToken {
        async fn token(&self) -> DocSearchResult<String> {
            Err(DocSearchError::TokenUnavailable("signed out".into()))
        }
    }

    #[derive(Clone, Default)]
    struct Player(Rc<RefCell<Vec<String>>>);

    impl AudioPlayer for Player {
        fn play(&mut self, url: &str) -> DocSearchResult<()> {
            self.0.borrow_mut().push(format!("play {url}"));
            Ok(())
        }

        fn stop(&mut self) -> DocSearchResult<()> {
            self.0.borrow_mut().push("stop".to_string());
            Ok(())
        }
    }

    fn web_enabled() -> Features {
        Features(Ok(DeploymentFeatures {
            show_agentic_retrieval_option: true,
            web_source_enabled: true,
            ..Default::default()
        }))
    }

    async fn session_with(
        transport: FakeTransport,
        options: SessionOptions,
    ) -> DocumentSearchSession<FakeTransport, Player> {
        DocumentSearchSession::start(transport, Player::default(), &web_enabled(), options).await
    }

    #[tokio::test]
    async fn test_start_degrades_on_feature_failure() {
        let source = Features(Err(DocSearchError::ConfigLoad("503".into())));
        let session = DocumentSearchSession::start(
            FakeTransport::ok(&[]),
            Player::default(),
            &source,
            SessionOptions::default(),
        )
        .await;
        assert_eq!(session.config(), &RetrievalConfig::default());
        assert_eq!(session.search().status(), SearchStatus::Idle);
    }

    #[tokio::test]
    async fn test_initial_settings_respect_gating() {
        let options = SessionOptions {
            initial_settings: vec![
                SettingChange::UseSemanticRanker(true),
                SettingChange::Temperature(0.9),
            ],
            ..Default::default()
        };
        let session = session_with(FakeTransport::ok(&[]), options).await;
        assert!(!session.config().options().use_semantic_ranker);
        assert_eq!(session.config().options().temperature, 0.9);
    }

    #[tokio::test]
    async fn test_submit_resets_selection_and_stops_audio() {
        let mut session = session_with(FakeTransport::ok(&["a", "b"]), SessionOptions::default()).await;
        let log = session.playback().player().0.clone();

        session
            .handle(SessionEvent::ShowCitation("doc1.pdf".into()))
            .await
            .unwrap();
        session
            .handle(SessionEvent::PlaySpeech("answer.mp3".into()))
            .await
            .unwrap();
        assert!(session.playback().is_playing());

        let outcome = session
            .handle(SessionEvent::SubmitQuery("invoice".into()))
            .await
            .unwrap();
        assert!(matches!(outcome, EventOutcome::Submitted(_)));
        assert_eq!(session.selection(), &SelectionState::default());
        assert!(!session.playback().is_playing());
        assert_eq!(*log.borrow(), vec!["play answer.mp3", "stop"]);
        assert_eq!(session.search().results().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let mut session = session_with(FakeTransport::ok(&[]), SessionOptions::default()).await;
        session
            .handle(SessionEvent::ShowCitation("doc1.pdf".into()))
            .await
            .unwrap();
        let outcome = session
            .handle(SessionEvent::SubmitQuery("  ".into()))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(session.selection().active_citation(), Some("doc1.pdf"));
        assert_eq!(session.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_change_setting_coupling() {
        let mut session = session_with(FakeTransport::ok(&[]), SessionOptions::default()).await;
        assert!(session.config().options().use_web_source);

        let outcome = session
            .handle(SessionEvent::ChangeSetting(SettingChange::AgenticReasoningEffort(
                Some(ReasoningEffort::Minimal),
            )))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Setting(SettingOutcome::Applied));
        assert!(!session.config().options().use_web_source);
        assert!(!session.config().hide_minimal_retrieval_reasoning_option());
    }

    #[tokio::test]
    async fn test_tabs_and_results() {
        let mut session = session_with(FakeTransport::ok(&["a", "b"]), SessionOptions::default()).await;
        session.submit("q").await.unwrap();
        session.handle(SessionEvent::SelectResult(1)).await.unwrap();
        session
            .handle(SessionEvent::ToggleTab(AnalysisTab::ThoughtProcess))
            .await
            .unwrap();

        let selected = session
            .selection()
            .selected_result(session.search().results())
            .and_then(|d| d.id.as_deref());
        assert_eq!(selected, Some("b"));
        assert_eq!(
            session.selection().active_tab(),
            Some(AnalysisTab::ThoughtProcess)
        );
    }

    #[tokio::test]
    async fn test_token_is_forwarded() {
        let options = SessionOptions {
            token_provider: Some(Box::new(StaticToken::new("secret"))),
            ..Default::default()
        };
        let mut session = session_with(FakeTransport::ok(&["a"]), options).await;
        session.submit("q").await.unwrap();
        assert_eq!(
            *session.transport().tokens.lock().unwrap(),
            vec![Some("secret".to_string())]
        );
    }

    #[tokio::test]
    async fn test_token_failure_is_error_state() {
        let options = SessionOptions {
            token_provider: Some(Box::new(NoToken)),
            ..Default::default()
        };
        let mut session = session_with(FakeTransport::ok(&["a"]), options).await;
        session.submit("q").await.unwrap();

        assert_eq!(session.search().status(), SearchStatus::Error);
        let error = session.search().session().unwrap().error.clone().unwrap();
        assert!(error.contains("signed out"));
        assert_eq!(session.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_searches_latest_wins() {
        let mut session = session_with(FakeTransport::ok(&[]), SessionOptions::default()).await;
        let first = session.begin_search("first").unwrap();
        let second = session.begin_search("second").unwrap();

        assert!(session.finish_search(
            second.id,
            Err(DocSearchError::SearchTransport("timeout".into()))
        ));
        assert!(!session.finish_search(first.id, Ok(SearchResponse::default())));
        assert_eq!(session.search().status(), SearchStatus::Error);
        assert_eq!(session.search().session().unwrap().query, "second");
    }

    #[tokio::test]
    async fn test_language_flows_into_requests() {
        let mut session = session_with(FakeTransport::ok(&[]), SessionOptions::default()).await;
        assert_eq!(session.language(), "en");
        session.set_language("de");
        let pending = session.begin_search("q").unwrap();
        assert_eq!(pending.request.query_language, "de");
    }

    #[test]
    fn test_options_from_client_config() {
        let mut client = ClientConfig {
            language: "fr".to_string(),
            ..Default::default()
        };
        client.auth.token_env = Some("DOCSEARCH_TOKEN".to_string());
        client
            .settings
            .insert("temperature".to_string(), serde_json::json!(0.5));

        let options = SessionOptions::from_client_config(&client).unwrap();
        assert_eq!(options.language, "fr");
        assert!(options.token_provider.is_some());
        assert_eq!(options.initial_settings, vec![SettingChange::Temperature(0.5)]);
    }
}
