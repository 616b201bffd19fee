//! Selection state: active citation, open analysis tab, selected result.

use serde::Serialize;

use crate::types::{AnalysisTab, SearchDocument};

/// Which citation/result is active and which analysis tab is open.
///
/// Invariant: when the open tab is [`AnalysisTab::Citation`], a citation is
/// set. Every mutator preserves this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    active_citation: Option<String>,
    active_tab: Option<AnalysisTab>,
    selected_result: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_citation(&self) -> Option<&str> {
        self.active_citation.as_deref()
    }

    pub fn active_tab(&self) -> Option<AnalysisTab> {
        self.active_tab
    }

    /// Index into the last session's results.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_result
    }

    /// Show a citation.
    ///
    /// Showing the citation that is already open on the citation tab closes
    /// it. Otherwise the citation becomes active and the citation tab opens,
    /// whatever tab was open before.
    pub fn show_citation(&mut self, id: &str) {
        let already_open = self.active_citation.as_deref() == Some(id)
            && self.active_tab == Some(AnalysisTab::Citation);

        if already_open {
            self.active_citation = None;
            self.active_tab = None;
        } else {
            self.active_citation = Some(id.to_string());
            self.active_tab = Some(AnalysisTab::Citation);
        }
    }

    /// Toggle an analysis tab open or closed.
    ///
    /// Opening the citation tab with no active citation does nothing.
    pub fn toggle_tab(&mut self, tab: AnalysisTab) {
        if self.active_tab == Some(tab) {
            self.active_tab = None;
            return;
        }
        if tab == AnalysisTab::Citation && self.active_citation.is_none() {
            tracing::debug!("No active citation; citation tab stays closed");
            return;
        }
        self.active_tab = Some(tab);
    }

    /// Clear the citation along with its tab association.
    pub fn clear_citation(&mut self) {
        self.active_citation = None;
        if self.active_tab == Some(AnalysisTab::Citation) {
            self.active_tab = None;
        }
    }

    pub fn select_result(&mut self, index: usize) {
        self.selected_result = Some(index);
    }

    /// Resolve the selected index against a result list.
    pub fn selected_result<'a>(&self, results: &'a [SearchDocument]) -> Option<&'a SearchDocument> {
        self.selected_result.and_then(|i| results.get(i))
    }

    /// Forget everything; used when a new query is submitted.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_citation_twice_toggles_off() {
        let mut selection = SelectionState::new();
        selection.show_citation("doc1.pdf");
        assert_eq!(selection.active_citation(), Some("doc1.pdf"));
        assert_eq!(selection.active_tab(), Some(AnalysisTab::Citation));

        selection.show_citation("doc1.pdf");
        assert_eq!(selection.active_citation(), None);
        assert_eq!(selection.active_tab(), None);
    }

    #[test]
    fn test_show_other_citation_switches() {
        let mut selection = SelectionState::new();
        selection.show_citation("doc1.pdf");
        selection.show_citation("doc2.pdf");
        assert_eq!(selection.active_citation(), Some("doc2.pdf"));
        assert_eq!(selection.active_tab(), Some(AnalysisTab::Citation));
    }

    #[test]
    fn test_citation_wins_over_open_tab() {
        let mut selection = SelectionState::new();
        selection.toggle_tab(AnalysisTab::ThoughtProcess);
        selection.show_citation("doc1.pdf");
        assert_eq!(selection.active_tab(), Some(AnalysisTab::Citation));
    }

    #[test]
    fn test_same_citation_reopens_after_tab_change() {
        let mut selection = SelectionState::new();
        selection.show_citation("doc1.pdf");
        selection.toggle_tab(AnalysisTab::SupportingContent);
        selection.show_citation("doc1.pdf");
        assert_eq!(selection.active_citation(), Some("doc1.pdf"));
        assert_eq!(selection.active_tab(), Some(AnalysisTab::Citation));
    }

    #[test]
    fn test_toggle_tab() {
        let mut selection = SelectionState::new();
        selection.toggle_tab(AnalysisTab::ThoughtProcess);
        assert_eq!(selection.active_tab(), Some(AnalysisTab::ThoughtProcess));
        selection.toggle_tab(AnalysisTab::SupportingContent);
        assert_eq!(selection.active_tab(), Some(AnalysisTab::SupportingContent));
        selection.toggle_tab(AnalysisTab::SupportingContent);
        assert_eq!(selection.active_tab(), None);
    }

    #[test]
    fn test_citation_tab_requires_citation() {
        let mut selection = SelectionState::new();
        selection.toggle_tab(AnalysisTab::Citation);
        assert_eq!(selection.active_tab(), None);

        selection.show_citation("a.md");
        selection.toggle_tab(AnalysisTab::Citation);
        assert_eq!(selection.active_tab(), None);
        assert_eq!(selection.active_citation(), Some("a.md"));
        selection.toggle_tab(AnalysisTab::Citation);
        assert_eq!(selection.active_tab(), Some(AnalysisTab::Citation));
    }

    #[test]
    fn test_clear_citation_clears_tab() {
        let mut selection = SelectionState::new();
        selection.show_citation("doc1.pdf");
        selection.clear_citation();
        assert_eq!(selection, SelectionState::default());

        selection.toggle_tab(AnalysisTab::ThoughtProcess);
        selection.clear_citation();
        assert_eq!(selection.active_tab(), Some(AnalysisTab::ThoughtProcess));
    }

    #[test]
    fn test_selected_result_and_reset() {
        let results = vec![
            SearchDocument {
                id: Some("1".to_string()),
                ..Default::default()
            },
            SearchDocument {
                id: Some("2".to_string()),
                ..Default::default()
            },
        ];
        let mut selection = SelectionState::new();
        assert!(selection.selected_result(&results).is_none());

        selection.select_result(1);
        assert_eq!(selection.selected_index(), Some(1));
        assert_eq!(
            selection.selected_result(&results).and_then(|d| d.id.as_deref()),
            Some("2")
        );

        selection.select_result(5);
        assert!(selection.selected_result(&results).is_none());

        selection.show_citation("x");
        selection.reset();
        assert_eq!(selection, SelectionState::default());
    }
}
