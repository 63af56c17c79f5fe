// Display state - owner of the retained raw tree, active columns, derived
// display tree and expand/collapse set
//
// The display tree is never patched: every fetch and every column commit
// rebuilds it from the retained original.

use std::collections::BTreeSet;

use casetree_types::{ColumnSpec, DisplayNode, DisplayTree, FetchError, FetchResult, RecordArena};
use serde::Serialize;

use crate::config::{ExpansionPolicy, ExplorerConfig};
use crate::diagnostics::{ConfigurationWarning, NormalizationWarning};
use crate::editor::{self, CommitOutcome, EditSession, EditorAction, EditorState};
use crate::normalize::Normalizer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// No fetch result has arrived yet.
    Loading,
    Ready,
    /// The backend reported that there are no records.
    NoData,
    Failed { message: String },
}

/// One row of the flattened, expansion-aware view.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub depth: usize,
    pub node: &'a DisplayNode,
    pub expanded: bool,
}

#[derive(Debug, Clone)]
pub struct DisplayState {
    normalizer: Normalizer,
    expansion_on_commit: ExpansionPolicy,
    original: Option<RecordArena>,
    columns: Vec<ColumnSpec>,
    tree: DisplayTree,
    expanded: BTreeSet<String>,
    status: LoadStatus,
    error: Option<FetchError>,
    warnings: Vec<NormalizationWarning>,
    editor: EditorState,
    revision: u64,
}

impl DisplayState {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self::with_normalizer(columns, Normalizer::default())
    }

    pub fn with_normalizer(columns: Vec<ColumnSpec>, normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            expansion_on_commit: ExpansionPolicy::default(),
            original: None,
            columns,
            tree: DisplayTree::default(),
            expanded: BTreeSet::new(),
            status: LoadStatus::Loading,
            error: None,
            warnings: Vec::new(),
            editor: EditorState::Viewing,
            revision: 0,
        }
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        let mut state = Self::with_normalizer(
            config.initial_columns(),
            Normalizer::new(config.normalize_options()),
        );
        state.expansion_on_commit = config.expansion_on_commit;
        state
    }

    pub fn set_expansion_on_commit(&mut self, policy: ExpansionPolicy) {
        self.expansion_on_commit = policy;
    }

    /// Accept the single result of a fetch.
    ///
    /// Data is retained verbatim as the new original, normalized, and the
    /// tree fully expanded. An error is surfaced as-is; the last good tree
    /// is kept. `Pending` clears any earlier error.
    pub fn receive(&mut self, result: FetchResult) {
        match result {
            FetchResult::Pending => {
                self.status = LoadStatus::Loading;
                self.error = None;
            }
            FetchResult::Error(error) => {
                tracing::error!(message = %error.display_message(), "case hierarchy fetch failed");
                self.status = LoadStatus::Failed {
                    message: error.display_message().to_string(),
                };
                self.error = Some(error);
            }
            FetchResult::Data(root) => {
                self.original = Some(RecordArena::from_root(&root));
                self.error = None;
                self.rebuild();
                self.expanded = self.tree.node_ids().into_iter().collect();
                self.status = if self.tree.is_no_data() {
                    LoadStatus::NoData
                } else {
                    LoadStatus::Ready
                };
            }
        }
    }

    /// Feed one action to the column editor, applying the configured
    /// expansion policy when it commits.
    pub fn dispatch(&mut self, action: EditorAction) -> Option<ConfigurationWarning> {
        let policy = self.expansion_on_commit;
        self.dispatch_with_policy(action, policy)
    }

    pub fn dispatch_with_policy(
        &mut self,
        action: EditorAction,
        policy: ExpansionPolicy,
    ) -> Option<ConfigurationWarning> {
        let current = std::mem::take(&mut self.editor);
        let transition = editor::reduce(current, action, &self.columns);
        self.editor = transition.state;

        transition
            .committed
            .and_then(|outcome| self.apply_commit(outcome, policy))
    }

    /// Swap in a committed column set and rebuild the tree from the
    /// retained original.
    pub fn apply_commit(
        &mut self,
        outcome: CommitOutcome,
        policy: ExpansionPolicy,
    ) -> Option<ConfigurationWarning> {
        self.columns = outcome.columns;
        let previous = std::mem::take(&mut self.expanded);
        self.rebuild();

        let ids = self.tree.node_ids().into_iter();
        self.expanded = match policy {
            ExpansionPolicy::Reset => ids.collect(),
            ExpansionPolicy::Preserve => ids.filter(|id| previous.contains(id)).collect(),
        };

        outcome.warning
    }

    /// Replace the expanded set with the renderer's view of it.
    pub fn set_expanded_rows(&mut self, ids: impl IntoIterator<Item = String>) {
        self.expanded = ids.into_iter().collect();
    }

    /// Flip one row; returns whether it is expanded afterwards.
    ///
    /// Expansion is keyed by id, so rows sharing an id expand and collapse
    /// together.
    pub fn toggle_row(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Pre-order rows a renderer would show, skipping descendants of
    /// collapsed nodes.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &DisplayNode)> =
            self.tree.records().iter().rev().map(|node| (0, node)).collect();

        while let Some((depth, node)) = stack.pop() {
            let is_expanded = self.expanded.contains(node.id.as_str());
            rows.push(VisibleRow {
                depth,
                node,
                expanded: is_expanded,
            });
            if is_expanded {
                stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            }
        }

        rows
    }

    fn rebuild(&mut self) {
        let Some(original) = &self.original else {
            return;
        };

        let normalized = self.normalizer.normalize_arena(original);
        self.tree = normalized.tree;
        self.warnings = normalized.warnings;
        self.revision += 1;
        tracing::info!(
            revision = self.revision,
            nodes = self.tree.node_count(),
            warnings = self.warnings.len(),
            "display tree rebuilt"
        );
    }

    pub fn display_tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Expanded ids, each once, in sorted order.
    pub fn expanded_rows(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_no_data(&self) -> bool {
        self.status == LoadStatus::NoData
    }

    pub fn warnings(&self) -> &[NormalizationWarning] {
        &self.warnings
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    /// Bumped on every rebuild; renderers key their grid on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ColumnEdit;
    use casetree_types::{ColumnId, RawRecordNode};

    fn sample() -> RawRecordNode {
        RawRecordNode::new("500000000000001")
            .with_field("createdDate", "2024-01-05T10:00:00.000+0000")
            .with_children(vec![
                RawRecordNode::new("500000000000002").with_children(vec![RawRecordNode::new(
                    "500000000000004",
                )]),
                RawRecordNode::new("500000000000003"),
            ])
    }

    fn state() -> DisplayState {
        DisplayState::from_config(&ExplorerConfig::default())
    }

    #[test]
    fn test_starts_loading() {
        let state = state();
        assert!(state.is_loading());
        assert_eq!(state.columns().len(), 8);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn test_receive_data_expands_everything() {
        let mut state = state();
        state.receive(FetchResult::Data(sample()));

        assert_eq!(state.status(), &LoadStatus::Ready);
        let expanded: Vec<&str> = state.expanded_rows().iter().map(String::as_str).collect();
        assert_eq!(
            expanded,
            vec![
                "500000000000001",
                "500000000000002",
                "500000000000003",
                "500000000000004"
            ]
        );
        assert_eq!(state.visible_rows().len(), 4);
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_receive_sentinel_is_no_data() {
        let mut state = state();
        state.receive(FetchResult::Data(RawRecordNode::new("no-cases")));

        assert!(state.is_no_data());
        assert!(state.display_tree().is_no_data());
        assert!(state.visible_rows().is_empty());
        assert!(state.expanded_rows().is_empty());
    }

    #[test]
    fn test_receive_error_keeps_message() {
        let mut state = state();
        state.receive(FetchResult::Error(FetchError::new("Insufficient access")));

        assert!(state.has_error());
        assert_eq!(
            state.status(),
            &LoadStatus::Failed {
                message: "Insufficient access".to_string()
            }
        );
    }

    #[test]
    fn test_pending_after_error_clears_it() {
        let mut state = state();
        state.receive(FetchResult::Error(FetchError::new("Insufficient access")));
        state.receive(FetchResult::Pending);

        assert!(state.is_loading());
        assert!(!state.has_error());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_duplicate_ids_collapse_together() {
        let mut state = state();
        state.receive(FetchResult::Data(
            RawRecordNode::new("500000000000001").with_children(vec![
                RawRecordNode::new("dup").with_children(vec![RawRecordNode::new("x")]),
                RawRecordNode::new("dup"),
            ]),
        ));
        assert_eq!(state.expanded_rows().len(), 3);

        assert!(!state.toggle_row("dup"));
        assert!(!state.is_expanded("dup"));
        assert_eq!(state.visible_rows().len(), 3);

        assert!(state.toggle_row("dup"));
        assert_eq!(state.visible_rows().len(), 4);
    }

    #[test]
    fn test_collapsed_rows_hide_descendants() {
        let mut state = state();
        state.receive(FetchResult::Data(sample()));

        assert!(!state.toggle_row("500000000000002"));
        let ids: Vec<_> = state
            .visible_rows()
            .iter()
            .map(|row| row.node.id.clone())
            .collect();
        assert_eq!(ids, vec!["500000000000001", "500000000000002", "500000000000003"]);
        assert!(state.toggle_row("500000000000002"));
    }

    #[test]
    fn test_commit_rebuilds_from_original() {
        let mut state = state();
        state.receive(FetchResult::Data(sample()));
        let before = state.display_tree().clone();

        state.dispatch(EditorAction::Enter);
        assert!(state.is_editing());
        state.dispatch(EditorAction::EditCell(ColumnId::new(2), ColumnEdit::label("Summary")));
        let warning = state.dispatch(EditorAction::Commit);

        assert!(warning.is_none());
        assert!(!state.is_editing());
        assert_eq!(state.columns()[1].label, "Summary");
        assert_eq!(state.display_tree(), &before);
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn test_cancel_leaves_state_untouched() {
        let mut state = state();
        state.receive(FetchResult::Data(sample()));
        let columns = state.columns().to_vec();

        state.dispatch(EditorAction::Enter);
        state.dispatch(EditorAction::Remove(ColumnId::new(1)));
        state.dispatch(EditorAction::Cancel);

        assert_eq!(state.columns(), columns.as_slice());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_commit_expansion_policies() {
        let mut state = state();
        state.receive(FetchResult::Data(sample()));
        state.toggle_row("500000000000002");

        state.dispatch_with_policy(EditorAction::Enter, ExpansionPolicy::Preserve);
        state.dispatch_with_policy(EditorAction::Commit, ExpansionPolicy::Preserve);
        assert!(!state.is_expanded("500000000000002"));
        assert!(state.is_expanded("500000000000001"));

        state.dispatch(EditorAction::Enter);
        state.dispatch(EditorAction::Commit);
        assert!(state.is_expanded("500000000000002"));
    }

    #[test]
    fn test_empty_commit_surfaces_warning() {
        let mut state = DisplayState::new(vec![]);
        state.receive(FetchResult::Data(sample()));

        state.dispatch(EditorAction::Enter);
        let warning = state.dispatch(EditorAction::Commit);

        assert_eq!(
            warning,
            Some(ConfigurationWarning::NoColumns { discarded: 0 })
        );
        assert!(state.columns().is_empty());
        assert_eq!(state.display_tree().node_count(), 4);
    }
}
