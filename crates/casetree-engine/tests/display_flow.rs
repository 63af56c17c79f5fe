//! End-to-end display state flow: fetch, normalize, expand, reconfigure.

use casetree_engine::{
    ColumnEdit, ConfigurationWarning, DisplayState, EditorAction, ExpansionPolicy,
    ExplorerConfig, LoadStatus, WarningKind,
};
use casetree_testing::fixtures::{self, CHILD_CASE_ID, GRANDCHILD_CASE_ID, ROOT_CASE_ID};
use casetree_types::{CellEdit, ColumnId, FetchResult};
use serde_json::json;

fn loaded() -> DisplayState {
    let mut state = DisplayState::from_config(&ExplorerConfig::default());
    state.receive(FetchResult::Data(fixtures::sample_hierarchy()));
    state
}

#[test]
fn test_payload_to_expanded_tree() -> anyhow::Result<()> {
    let result = FetchResult::from_json_str(&fixtures::enveloped_payload())?;
    let mut state = DisplayState::from_config(&ExplorerConfig::default());
    assert!(state.is_loading());

    state.receive(result);

    assert_eq!(state.status(), &LoadStatus::Ready);
    assert_eq!(state.display_tree().node_count(), 5);
    assert_eq!(state.expanded_rows().len(), 5);
    assert!(state.warnings().is_empty());

    let root = &state.display_tree().records()[0];
    assert_eq!(root.fields["caseNumber"], json!("Account ACME"));
    assert_eq!(root.record_url, "");
    assert_eq!(root.descendant_count, 2);

    let case = &root.children[0];
    assert_eq!(case.record_url, format!("/{}", ROOT_CASE_ID));
    assert_eq!(case.related_urls["aeAmUrl"], "/005000000000001");
    assert_eq!(case.fields["createdDate"], json!("2024-01-05T10:00:00.000Z"));
    assert_eq!(case.fields["ownerName"], json!("—"));

    let grandchild = &case.children[0].children[0];
    assert_eq!(grandchild.id, GRANDCHILD_CASE_ID);
    assert_eq!(grandchild.fields["closedDate"], json!("2024-02-01T00:00:00.000Z"));
    assert!(grandchild.children.is_empty());

    Ok(())
}

#[test]
fn test_no_data_payload() -> anyhow::Result<()> {
    let mut state = DisplayState::from_config(&ExplorerConfig::default());
    state.receive(FetchResult::from_json_str(&fixtures::no_data_payload())?);

    assert_eq!(state.status(), &LoadStatus::NoData);
    assert!(state.display_tree().is_no_data());
    assert!(state.visible_rows().is_empty());
    Ok(())
}

#[test]
fn test_error_payload_keeps_previous_tree() -> anyhow::Result<()> {
    let mut state = loaded();
    state.receive(FetchResult::from_json_str(&fixtures::error_payload(
        "Insufficient access",
    ))?);

    assert!(state.has_error());
    assert_eq!(
        state.error().map(|e| e.display_message()),
        Some("Insufficient access")
    );
    assert_eq!(state.display_tree().node_count(), 5);
    Ok(())
}

#[test]
fn test_malformed_node_degrades() -> anyhow::Result<()> {
    let mut state = DisplayState::from_config(&ExplorerConfig::default());
    state.receive(FetchResult::from_value(fixtures::malformed_node())?);

    let root = &state.display_tree().records()[0];
    assert_eq!(root.id, "42");
    assert_eq!(root.fields["subject"], json!("—"));
    assert_eq!(root.fields["createdDate"], json!("yesterday-ish"));
    assert_eq!(root.descendant_count, 1);
    assert_eq!(root.children[0].id, "");

    let kinds: Vec<&WarningKind> = state.warnings().iter().map(|w| &w.kind).collect();
    assert_eq!(kinds.len(), 4);
    assert!(kinds.contains(&&WarningKind::MissingId));
    Ok(())
}

#[test]
fn test_reconfigure_rebuilds_from_original() {
    let mut state = loaded();
    let before = state.display_tree().clone();

    state.dispatch(EditorAction::Enter);
    state.dispatch(EditorAction::Add);
    state.dispatch(EditorAction::CellEdited(CellEdit::new("1", "label", "Number")));
    state.dispatch(EditorAction::EditCell(
        ColumnId::new(9),
        ColumnEdit::field("ownerName"),
    ));
    state.dispatch(EditorAction::CellEdited(CellEdit::new("9", "label", "Owner")));
    let warning = state.dispatch(EditorAction::Commit);

    assert!(warning.is_none());
    let labels: Vec<&str> = state.columns().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Number",
            "Subject",
            "Status",
            "Priority",
            "Type",
            "Child Count",
            "AE/AM",
            "Work Group",
            "Owner"
        ]
    );
    assert_eq!(state.columns()[0].field_name, "caseUrl");
    assert_eq!(state.columns()[8].field_name, "ownerName");
    assert_eq!(state.display_tree(), &before);
}

#[test]
fn test_preserve_policy_keeps_collapsed_rows() {
    let mut state = loaded();
    state.set_expansion_on_commit(ExpansionPolicy::Preserve);
    state.toggle_row(CHILD_CASE_ID);

    state.dispatch(EditorAction::Enter);
    state.dispatch(EditorAction::Commit);

    assert!(!state.is_expanded(CHILD_CASE_ID));
    assert_eq!(state.visible_rows().len(), 4);
}

#[test]
fn test_remove_everything_warns() {
    let mut state = loaded();
    state.dispatch(EditorAction::Enter);
    let count = state.columns().len();
    for _ in 0..count {
        state.dispatch(EditorAction::Remove(ColumnId::new(1)));
    }
    let warning = state.dispatch(EditorAction::Commit);

    assert_eq!(warning, Some(ConfigurationWarning::NoColumns { discarded: 0 }));
    assert!(state.columns().is_empty());
    assert_eq!(state.display_tree().node_count(), 5);
}

#[test]
fn test_deep_chain_round_trip() {
    let mut state = DisplayState::from_config(&ExplorerConfig::default());
    state.receive(FetchResult::Data(fixtures::deep_chain(20_000)));

    assert_eq!(state.display_tree().node_count(), 20_000);
    assert_eq!(state.visible_rows().len(), 20_000);
    assert_eq!(state.visible_rows().last().map(|row| row.depth), Some(19_999));
}
