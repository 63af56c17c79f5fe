use crate::args::FieldAssignment;
use crate::presentation::{ConsoleRenderer, TreeView};
use anyhow::Result;
use casetree_engine::catalog;
use casetree_engine::editor::{FIELD_CELL, LABEL_CELL};
use casetree_engine::{ColumnEdit, DisplayState, EditorAction, ExpansionPolicy};
use casetree_types::{CellEdit, ColumnId};

/// Column edits collected from the command line.
#[derive(Debug, Default)]
pub struct ConfigureRequest {
    pub add: Vec<String>,
    pub remove: Vec<u32>,
    pub rename: Vec<FieldAssignment>,
    pub set_field: Vec<FieldAssignment>,
    pub preserve_expansion: bool,
}

impl ConfigureRequest {
    /// Editor actions in application order: adds, removes, renames, field
    /// changes, commit. Ids in later actions refer to the draft set as it
    /// stands after the earlier ones.
    pub fn actions(&self, existing: usize) -> Vec<EditorAction> {
        let mut actions = vec![EditorAction::Enter];

        for (offset, spec) in self.add.iter().enumerate() {
            let id = ColumnId::from_position(existing + offset);
            let (field, label) = match spec.split_once('=') {
                Some((field, label)) => (field.trim(), label.to_string()),
                None => (
                    spec.trim(),
                    catalog::default_label(spec)
                        .map(str::to_string)
                        .unwrap_or_else(|| spec.trim().to_string()),
                ),
            };
            actions.push(EditorAction::Add);
            actions.push(EditorAction::EditCell(
                id,
                ColumnEdit {
                    label: Some(label),
                    field_name: Some(field.to_string()),
                },
            ));
        }

        actions.extend(
            self.remove
                .iter()
                .map(|id| EditorAction::Remove(ColumnId::new(*id))),
        );
        actions.extend(self.rename.iter().map(|a| cell_edit(a, LABEL_CELL)));
        actions.extend(self.set_field.iter().map(|a| cell_edit(a, FIELD_CELL)));
        actions.push(EditorAction::Commit);
        actions
    }

    fn policy(&self) -> ExpansionPolicy {
        if self.preserve_expansion {
            ExpansionPolicy::Preserve
        } else {
            ExpansionPolicy::Reset
        }
    }
}

fn cell_edit(assignment: &FieldAssignment, cell: &str) -> EditorAction {
    EditorAction::CellEdited(CellEdit::new(
        assignment.id.to_string(),
        cell,
        assignment.value.as_str(),
    ))
}

pub fn handle(
    mut state: DisplayState,
    request: ConfigureRequest,
    renderer: &ConsoleRenderer,
) -> Result<()> {
    let policy = request.policy();
    let mut warning = None;
    for action in request.actions(state.columns().len()) {
        if let Some(raised) = state.dispatch_with_policy(action, policy) {
            warning = Some(raised);
        }
    }

    if let Some(warning) = &warning {
        renderer.warn(&warning.to_string());
    }

    renderer.render(&TreeView::new(&state).with_configuration_warning(warning.as_ref()))
}
