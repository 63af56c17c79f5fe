// Column configuration editor - explicit VIEW/EDITING state machine
//
// All changes go through `reduce`, which consumes the current state and
// returns the next one. A commit hands back the complete new column set in
// one value, so callers can only ever swap it in whole.

mod session;

pub use session::{
    ColumnEdit, CommitOutcome, DraftColumnSpec, EditSession, FIELD_CELL, LABEL_CELL,
};

use casetree_types::{CellEdit, ColumnId, ColumnSpec};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Viewing,
    Editing(EditSession),
}

impl EditorState {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditorState::Editing(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditorState::Viewing => None,
            EditorState::Editing(session) => Some(session),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Open configuration: snapshot the active columns into a session.
    Enter,
    Add,
    Remove(ColumnId),
    EditCell(ColumnId, ColumnEdit),
    /// Generic grid cell event from the configuration grid.
    CellEdited(CellEdit),
    Commit,
    Cancel,
}

impl EditorAction {
    fn name(&self) -> &'static str {
        match self {
            EditorAction::Enter => "enter",
            EditorAction::Add => "add",
            EditorAction::Remove(_) => "remove",
            EditorAction::EditCell(..) => "edit_cell",
            EditorAction::CellEdited(_) => "cell_edited",
            EditorAction::Commit => "commit",
            EditorAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: EditorState,
    /// Present only when the action committed the session.
    pub committed: Option<CommitOutcome>,
}

impl Transition {
    fn to(state: EditorState) -> Self {
        Self {
            state,
            committed: None,
        }
    }
}

/// Advance the editor by one action.
///
/// `active` is the current committed column set; it is read on `Enter` and
/// never modified here. Actions that make no sense in the current state
/// leave it unchanged.
pub fn reduce(state: EditorState, action: EditorAction, active: &[ColumnSpec]) -> Transition {
    let mut session = match (state, &action) {
        (EditorState::Viewing, EditorAction::Enter) => {
            tracing::debug!(columns = active.len(), "opening column configuration");
            return Transition::to(EditorState::Editing(EditSession::from_columns(active)));
        }
        (EditorState::Viewing, _) => {
            tracing::debug!(action = action.name(), "ignored outside edit mode");
            return Transition::to(EditorState::Viewing);
        }
        (EditorState::Editing(session), _) => session,
    };

    match action {
        EditorAction::Enter => {
            tracing::debug!("column configuration already open");
        }
        EditorAction::Add => {
            session.add();
        }
        EditorAction::Remove(id) => {
            if !session.remove(id) {
                tracing::debug!(%id, "remove: no such draft column");
            }
        }
        EditorAction::EditCell(id, edit) => {
            if !session.edit_cell(id, edit) {
                tracing::debug!(%id, "edit: no such draft column");
            }
        }
        EditorAction::CellEdited(event) => {
            if !session.apply_cell_edit(&event) {
                tracing::debug!(row = %event.row_id, field = %event.field_name, "cell edit ignored");
            }
        }
        EditorAction::Commit => {
            let outcome = session.commit();
            tracing::info!(
                columns = outcome.columns.len(),
                discarded = outcome.discarded,
                "column configuration committed"
            );
            if let Some(warning) = &outcome.warning {
                tracing::warn!("{}", warning);
            }
            return Transition {
                state: EditorState::Viewing,
                committed: Some(outcome),
            };
        }
        EditorAction::Cancel => {
            tracing::debug!("column configuration cancelled");
            return Transition::to(EditorState::Viewing);
        }
    }

    Transition::to(EditorState::Editing(session))
}
