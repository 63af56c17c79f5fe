use std::collections::BTreeMap;

use casetree_types::{CellEdit, CellType, ColumnId, ColumnSpec, FieldChoice, renumber_columns};
use serde::Serialize;

use crate::catalog;
use crate::diagnostics::ConfigurationWarning;

/// Grid field that edits a draft's label.
pub const LABEL_CELL: &str = "label";

/// Grid field that edits a draft's bound field.
pub const FIELD_CELL: &str = "fieldName";

/// Editable column definition that only exists inside an edit session.
///
/// `field_name` is always the logical field: link-backed columns show the
/// human-readable field they were built from, not their link field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftColumnSpec {
    pub id: ColumnId,
    pub label: String,
    pub field_name: String,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    pub choices: Vec<FieldChoice>,
}

impl DraftColumnSpec {
    fn new(id: ColumnId, label: String, field_name: String) -> Self {
        let cell_type = catalog::resolve(&field_name)
            .map(|entry| entry.cell_type)
            .unwrap_or(CellType::Text);
        let choices = catalog::field_choices(&field_name);
        Self {
            id,
            label,
            field_name,
            cell_type,
            choices,
        }
    }

    pub fn selected_choice(&self) -> Option<&FieldChoice> {
        self.choices.iter().find(|choice| choice.is_selected)
    }
}

/// Buffered, not yet committed change to one draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl ColumnEdit {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            field_name: None,
        }
    }

    pub fn field(field_name: impl Into<String>) -> Self {
        Self {
            label: None,
            field_name: Some(field_name.into()),
        }
    }

    /// Field-wise merge: keys present in `other` overwrite, absent keys keep
    /// their current value.
    pub fn merge(&mut self, other: ColumnEdit) {
        if other.label.is_some() {
            self.label = other.label;
        }
        if other.field_name.is_some() {
            self.field_name = other.field_name;
        }
    }
}

/// Result of folding a session into a column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub columns: Vec<ColumnSpec>,
    /// Drafts dropped for a blank label or an unresolvable field.
    pub discarded: usize,
    pub warning: Option<ConfigurationWarning>,
}

/// Complete in-flight state of one column-configuration edit.
///
/// Draft ids always form the dense range `1..N`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditSession {
    drafts: Vec<DraftColumnSpec>,
    pending: BTreeMap<ColumnId, ColumnEdit>,
}

impl EditSession {
    /// Snapshot the active columns into drafts.
    pub fn from_columns(columns: &[ColumnSpec]) -> Self {
        let drafts = columns
            .iter()
            .enumerate()
            .map(|(position, column)| {
                DraftColumnSpec::new(
                    ColumnId::from_position(position),
                    column.label.clone(),
                    catalog::logical_field(&column.field_name).to_string(),
                )
            })
            .collect();

        Self {
            drafts,
            pending: BTreeMap::new(),
        }
    }

    pub fn drafts(&self) -> &[DraftColumnSpec] {
        &self.drafts
    }

    pub fn pending_edits(&self) -> &BTreeMap<ColumnId, ColumnEdit> {
        &self.pending
    }

    pub fn draft(&self, id: ColumnId) -> Option<&DraftColumnSpec> {
        self.drafts.iter().find(|draft| draft.id == id)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Drafts as the configuration grid shows them, pending edits applied.
    pub fn rows(&self) -> Vec<DraftColumnSpec> {
        self.drafts
            .iter()
            .map(|draft| {
                let (label, field_name) = self.effective(draft);
                DraftColumnSpec::new(draft.id, label, field_name)
            })
            .collect()
    }

    /// Append a draft bound to the first catalog field not already shown.
    pub fn add(&mut self) -> ColumnId {
        let in_use: Vec<String> = self
            .drafts
            .iter()
            .map(|draft| self.effective(draft).1)
            .collect();
        let entry = catalog::entries()
            .iter()
            .find(|entry| !in_use.iter().any(|field| field == entry.field_name));
        let (label, field_name) = match entry {
            Some(entry) => (entry.label, entry.field_name),
            None => (
                catalog::default_label(catalog::FALLBACK_FIELD).unwrap_or_default(),
                catalog::FALLBACK_FIELD,
            ),
        };

        let id = ColumnId::from_position(self.drafts.len());
        self.drafts.push(DraftColumnSpec::new(
            id,
            label.to_string(),
            field_name.to_string(),
        ));
        id
    }

    /// Delete a draft and its pending edit, then renumber the rest so ids
    /// stay contiguous. Pending edits follow their drafts to the new ids.
    pub fn remove(&mut self, id: ColumnId) -> bool {
        let before = self.drafts.len();
        self.drafts.retain(|draft| draft.id != id);
        if self.drafts.len() == before {
            return false;
        }
        self.pending.remove(&id);

        let mut pending = BTreeMap::new();
        for (position, draft) in self.drafts.iter_mut().enumerate() {
            let renumbered = ColumnId::from_position(position);
            if let Some(edit) = self.pending.remove(&draft.id) {
                pending.insert(renumbered, edit);
            }
            draft.id = renumbered;
        }
        self.pending = pending;
        true
    }

    /// Merge `edit` into the pending entry for `id`.
    ///
    /// A field change refreshes the draft's choice flags right away.
    /// Returns false when no draft has that id.
    pub fn edit_cell(&mut self, id: ColumnId, edit: ColumnEdit) -> bool {
        let Some(draft) = self.drafts.iter_mut().find(|draft| draft.id == id) else {
            return false;
        };

        if let Some(field_name) = &edit.field_name {
            draft.choices = catalog::field_choices(field_name);
        }
        self.pending.entry(id).or_default().merge(edit);
        true
    }

    /// Apply a generic `{rowId, fieldName, newValue}` grid event.
    pub fn apply_cell_edit(&mut self, event: &CellEdit) -> bool {
        let Ok(id) = event.row_id.parse::<ColumnId>() else {
            return false;
        };
        let edit = match event.field_name.as_str() {
            LABEL_CELL => ColumnEdit::label(event.value_text()),
            FIELD_CELL => ColumnEdit::field(event.value_text()),
            _ => return false,
        };
        self.edit_cell(id, edit)
    }

    /// Fold pending edits into the drafts and resolve the survivors into
    /// render-ready columns.
    pub fn commit(self) -> CommitOutcome {
        let mut columns = Vec::with_capacity(self.drafts.len());
        let mut discarded = 0;

        for draft in &self.drafts {
            let (label, field_name) = self.effective(draft);
            if label.trim().is_empty() || catalog::resolve(&field_name).is_none() {
                discarded += 1;
                continue;
            }
            columns.push(catalog::build_column(draft.id, &label, &field_name));
        }
        renumber_columns(&mut columns);

        let warning = columns
            .is_empty()
            .then_some(ConfigurationWarning::NoColumns { discarded });

        CommitOutcome {
            columns,
            discarded,
            warning,
        }
    }

    /// Columns of the configuration grid itself: an editable label and an
    /// enum-select field picker.
    pub fn grid_columns() -> Vec<ColumnSpec> {
        let mut label = catalog::build_column(ColumnId::new(1), "Label", LABEL_CELL);
        label.render.editable = true;

        let mut field = catalog::build_column(ColumnId::new(2), "Field", FIELD_CELL);
        field.cell_type = CellType::EnumSelect;
        field.render.editable = true;
        field.render.type_attributes.options = catalog::field_choices("");

        vec![label, field]
    }

    fn effective(&self, draft: &DraftColumnSpec) -> (String, String) {
        let edit = self.pending.get(&draft.id);
        let label = edit
            .and_then(|edit| edit.label.clone())
            .unwrap_or_else(|| draft.label.clone());
        let field_name = edit
            .and_then(|edit| edit.field_name.clone())
            .unwrap_or_else(|| draft.field_name.clone());
        (label, field_name)
    }
}
