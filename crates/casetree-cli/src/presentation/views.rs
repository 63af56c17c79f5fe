use super::{Palette, PlainView, Table};
use casetree_engine::catalog::{self, CatalogEntry};
use casetree_engine::{
    ConfigurationWarning, DisplayState, LoadStatus, NormalizationWarning, VisibleRow,
};
use casetree_types::{CellType, ColumnSpec, DisplayTree};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// The case tree as a renderer sees it: active columns, display tree and
/// which rows are expanded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView<'a> {
    #[serde(flatten)]
    pub status: &'a LoadStatus,
    pub revision: u64,
    pub columns: &'a [ColumnSpec],
    pub tree: &'a DisplayTree,
    pub expanded_rows: &'a BTreeSet<String>,
    pub warnings: &'a [NormalizationWarning],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_warning: Option<&'a ConfigurationWarning>,
    #[serde(skip)]
    rows: Vec<VisibleRow<'a>>,
}

impl<'a> TreeView<'a> {
    pub fn new(state: &'a DisplayState) -> Self {
        Self {
            status: state.status(),
            revision: state.revision(),
            columns: state.columns(),
            tree: state.display_tree(),
            expanded_rows: state.expanded_rows(),
            warnings: state.warnings(),
            configuration_warning: None,
            rows: state.visible_rows(),
        }
    }

    pub fn with_configuration_warning(mut self, warning: Option<&'a ConfigurationWarning>) -> Self {
        self.configuration_warning = warning;
        self
    }
}

impl PlainView for TreeView<'_> {
    fn plain(&self, palette: Palette) -> String {
        if self.tree.is_no_data() {
            return "No cases found.\n".to_string();
        }
        if self.rows.is_empty() {
            return "No records.\n".to_string();
        }
        if self.columns.is_empty() {
            return format!(
                "No columns configured ({} rows hidden).\n",
                self.tree.node_count()
            );
        }

        let mut table = Table::new(self.columns.iter().map(|c| c.label.clone()).collect());
        for row in &self.rows {
            let cells = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let text = cell_text(row.node.cell(column.text_field()));
                    if i == 0 { tree_prefix(row) + &text } else { text }
                })
                .collect();
            table.push(cells);
        }

        let mut out = table.render(palette);
        let footer = format!(
            "{} of {} rows shown",
            self.rows.len(),
            self.tree.node_count()
        );
        out.push_str(&palette.dim(&footer));
        out.push('\n');
        out
    }
}

fn tree_prefix(row: &VisibleRow<'_>) -> String {
    let marker = match (row.node.children.is_empty(), row.expanded) {
        (true, _) => "  ",
        (false, true) => "▾ ",
        (false, false) => "▸ ",
    };
    format!("{}{}", "  ".repeat(row.depth), marker)
}

fn cell_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    pub field_name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_field: Option<&'static str>,
    pub default: bool,
}

impl From<&'static CatalogEntry> for CatalogRow {
    fn from(entry: &'static CatalogEntry) -> Self {
        Self {
            field_name: entry.field_name,
            label: entry.label,
            cell_type: entry.cell_type,
            link_field: entry.link_field,
            default: catalog::DEFAULT_FIELDS.contains(&entry.field_name),
        }
    }
}

/// Every field a column can be bound to.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub fields: Vec<CatalogRow>,
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            fields: catalog::entries().iter().map(CatalogRow::from).collect(),
        }
    }
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainView for CatalogView {
    fn plain(&self, palette: Palette) -> String {
        let mut table = Table::new(
            ["Field", "Label", "Type", "Link", "Default"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for row in &self.fields {
            table.push(vec![
                row.field_name.to_string(),
                row.label.to_string(),
                row.cell_type.to_string(),
                row.link_field.map(|l| palette.link(l)).unwrap_or_default(),
                if row.default { "*".to_string() } else { String::new() },
            ]);
        }
        table.render(palette)
    }
}
