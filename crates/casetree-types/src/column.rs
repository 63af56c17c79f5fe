use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a column within one column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(u32);

impl ColumnId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Id for the 0-based `position` in a dense `1..N` column set.
    pub fn from_position(position: usize) -> Self {
        Self(position as u32 + 1)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ColumnId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ColumnId)
    }
}

/// Cell rendering type understood by the tree-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellType {
    Text,
    Number,
    Date,
    Boolean,
    Url,
    EnumSelect,
}

impl CellType {
    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Text => "text",
            CellType::Number => "number",
            CellType::Date => "date",
            CellType::Boolean => "boolean",
            CellType::Url => "url",
            CellType::EnumSelect => "enum-select",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of an enum-select cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChoice {
    pub label: String,
    pub value: String,
    pub is_selected: bool,
}

/// `{ "fieldName": ... }` indirection used for url labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    pub field_name: String,
}

/// Per-type attributes of a column.
///
/// url: `label` + `target`; date: `year`/`month`/`day`; number:
/// `maximum_fraction_digits`; boolean: none; enum-select: `options`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<FieldBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldChoice>,
}

impl TypeAttributes {
    pub fn is_empty(&self) -> bool {
        *self == TypeAttributes::default()
    }
}

/// Layout and type attributes for rendering one column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default, skip_serializing_if = "TypeAttributes::is_empty")]
    pub type_attributes: TypeAttributes,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrap_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_width: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub editable: bool,
}

/// Committed, render-ready column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub label: String,
    pub field_name: String,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    #[serde(flatten)]
    pub render: RenderOptions,
}

impl ColumnSpec {
    /// Field whose value is shown as the cell text. For url columns this is
    /// the human-readable label field rather than the link itself.
    pub fn text_field(&self) -> &str {
        self.render
            .type_attributes
            .label
            .as_ref()
            .map(|binding| binding.field_name.as_str())
            .unwrap_or(&self.field_name)
    }
}

/// Renumber a column set so ids form the dense range `1..N`.
pub fn renumber_columns(columns: &mut [ColumnSpec]) {
    for (position, column) in columns.iter_mut().enumerate() {
        column.id = ColumnId::from_position(position);
    }
}
