use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic cell-edit event emitted by an editable grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEdit {
    pub row_id: String,
    pub field_name: String,
    pub new_value: Value,
}

impl CellEdit {
    pub fn new(
        row_id: impl Into<String>,
        field_name: impl Into<String>,
        new_value: impl Into<Value>,
    ) -> Self {
        Self {
            row_id: row_id.into(),
            field_name: field_name.into(),
            new_value: new_value.into(),
        }
    }

    /// The new value as text; non-string scalars are stringified and
    /// null becomes empty.
    pub fn value_text(&self) -> String {
        match &self.new_value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
