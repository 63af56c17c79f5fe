// Diagnostics - non-fatal signals raised while shaping trees and columns
//
// Nothing here aborts processing. Normalization warnings are node-local and
// configuration warnings are session-local; callers decide how to surface them.

use serde::Serialize;
use std::fmt;

/// A node-local problem found during normalization.
///
/// The offending value was left untouched or replaced by its default, and
/// processing continued for the node and all of its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationWarning {
    /// Id of the node the problem was found on (empty when the id itself
    /// was unusable).
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    /// The node had no usable id.
    MissingId,
    /// A date-tagged field could not be parsed; the value was kept as-is.
    UnparsableDate { value: String },
    /// A field held a nested array or object where a scalar was expected.
    UnsupportedValue { found: String },
    /// The explicit descendant count was not a non-negative integer.
    InvalidCount { value: String },
    /// Entries of `children` that were not records were dropped.
    MalformedChildren { dropped: usize },
}

impl NormalizationWarning {
    pub fn new(node_id: impl Into<String>, field: Option<&str>, kind: WarningKind) -> Self {
        Self {
            node_id: node_id.into(),
            field: field.map(str::to_string),
            kind,
        }
    }
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = if self.node_id.is_empty() {
            "<no id>"
        } else {
            &self.node_id
        };
        let field = self.field.as_deref().unwrap_or("id");
        match &self.kind {
            WarningKind::MissingId => write!(f, "node {}: missing or non-scalar id", node),
            WarningKind::UnparsableDate { value } => {
                write!(f, "node {}: unparsable date in {}: {:?}", node, field, value)
            }
            WarningKind::UnsupportedValue { found } => {
                write!(f, "node {}: unsupported {} value in {}", node, found, field)
            }
            WarningKind::InvalidCount { value } => {
                write!(f, "node {}: invalid count in {}: {}", node, field, value)
            }
            WarningKind::MalformedChildren { dropped } => write!(
                f,
                "node {}: dropped {} malformed entry(ies) in {}",
                node, dropped, field
            ),
        }
    }
}

/// A session-local outcome of committing a column configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigurationWarning {
    /// No draft survived commit; the active column set is now empty.
    NoColumns { discarded: usize },
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationWarning::NoColumns { discarded } => write!(
                f,
                "no columns left after saving ({} draft column(s) discarded)",
                discarded
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = NormalizationWarning::new(
            "500000000000001",
            Some("createdDate"),
            WarningKind::UnparsableDate {
                value: "yesterday".to_string(),
            },
        );
        assert_eq!(
            warning.to_string(),
            "node 500000000000001: unparsable date in createdDate: \"yesterday\""
        );

        let missing = NormalizationWarning::new("", None, WarningKind::MissingId);
        assert_eq!(missing.to_string(), "node <no id>: missing or non-scalar id");

        let children = NormalizationWarning::new(
            "500000000000001",
            Some("children"),
            WarningKind::MalformedChildren { dropped: 2 },
        );
        assert_eq!(
            children.to_string(),
            "node 500000000000001: dropped 2 malformed entry(ies) in children"
        );
    }

    #[test]
    fn test_configuration_warning_display() {
        let warning = ConfigurationWarning::NoColumns { discarded: 2 };
        assert_eq!(
            warning.to_string(),
            "no columns left after saving (2 draft column(s) discarded)"
        );
    }

    #[test]
    fn test_warning_json_shape() {
        let warning = NormalizationWarning::new(
            "500000000000001",
            Some("subject"),
            WarningKind::UnsupportedValue {
                found: "object".to_string(),
            },
        );

        insta::assert_json_snapshot!(warning, @r###"
        {
          "node_id": "500000000000001",
          "field": "subject",
          "kind": {
            "type": "unsupported_value",
            "found": "object"
          }
        }
        "###);
    }
}
