use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::RawRecordNode;

const GENERIC_FETCH_ERROR: &str = "An error occurred while loading the case hierarchy.";

/// Error reported by the fetch collaborator. Surfaced verbatim, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchError {
    #[serde(default)]
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message to show, falling back to a generic one when the backend
    /// sent none.
    pub fn display_message(&self) -> &str {
        if self.message.trim().is_empty() {
            GENERIC_FETCH_ERROR
        } else {
            &self.message
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_message())
    }
}

/// Single result delivered by the fetch boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// Neither data nor error yet: the fetch is in flight.
    Pending,
    Data(RawRecordNode),
    Error(FetchError),
}

#[derive(Deserialize)]
struct FetchEnvelope {
    #[serde(default)]
    data: Option<RawRecordNode>,
    #[serde(default)]
    error: Option<FetchError>,
}

impl FetchResult {
    /// Combine the two halves of a `{data, error}` envelope. The boundary
    /// never sends both; if it does, the error wins.
    pub fn from_parts(data: Option<RawRecordNode>, error: Option<FetchError>) -> Self {
        match (data, error) {
            (_, Some(error)) => FetchResult::Error(error),
            (Some(data), None) => FetchResult::Data(data),
            (None, None) => FetchResult::Pending,
        }
    }

    /// Decode a fetch payload.
    ///
    /// Accepts a `{data}` / `{error}` envelope or a bare root record. Input
    /// that is not a JSON object is rejected, as is a `data` or `error`
    /// value of the wrong shape. Malformed `children` never fail the decode;
    /// see [`RawRecordNode::from_object`].
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = &value else {
            return Err(Error::InvalidPayload(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        };

        if map.contains_key("data") || map.contains_key("error") {
            let envelope: FetchEnvelope = serde_json::from_value(value)?;
            Ok(Self::from_parts(envelope.data, envelope.error))
        } else {
            let root: RawRecordNode = serde_json::from_value(value)?;
            Ok(FetchResult::Data(root))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_data() {
        let result = FetchResult::from_json_str(r#"{"data": {"id": "no-cases"}}"#).unwrap();
        match result {
            FetchResult::Data(root) => assert_eq!(root.id_text().as_deref(), Some("no-cases")),
            other => panic!("Expected Data, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_with_error() {
        let result =
            FetchResult::from_json_str(r#"{"error": {"message": "Insufficient access"}}"#)
                .unwrap();
        assert_eq!(
            result,
            FetchResult::Error(FetchError::new("Insufficient access"))
        );
    }

    #[test]
    fn test_empty_envelope_is_pending() {
        let result = FetchResult::from_json_str(r#"{"data": null, "error": null}"#).unwrap();
        assert_eq!(result, FetchResult::Pending);
    }

    #[test]
    fn test_error_wins_over_data() {
        let result = FetchResult::from_parts(
            Some(RawRecordNode::new("500000000000001")),
            Some(FetchError::new("boom")),
        );
        assert!(matches!(result, FetchResult::Error(_)));
    }

    #[test]
    fn test_bare_root_is_data() {
        let result = FetchResult::from_json_str(r#"{"id": "500000000000001"}"#).unwrap();
        assert!(matches!(result, FetchResult::Data(_)));
    }

    #[test]
    fn test_malformed_children_still_decode() {
        let result =
            FetchResult::from_json_str(r#"{"id": "500000000000001", "children": "oops"}"#)
                .unwrap();
        match result {
            FetchResult::Data(root) => {
                assert!(root.children.is_none());
                assert_eq!(root.malformed_children, 1);
            }
            other => panic!("Expected Data, got {:?}", other),
        }

        let result = FetchResult::from_json_str(
            r#"{"data": {"id": "500000000000001", "children": [null, {"id": "500000000000002"}]}}"#,
        )
        .unwrap();
        match result {
            FetchResult::Data(root) => {
                assert_eq!(root.children.as_ref().map(Vec::len), Some(1));
                assert_eq!(root.malformed_children, 1);
            }
            other => panic!("Expected Data, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = FetchResult::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(FetchResult::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_blank_message_falls_back() {
        assert_eq!(
            FetchError::default().display_message(),
            "An error occurred while loading the case hierarchy."
        );
    }
}
