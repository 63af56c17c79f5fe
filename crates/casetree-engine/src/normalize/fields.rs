use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Shown in text cells whose source value is missing or null.
pub const PLACEHOLDER: &str = "—";

/// Text fields that fall back to [`PLACEHOLDER`].
pub const TEXT_DEFAULT_FIELDS: &[&str] = &[
    "caseNumber",
    "subject",
    "status",
    "priority",
    "caseType",
    "ownerName",
    "origin",
    "aeAm",
    "workGroup",
];

/// Fields reserialized to ISO-8601.
pub const DATE_FIELDS: &[&str] = &["createdDate", "lastModifiedDate", "closedDate"];

/// Related-entity links: (link field, source id field).
pub const RELATED_LINKS: &[(&str, &str)] =
    &[("aeAmUrl", "aeAmId"), ("workGroupUrl", "workGroupId")];

/// Source of the human-readable identifier.
pub const CASE_NUMBER_FIELD: &str = "caseNumber";

/// Caption carried by synthetic grouping rows.
pub const SYNTHETIC_LABEL_FIELD: &str = "label";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// Falsy input, left alone without complaint.
    Skipped,
    Reformatted(String),
    Unparsable,
}

/// Parse a date-tagged value and reserialize it as
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Reformatting an already reformatted value yields the same string.
pub fn reformat_date(value: &Value) -> DateOutcome {
    if is_falsy(value) {
        return DateOutcome::Skipped;
    }

    let parsed = match value {
        Value::String(text) => parse_date_text(text),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };

    match parsed {
        Some(dt) => DateOutcome::Reformatted(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => DateOutcome::Unparsable,
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Platform wire format: 2024-01-05T10:00:00.000+0000
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Absent or null.
pub fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
