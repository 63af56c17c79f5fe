//! Sample case hierarchies and the fetch payloads that carry them.

use casetree_types::RawRecordNode;
use serde_json::{Value, json};

pub const ROOT_CASE_ID: &str = "500000000000001";
pub const CHILD_CASE_ID: &str = "500000000000002";
pub const GRANDCHILD_CASE_ID: &str = "500000000000003";
pub const SIBLING_CASE_ID: &str = "500000000000004";
pub const OWNER_ID: &str = "005000000000001";

/// Account-level grouping node with two case subtrees:
///
/// ```text
/// root (Account ACME)
/// ├── 500000000000001
/// │   └── 500000000000002
/// │       └── 500000000000003
/// └── 500000000000004
/// ```
pub fn sample_hierarchy() -> RawRecordNode {
    RawRecordNode::new("root")
        .with_field("label", "Account ACME")
        .with_children(vec![
            RawRecordNode::new(ROOT_CASE_ID)
                .with_field("caseNumber", "00001001")
                .with_field("subject", "Printer on fire")
                .with_field("status", "Escalated")
                .with_field("priority", "High")
                .with_field("aeAmId", OWNER_ID)
                .with_field("aeAm", "Dana Reyes")
                .with_field("createdDate", "2024-01-05T10:00:00.000+0000")
                .with_children(vec![
                    RawRecordNode::new(CHILD_CASE_ID)
                        .with_field("caseNumber", "00001002")
                        .with_field("subject", "Replacement toner")
                        .with_field("status", "New")
                        .with_children(vec![
                            RawRecordNode::new(GRANDCHILD_CASE_ID)
                                .with_field("caseNumber", "00001003")
                                .with_field("closedDate", "2024-02-01"),
                        ]),
                ]),
            RawRecordNode::new(SIBLING_CASE_ID)
                .with_field("caseNumber", "00001004")
                .with_field("status", "Closed")
                .with_field("isClosed", true),
        ])
}

/// Hierarchy as the bare node JSON a backend returns.
pub fn sample_payload() -> String {
    serde_json::to_string_pretty(&sample_hierarchy()).unwrap_or_default()
}

/// Hierarchy wrapped in a `{data: ...}` envelope.
pub fn enveloped_payload() -> String {
    json!({ "data": sample_hierarchy() }).to_string()
}

/// The backend's "no cases" answer.
pub fn no_data_payload() -> String {
    json!({ "id": "no-cases" }).to_string()
}

pub fn error_payload(message: &str) -> String {
    json!({ "error": { "message": message } }).to_string()
}

/// Linear chain `depth` levels deep, ids `n0..n{depth-1}` from the root down.
pub fn deep_chain(depth: usize) -> RawRecordNode {
    let mut node = RawRecordNode::new(format!("n{}", depth.saturating_sub(1)));
    for level in (0..depth.saturating_sub(1)).rev() {
        node = RawRecordNode::new(format!("n{}", level)).with_children(vec![node]);
    }
    node
}

/// Raw node with assorted malformed fields for degradation tests.
pub fn malformed_node() -> Value {
    json!({
        "id": 42,
        "subject": { "nested": true },
        "createdDate": "yesterday-ish",
        "childCount": "lots",
        "children": [ { "status": "New" } ]
    })
}
