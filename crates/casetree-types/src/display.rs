use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::record::{RAW_CHILDREN_KEY, RawRecordNode};
use crate::tree::assemble_preorder;

/// Field carrying the primary navigation link of a record.
pub const RECORD_URL_FIELD: &str = "caseUrl";

/// Field carrying the descendant count of a record.
pub const CHILD_COUNT_FIELD: &str = "childCount";

/// Key under which the renderer expects child rows.
pub const RENDER_CHILDREN_KEY: &str = "_children";

/// Normalized, render-ready record.
///
/// Serializes to the flat row shape a tree-grid consumes: `id`, the link
/// fields, every display field, `childCount` and the `_children` rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplayNode {
    pub id: String,

    /// `"/" + id` for valid ids, empty otherwise.
    #[serde(rename = "caseUrl")]
    pub record_url: String,

    /// Related-entity links keyed by their link field (e.g. `aeAmUrl`).
    #[serde(flatten)]
    pub related_urls: BTreeMap<String, String>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,

    #[serde(rename = "childCount")]
    pub descendant_count: u64,

    #[serde(rename = "_children")]
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    /// Resolve the value a column bound to `field_name` shows for this row.
    pub fn cell(&self, field_name: &str) -> Option<Value> {
        match field_name {
            "id" => Some(Value::String(self.id.clone())),
            RECORD_URL_FIELD => Some(Value::String(self.record_url.clone())),
            CHILD_COUNT_FIELD => Some(Value::from(self.descendant_count)),
            _ => self
                .related_urls
                .get(field_name)
                .map(|url| Value::String(url.clone()))
                .or_else(|| self.fields.get(field_name).cloned()),
        }
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Convert back into the raw shape so the tree can be fed through
    /// normalization again. Links and counts become ordinary fields.
    pub fn to_raw(&self) -> RawRecordNode {
        let items: Vec<(Option<usize>, RawRecordNode)> = preorder_with_parents(self)
            .into_iter()
            .map(|(parent, node)| (parent, flat_raw(node)))
            .collect();

        assemble_preorder(items, |raw, children| raw.children = Some(children))
            .pop()
            .unwrap_or_default()
    }
}

impl Drop for DisplayNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a DisplayNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DisplayNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn preorder_with_parents(root: &DisplayNode) -> Vec<(Option<usize>, &DisplayNode)> {
    let mut out = Vec::new();
    let mut stack = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        let index = out.len();
        out.push((parent, node));
        stack.extend(node.children.iter().rev().map(|child| (child, Some(index))));
    }
    out
}

fn flat_raw(node: &DisplayNode) -> RawRecordNode {
    let mut fields: Map<String, Value> = node
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    fields.insert(
        RECORD_URL_FIELD.to_string(),
        Value::String(node.record_url.clone()),
    );
    for (name, url) in &node.related_urls {
        fields.insert(name.clone(), Value::String(url.clone()));
    }
    fields.insert(
        CHILD_COUNT_FIELD.to_string(),
        Value::from(node.descendant_count),
    );
    fields.remove(RAW_CHILDREN_KEY);

    RawRecordNode {
        id: Value::String(node.id.clone()),
        children: None,
        fields,
        malformed_children: 0,
    }
}

/// Outcome of normalizing a fetched tree.
///
/// `NoData` is the explicit empty-result state signalled by the reserved
/// root id; it is distinct from `Records` holding a childless root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum DisplayTree {
    NoData,
    Records(Vec<DisplayNode>),
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

impl DisplayTree {
    pub fn records(&self) -> &[DisplayNode] {
        match self {
            DisplayTree::NoData => &[],
            DisplayTree::Records(nodes) => nodes,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, DisplayTree::NoData)
    }

    /// Ids of every node in pre-order.
    pub fn node_ids(&self) -> Vec<String> {
        self.records()
            .iter()
            .flat_map(DisplayNode::walk)
            .map(|node| node.id.clone())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.records().iter().map(|root| root.walk().count()).sum()
    }
}
