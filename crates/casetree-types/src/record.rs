use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::tree::assemble_preorder;

/// Key under which the backend nests child records.
pub const RAW_CHILDREN_KEY: &str = "children";

/// Hierarchical record as received from the fetch boundary.
///
/// The backend payload is free-form: `id` may be missing or not a string,
/// any field may be null, and `children` may be absent entirely. Every
/// key other than `id` and `children` lands in `fields`.
///
/// Decoding is lenient about `children`: object elements become child
/// records, anything else is dropped and counted in `malformed_children`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawRecordNode {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawRecordNode>>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Entries of `children` that were not records, plus one for a
    /// `children` value that was not an array.
    #[serde(skip)]
    pub malformed_children: usize,
}

impl RawRecordNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Value::String(id.into()),
            children: None,
            fields: Map::new(),
            malformed_children: 0,
        }
    }

    /// Build a record tree from a decoded JSON object using an explicit
    /// work-list, so nesting depth is bounded only by memory.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let mut items: Vec<(Option<usize>, RawRecordNode)> = Vec::new();
        let mut stack = vec![(object, None)];

        while let Some((mut object, parent)) = stack.pop() {
            let index = items.len();
            let mut node = RawRecordNode {
                id: object.remove("id").unwrap_or(Value::Null),
                children: None,
                fields: Map::new(),
                malformed_children: 0,
            };

            match object.remove(RAW_CHILDREN_KEY) {
                None | Some(Value::Null) => {}
                Some(Value::Array(elements)) => {
                    let mut kept = Vec::with_capacity(elements.len());
                    for element in elements {
                        match element {
                            Value::Object(child) => kept.push(child),
                            _ => node.malformed_children += 1,
                        }
                    }
                    node.children = Some(Vec::new());
                    stack.extend(kept.into_iter().rev().map(|child| (child, Some(index))));
                }
                Some(_) => node.malformed_children += 1,
            }

            node.fields = object;
            items.push((parent, node));
        }

        assemble_preorder(items, |node, children| {
            if let Some(slot) = &mut node.children {
                *slot = children;
            }
        })
        .into_iter()
        .next()
        .unwrap_or_default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RawRecordNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// String form of the id: strings as-is, numbers and booleans
    /// stringified, anything else `None`.
    pub fn id_text(&self) -> Option<String> {
        id_text(&self.id)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl<'de> Deserialize<'de> for RawRecordNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_object(object))
    }
}

impl Drop for RawRecordNode {
    // Flatten the subtree before dropping so arbitrarily deep chains do not
    // exhaust the stack.
    fn drop(&mut self) {
        let mut stack = self.children.take().unwrap_or_default();
        while let Some(mut node) = stack.pop() {
            if let Some(children) = node.children.take() {
                stack.extend(children);
            }
        }
    }
}

/// String form of a scalar id value: strings as-is, numbers and booleans
/// stringified, anything else `None`.
pub fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Position of a node inside a [`RecordArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// One raw record with its tree links expressed as arena indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaNode {
    pub id: Value,
    pub fields: Map<String, Value>,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    /// Non-record entries dropped from the source `children` value.
    pub malformed_children: usize,
}

impl ArenaNode {
    pub fn id_text(&self) -> Option<String> {
        id_text(&self.id)
    }
}

/// Indexed ownership of a raw record tree.
///
/// Nodes are stored in pre-order, so a parent always has a smaller index
/// than any of its descendants. The arena is built once per fetch and is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordArena {
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeIndex>,
}

impl RecordArena {
    pub fn from_root(root: &RawRecordNode) -> Self {
        Self::from_roots(std::slice::from_ref(root))
    }

    /// Copy a nested tree into the arena using an explicit work-list.
    pub fn from_roots(roots: &[RawRecordNode]) -> Self {
        let mut arena = RecordArena::default();
        let mut stack: Vec<(&RawRecordNode, Option<NodeIndex>)> =
            roots.iter().rev().map(|node| (node, None)).collect();

        while let Some((raw, parent)) = stack.pop() {
            let index = NodeIndex(arena.nodes.len());
            arena.nodes.push(ArenaNode {
                id: raw.id.clone(),
                fields: raw.fields.clone(),
                parent,
                children: Vec::new(),
                malformed_children: raw.malformed_children,
            });

            match parent {
                Some(parent) => arena.nodes[parent.0].children.push(index),
                None => arena.roots.push(index),
            }

            if let Some(children) = &raw.children {
                stack.extend(children.iter().rev().map(|child| (child, Some(index))));
            }
        }

        arena
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn get(&self, index: NodeIndex) -> Option<&ArenaNode> {
        self.nodes.get(index.0)
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.nodes
            .get(index.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// All nodes with their indices, in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ArenaNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_collects_open_fields() {
        let node: RawRecordNode = serde_json::from_value(json!({
            "id": "500000000000001",
            "subject": "Printer on fire",
            "childCount": 2,
            "ownerName": null,
            "children": [{"id": "500000000000002"}]
        }))
        .unwrap();

        assert_eq!(node.id_text().as_deref(), Some("500000000000001"));
        assert_eq!(node.field("subject"), Some(&json!("Printer on fire")));
        assert_eq!(node.field("ownerName"), Some(&Value::Null));
        assert!(node.field("children").is_none());
        assert_eq!(node.children.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_deserialize_tolerates_missing_id_and_children() {
        let node: RawRecordNode = serde_json::from_value(json!({"status": "New"})).unwrap();
        assert!(node.id.is_null());
        assert!(node.id_text().is_none());
        assert!(node.children.is_none());
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let node: RawRecordNode = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(node.id_text().as_deref(), Some("42"));
    }

    #[test]
    fn test_arena_is_preorder() {
        let root = RawRecordNode::new("root").with_children(vec![
            RawRecordNode::new("a").with_children(vec![RawRecordNode::new("a1")]),
            RawRecordNode::new("b"),
        ]);

        let arena = RecordArena::from_root(&root);
        let ids: Vec<_> = arena.iter().filter_map(|(_, n)| n.id_text()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);

        let root_index = arena.roots()[0];
        assert_eq!(arena.children(root_index).len(), 2);
        for (index, node) in arena.iter() {
            if let Some(parent) = node.parent {
                assert!(parent < index);
            }
        }
    }

    #[test]
    fn test_children_string_is_dropped_and_counted() {
        let node: RawRecordNode = serde_json::from_value(json!({
            "id": "500000000000001",
            "subject": "Printer on fire",
            "children": "oops"
        }))
        .unwrap();

        assert!(node.children.is_none());
        assert_eq!(node.malformed_children, 1);
        assert_eq!(node.field("subject"), Some(&json!("Printer on fire")));
        assert!(node.field("children").is_none());
    }

    #[test]
    fn test_children_keep_only_objects() {
        let node: RawRecordNode = serde_json::from_value(json!({
            "id": "500000000000001",
            "children": [null, {"id": "500000000000002", "children": [7, {"id": "x"}]}, "y"]
        }))
        .unwrap();

        assert_eq!(node.malformed_children, 2);
        let children = node.children.as_deref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id_text().as_deref(), Some("500000000000002"));
        assert_eq!(children[0].malformed_children, 1);
        assert_eq!(children[0].children.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_null_children_is_absent() {
        let node: RawRecordNode =
            serde_json::from_value(json!({"id": "a", "children": null})).unwrap();
        assert!(node.children.is_none());
        assert_eq!(node.malformed_children, 0);
    }

    #[test]
    fn test_arena_carries_malformed_children() {
        let node: RawRecordNode = serde_json::from_value(json!({
            "id": "root",
            "children": [{"id": "leaf"}, false]
        }))
        .unwrap();
        let arena = RecordArena::from_root(&node);
        let counts: Vec<_> = arena.iter().map(|(_, n)| n.malformed_children).collect();
        assert_eq!(counts, vec![1, 0]);
    }

    #[test]
    fn test_deep_chain_builds_and_drops() {
        let mut node = RawRecordNode::new("leaf");
        for depth in 0..100_000 {
            node = RawRecordNode::new(format!("n{}", depth)).with_children(vec![node]);
        }

        let arena = RecordArena::from_root(&node);
        assert_eq!(arena.len(), 100_001);
        drop(node);
    }
}
