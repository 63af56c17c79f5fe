// Tree normalization - raw record tree to render-ready display tree
//
// Normalization is pure and total: malformed input degrades to defaults,
// empty sequences or the explicit no-data state, and every problem is
// reported as a node-local warning. Traversal uses an explicit work-list over
// the record arena, so depth is bounded by heap, not stack.
//
// Scalar fields the column catalog does not know pass through unchanged so
// custom columns can bind to them; each one is traced at debug level.

mod fields;
mod ids;

pub use fields::{
    DATE_FIELDS, DateOutcome, PLACEHOLDER, RELATED_LINKS, TEXT_DEFAULT_FIELDS, reformat_date,
};
pub use ids::{DEFAULT_ID_LENGTHS, IdPredicate};

use std::collections::BTreeMap;

use casetree_types::{
    ArenaNode, CHILD_COUNT_FIELD, DisplayNode, DisplayTree, NodeIndex, RAW_CHILDREN_KEY,
    RECORD_URL_FIELD, RENDER_CHILDREN_KEY, RawRecordNode, RecordArena, assemble_preorder, id_text,
};
use serde_json::Value;

use crate::catalog;
use crate::diagnostics::{NormalizationWarning, WarningKind};
use fields::{CASE_NUMBER_FIELD, SYNTHETIC_LABEL_FIELD, is_missing, json_kind};

/// Root id the backend sends when the context record has no cases.
pub const DEFAULT_NO_DATA_SENTINEL: &str = "no-cases";

/// Knobs for [`Normalizer`].
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub id_predicate: IdPredicate,
    pub no_data_sentinel: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            id_predicate: IdPredicate::default(),
            no_data_sentinel: DEFAULT_NO_DATA_SENTINEL.to_string(),
        }
    }
}

/// Display tree plus the warnings recorded while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub tree: DisplayTree,
    pub warnings: Vec<NormalizationWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn normalize(&self, roots: &[RawRecordNode]) -> Normalized {
        self.normalize_arena(&RecordArena::from_roots(roots))
    }

    /// Normalize every root of `arena`.
    ///
    /// Roots carrying the no-data sentinel are dropped; if that leaves no
    /// roots, the result is [`DisplayTree::NoData`]. Input that simply has no
    /// roots yields empty records.
    pub fn normalize_arena(&self, arena: &RecordArena) -> Normalized {
        let mut warnings = Vec::new();

        let roots: Vec<NodeIndex> = arena
            .roots()
            .iter()
            .copied()
            .filter(|index| !self.is_sentinel(arena.get(*index)))
            .collect();

        if roots.is_empty() && !arena.roots().is_empty() {
            return Normalized {
                tree: DisplayTree::NoData,
                warnings,
            };
        }

        let mut items: Vec<(Option<usize>, DisplayNode)> = Vec::with_capacity(arena.len());
        let mut stack: Vec<(NodeIndex, Option<usize>)> =
            roots.iter().rev().map(|index| (*index, None)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(raw) = arena.get(index) else {
                continue;
            };

            let position = items.len();
            items.push((parent, self.shape_node(raw, &mut warnings)));
            stack.extend(
                arena
                    .children(index)
                    .iter()
                    .rev()
                    .map(|child| (*child, Some(position))),
            );
        }

        let nodes = assemble_preorder(items, |node, children| node.children = children);

        Normalized {
            tree: DisplayTree::Records(nodes),
            warnings,
        }
    }

    fn is_sentinel(&self, node: Option<&ArenaNode>) -> bool {
        node.and_then(ArenaNode::id_text).as_deref() == Some(self.options.no_data_sentinel.as_str())
    }

    /// Transform one node; children are attached later.
    fn shape_node(&self, raw: &ArenaNode, warnings: &mut Vec<NormalizationWarning>) -> DisplayNode {
        let mut warn = |warning: NormalizationWarning| {
            tracing::warn!(node = %warning.node_id, "{}", warning);
            warnings.push(warning);
        };

        let id = raw.id_text();
        if id.is_none() {
            warn(NormalizationWarning::new("", None, WarningKind::MissingId));
        }
        let id = id.unwrap_or_default();
        if raw.malformed_children > 0 {
            warn(NormalizationWarning::new(
                id.as_str(),
                Some(RAW_CHILDREN_KEY),
                WarningKind::MalformedChildren {
                    dropped: raw.malformed_children,
                },
            ));
        }
        let predicate = &self.options.id_predicate;
        let is_record = predicate.is_valid(&id);

        let record_url = if is_record {
            format!("/{}", id)
        } else {
            String::new()
        };

        let related_urls: BTreeMap<String, String> = RELATED_LINKS
            .iter()
            .map(|(link, source)| {
                let source_id = raw.fields.get(*source).and_then(id_text);
                (link.to_string(), predicate.link_for(source_id.as_deref()))
            })
            .collect();

        let mut fields = BTreeMap::new();
        for (name, value) in &raw.fields {
            if is_derived_key(name) || value.is_null() {
                continue;
            }
            if value.is_array() || value.is_object() {
                warn(NormalizationWarning::new(
                    id.as_str(),
                    Some(name),
                    WarningKind::UnsupportedValue {
                        found: json_kind(value).to_string(),
                    },
                ));
                continue;
            }
            if !is_known_field(name) {
                tracing::debug!(node = %id, field = %name, "passing through unknown field");
            }
            fields.insert(name.clone(), value.clone());
        }

        // Synthetic grouping rows surface their caption as the case number
        if !is_record
            && fields
                .get(CASE_NUMBER_FIELD)
                .is_none_or(|v| v.as_str() == Some(""))
            && let Some(Value::String(label)) = fields.get(SYNTHETIC_LABEL_FIELD)
            && !label.is_empty()
        {
            let label = Value::String(label.clone());
            fields.insert(CASE_NUMBER_FIELD.to_string(), label);
        }

        for name in TEXT_DEFAULT_FIELDS {
            if is_missing(fields.get(*name)) {
                fields.insert(name.to_string(), Value::String(PLACEHOLDER.to_string()));
            }
        }

        for name in DATE_FIELDS {
            let Some(value) = fields.get_mut(*name) else {
                continue;
            };
            match reformat_date(value) {
                DateOutcome::Reformatted(iso) => *value = Value::String(iso),
                DateOutcome::Skipped => {}
                DateOutcome::Unparsable => {
                    let shown = match &*value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    warn(NormalizationWarning::new(
                        id.as_str(),
                        Some(name),
                        WarningKind::UnparsableDate { value: shown },
                    ));
                }
            }
        }

        let descendant_count = match raw.fields.get(CHILD_COUNT_FIELD) {
            None | Some(Value::Null) => raw.children.len() as u64,
            Some(value) => match explicit_count(value) {
                Some(count) => count,
                None => {
                    warn(NormalizationWarning::new(
                        id.as_str(),
                        Some(CHILD_COUNT_FIELD),
                        WarningKind::InvalidCount {
                            value: value.to_string(),
                        },
                    ));
                    raw.children.len() as u64
                }
            },
        };

        DisplayNode {
            id,
            record_url,
            related_urls,
            fields,
            descendant_count,
            children: Vec::new(),
        }
    }
}

/// Normalize with default options.
pub fn normalize(roots: &[RawRecordNode]) -> Normalized {
    Normalizer::default().normalize(roots)
}

/// Keys recomputed on every pass; source values under them are ignored.
fn is_derived_key(name: &str) -> bool {
    name == RECORD_URL_FIELD
        || name == CHILD_COUNT_FIELD
        || name == RENDER_CHILDREN_KEY
        || RELATED_LINKS.iter().any(|(link, _)| *link == name)
}

fn is_known_field(name: &str) -> bool {
    catalog::resolve(name).is_some()
        || name == SYNTHETIC_LABEL_FIELD
        || TEXT_DEFAULT_FIELDS.contains(&name)
        || DATE_FIELDS.contains(&name)
        || RELATED_LINKS.iter().any(|(_, source)| *source == name)
}

fn explicit_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
