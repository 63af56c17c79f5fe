//! Assertions over `casetree --format json` output.

use anyhow::{Context, Result};
use serde_json::Value;

fn records(json: &Value) -> Result<&Vec<Value>> {
    json["tree"]["records"]
        .as_array()
        .context("Expected 'tree.records' array in JSON")
}

/// Assert the display tree is the explicit no-data state.
pub fn assert_no_data(json: &Value) -> Result<()> {
    let kind = json["tree"]["kind"]
        .as_str()
        .context("Expected 'tree.kind' in JSON")?;
    if kind != "no_data" {
        anyhow::bail!("Expected no_data tree, got {}", kind);
    }
    Ok(())
}

/// Assert the number of nodes across the whole display tree.
pub fn assert_node_count(json: &Value, expected: usize) -> Result<()> {
    let mut count = 0;
    let mut stack: Vec<&Value> = records(json)?.iter().collect();
    while let Some(node) = stack.pop() {
        count += 1;
        let children = node["_children"]
            .as_array()
            .with_context(|| format!("Node {} missing _children", node["id"]))?;
        stack.extend(children);
    }

    if count != expected {
        anyhow::bail!("Expected {} nodes, got {}", expected, count);
    }
    Ok(())
}

/// Assert the active column labels, in order.
pub fn assert_column_labels(json: &Value, expected: &[&str]) -> Result<()> {
    let labels: Vec<&str> = json["columns"]
        .as_array()
        .context("Expected 'columns' array in JSON")?
        .iter()
        .filter_map(|column| column["label"].as_str())
        .collect();

    if labels != expected {
        anyhow::bail!("Expected columns {:?}, got {:?}", expected, labels);
    }
    Ok(())
}
