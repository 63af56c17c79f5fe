use crate::catalog;
use crate::normalize::{DEFAULT_ID_LENGTHS, DEFAULT_NO_DATA_SENTINEL, IdPredicate, NormalizeOptions};
use crate::Result;
use casetree_types::{ColumnId, ColumnSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to the expand/collapse set when a column commit rebuilds
/// the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// Expand every node of the rebuilt tree.
    #[default]
    Reset,
    /// Keep the previous expansion for ids that still exist.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Logical field names shown on first view, in order.
    pub default_columns: Vec<String>,
    /// Accepted record id widths.
    pub id_lengths: Vec<usize>,
    pub expansion_on_commit: ExpansionPolicy,
    /// Root id meaning "no records".
    pub no_data_sentinel: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_columns: catalog::DEFAULT_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            id_lengths: DEFAULT_ID_LENGTHS.to_vec(),
            expansion_on_commit: ExpansionPolicy::default(),
            no_data_sentinel: DEFAULT_NO_DATA_SENTINEL.to_string(),
        }
    }
}

impl ExplorerConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ExplorerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            id_predicate: IdPredicate::Lengths(self.id_lengths.clone()),
            no_data_sentinel: self.no_data_sentinel.clone(),
        }
    }

    /// Resolve `default_columns` through the catalog. Names the catalog does
    /// not know are skipped.
    pub fn initial_columns(&self) -> Vec<ColumnSpec> {
        let mut columns = Vec::with_capacity(self.default_columns.len());
        for field in &self.default_columns {
            let Some(entry) = catalog::resolve(field) else {
                tracing::warn!(field = %field, "unknown default column skipped");
                continue;
            };
            columns.push(catalog::build_column(
                ColumnId::from_position(columns.len()),
                entry.label,
                field,
            ));
        }
        columns
    }
}
