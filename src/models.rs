//! Core data models for orgtree
//!
//! Defines the shapes crossing the host boundary: the tabular data a host
//! hands back and the normalized rows the hierarchy builder consumes.

use serde::{Deserialize, Serialize};

use crate::error::{OrgtreeError, OrgtreeResult};

/// Values a host serializes for "no leader". Normalized to `None` here,
/// before the builder ever sees them.
const NULL_SENTINELS: &[&str] = &["", "Null", "%null%"];

/// A normalized flat record: one entity and its leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Unique entity key; empty ids are skipped by the builder
    pub entity_id: String,
    /// Leader id, `None` for roots
    pub parent_id: Option<String>,
    /// Optional UI label; falls back to the entity id
    pub display_label: Option<String>,
}

/// Tabular data as fetched from a host source: named columns over rows of
/// nullable cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    /// Source the table came from (for error context)
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl DataTable {
    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == field)
    }

    /// Resolve the configured field names against the columns and produce
    /// normalized rows. Fails with the offending field name when a column
    /// is missing; never fails on cell contents.
    pub fn extract_rows(
        &self,
        entity_field: &str,
        parent_field: &str,
        display_field: Option<&str>,
    ) -> OrgtreeResult<Vec<Row>> {
        let entity_col = self.resolve(entity_field)?;
        let parent_col = self.resolve(parent_field)?;
        let display_col = match display_field {
            Some(field) => Some(self.resolve(field)?),
            None => None,
        };

        let rows = self
            .rows
            .iter()
            .map(|cells| Row {
                entity_id: cell_text(cells, entity_col),
                parent_id: normalize_null(cells.get(parent_col).cloned().flatten()),
                display_label: display_col
                    .and_then(|col| normalize_null(cells.get(col).cloned().flatten())),
            })
            .collect();

        Ok(rows)
    }

    fn resolve(&self, field: &str) -> OrgtreeResult<usize> {
        self.column_index(field)
            .ok_or_else(|| OrgtreeError::FieldNotFound {
                field: field.to_string(),
                source_name: self.source.clone(),
            })
    }
}

fn cell_text(cells: &[Option<String>], col: usize) -> String {
    cells.get(col).cloned().flatten().unwrap_or_default()
}

fn normalize_null(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !NULL_SENTINELS.contains(&value.as_str()))
}
