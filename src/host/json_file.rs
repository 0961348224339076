//! JSON file host.
//!
//! Reads a document mapping source names to arrays of row objects:
//!
//! ```json
//! {
//!   "Staff": [
//!     { "usuario": "carlos", "lider": null, "nombre": "Carlos Ruiz" },
//!     { "usuario": "maria", "lider": "carlos" }
//!   ]
//! }
//! ```
//!
//! Columns are the union of keys across a source's rows; missing keys and
//! JSON nulls read as null cells. Numbers and booleans are stringified,
//! matching how dashboard hosts hand over formatted values.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{OrgtreeError, OrgtreeResult};
use crate::models::DataTable;

use super::bridge::{AppliedFilter, HostBridge};

type SourceRows = Vec<serde_json::Map<String, Value>>;

/// Host backed by a JSON document of named sources.
#[derive(Debug)]
pub struct JsonFileHost {
    sources: Vec<(String, SourceRows)>,
    applied: Option<AppliedFilter>,
    path: Option<PathBuf>,
}

impl JsonFileHost {
    /// Load a host from a JSON file.
    pub fn from_path(path: &Path) -> OrgtreeResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut host = Self::from_str(&content)?;
        host.path = Some(path.to_path_buf());
        Ok(host)
    }

    /// Re-read the backing file after a change notification. Applied
    /// filters survive; a host parsed from a bare string is left as-is.
    pub fn reload(&mut self) -> OrgtreeResult<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let content = fs::read_to_string(&path)?;
        let fresh = Self::from_str(&content)?;
        self.sources = fresh.sources;
        Ok(())
    }

    /// Parse a host from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> OrgtreeResult<Self> {
        let document: serde_json::Map<String, Value> = serde_json::from_str(content)?;

        let mut sources = Vec::new();
        for (name, value) in document {
            let rows = match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(map) => Ok(map),
                        other => Err(OrgtreeError::Host {
                            message: format!(
                                "source '{name}' contains a non-object row: {other}"
                            ),
                        }),
                    })
                    .collect::<OrgtreeResult<SourceRows>>()?,
                other => {
                    return Err(OrgtreeError::Host {
                        message: format!("source '{name}' is not an array: {other}"),
                    })
                }
            };
            sources.push((name, rows));
        }

        Ok(Self {
            sources,
            applied: None,
            path: None,
        })
    }

    /// The filter most recently applied, if any.
    pub fn last_filter(&self) -> Option<&AppliedFilter> {
        self.applied.as_ref()
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl HostBridge for JsonFileHost {
    fn list_sources(&self) -> Vec<String> {
        self.sources.iter().map(|(name, _)| name.clone()).collect()
    }

    fn fetch_table(&self, source: &str) -> OrgtreeResult<DataTable> {
        let rows = self
            .sources
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, rows)| rows)
            .ok_or_else(|| OrgtreeError::SourceNotFound {
                source_name: source.to_string(),
            })?;

        let columns: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).and_then(cell_text))
                    .collect()
            })
            .collect();

        Ok(DataTable {
            source: source.to_string(),
            columns,
            rows: cells,
        })
    }

    fn apply_filter(&mut self, field: &str, values: &[String]) -> OrgtreeResult<()> {
        self.applied = Some(AppliedFilter {
            field: field.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }

    fn clear_filter(&mut self, _field: &str) -> OrgtreeResult<()> {
        self.applied = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "Staff": [
            { "usuario": "carlos", "lider": null, "nombre": "Carlos Ruiz" },
            { "usuario": "maria", "lider": "carlos" },
            { "usuario": "n7", "lider": 42 }
        ]
    }"#;

    #[test]
    fn columns_are_the_sorted_union_of_keys() {
        let host = JsonFileHost::from_str(DOCUMENT).unwrap();
        let table = host.fetch_table("Staff").unwrap();

        assert_eq!(table.columns, vec!["lider", "nombre", "usuario"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn missing_keys_and_nulls_read_as_null_cells() {
        let host = JsonFileHost::from_str(DOCUMENT).unwrap();
        let table = host.fetch_table("Staff").unwrap();

        // maria has no "nombre" key; carlos has a null leader.
        let nombre = table.column_index("nombre").unwrap();
        let lider = table.column_index("lider").unwrap();
        assert_eq!(table.rows[1][nombre], None);
        assert_eq!(table.rows[0][lider], None);
    }

    #[test]
    fn non_string_values_are_stringified() {
        let host = JsonFileHost::from_str(DOCUMENT).unwrap();
        let table = host.fetch_table("Staff").unwrap();

        let lider = table.column_index("lider").unwrap();
        assert_eq!(table.rows[2][lider].as_deref(), Some("42"));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let host = JsonFileHost::from_str(DOCUMENT).unwrap();
        assert!(matches!(
            host.fetch_table("Ventas"),
            Err(OrgtreeError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn malformed_document_is_a_host_error() {
        assert!(JsonFileHost::from_str(r#"{"Staff": 7}"#).is_err());
        assert!(JsonFileHost::from_str(r#"{"Staff": [7]}"#).is_err());
    }
}
