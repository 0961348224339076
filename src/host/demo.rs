//! In-memory demo host.
//!
//! Serves the same fifteen-person dataset the tool ships for trying the
//! UI without a real dashboard, and records applied filters so callers
//! can inspect what the host received.

use crate::error::{OrgtreeError, OrgtreeResult};
use crate::models::DataTable;

use super::bridge::{AppliedFilter, HostBridge};

/// Source name the demo data is served under.
pub const DEMO_SOURCE: &str = "Equipo";

/// Demo host with one hardcoded source.
#[derive(Debug, Default)]
pub struct DemoHost {
    applied: Option<AppliedFilter>,
}

const DEMO_ROWS: &[(&str, Option<&str>)] = &[
    ("Carlos", None),
    ("María", Some("Carlos")),
    ("Juan", Some("María")),
    ("Pedro", Some("María")),
    ("Ana", Some("Carlos")),
    ("Luis", Some("Ana")),
    ("Elena", Some("Ana")),
    ("Roberto", Some("Luis")),
    ("Sofía", Some("Luis")),
    ("Miguel", Some("Elena")),
    ("Laura", Some("Juan")),
    ("Diego", Some("Juan")),
    ("Carmen", Some("Pedro")),
    ("Fernando", Some("Roberto")),
    ("Isabel", Some("Roberto")),
];

impl DemoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter most recently applied, if any.
    pub fn last_filter(&self) -> Option<&AppliedFilter> {
        self.applied.as_ref()
    }
}

impl HostBridge for DemoHost {
    fn list_sources(&self) -> Vec<String> {
        vec![DEMO_SOURCE.to_string()]
    }

    fn fetch_table(&self, source: &str) -> OrgtreeResult<DataTable> {
        if source != DEMO_SOURCE {
            return Err(OrgtreeError::SourceNotFound {
                source_name: source.to_string(),
            });
        }
        Ok(DataTable {
            source: DEMO_SOURCE.to_string(),
            columns: vec!["usuario".to_string(), "lider".to_string()],
            rows: DEMO_ROWS
                .iter()
                .map(|(user, leader)| {
                    vec![
                        Some(user.to_string()),
                        leader.map(|l| l.to_string()),
                    ]
                })
                .collect(),
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
    use crate::hierarchy::{all_ids, build_forest};

    #[test]
    fn demo_table_builds_complete_forest() {
        let host = DemoHost::new();
        let table = host.fetch_table(DEMO_SOURCE).unwrap();
        let rows = table.extract_rows("usuario", "lider", None).unwrap();
        let forest = build_forest(&rows);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "Carlos");
        assert_eq!(all_ids(&forest).len(), DEMO_ROWS.len());
    }

    #[test]
    fn unknown_source_is_rejected() {
        let host = DemoHost::new();
        assert!(matches!(
            host.fetch_table("Ventas"),
            Err(OrgtreeError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn filters_are_recorded_and_cleared() {
        let mut host = DemoHost::new();
        host.apply_filter("usuario", &["Ana".to_string()]).unwrap();
        assert_eq!(host.last_filter().unwrap().values, vec!["Ana"]);

        host.clear_filter("usuario").unwrap();
        assert!(host.last_filter().is_none());
    }
}
