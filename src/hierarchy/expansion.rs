//! Expanded-id set.
//!
//! Independent of selection. An active search forces the set to every id
//! of the filtered forest so each matched path is visible; clearing the
//! search leaves the set alone.

use std::collections::BTreeSet;

use super::node::Node;
use super::query::all_ids;

/// The set of expanded node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    ids: BTreeSet<String>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn toggle(&self, id: &str) -> Expansion {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        Expansion { ids }
    }

    pub fn expand_all(forest: &[Node]) -> Expansion {
        Expansion {
            ids: all_ids(forest).into_iter().collect(),
        }
    }

    pub fn collapse_all() -> Expansion {
        Expansion::new()
    }

    /// Forced one-way sync on an active search: expand every node of the
    /// filtered forest.
    pub fn sync_to_search(filtered_forest: &[Node]) -> Expansion {
        Expansion::expand_all(filtered_forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{build_forest, search};
    use crate::models::Row;

    fn row(entity: &str, parent: Option<&str>) -> Row {
        Row {
            entity_id: entity.to_string(),
            parent_id: parent.map(|p| p.to_string()),
            display_label: None,
        }
    }

    #[test]
    fn toggle_flips_membership() {
        let expansion = Expansion::new().toggle("Carlos");
        assert!(expansion.is_expanded("Carlos"));

        let expansion = expansion.toggle("Carlos");
        assert!(!expansion.is_expanded("Carlos"));
    }

    #[test]
    fn expand_all_then_collapse_all() {
        let forest = build_forest(&[row("Carlos", None), row("María", Some("Carlos"))]);

        let expansion = Expansion::expand_all(&forest);
        assert!(expansion.is_expanded("Carlos"));
        assert!(expansion.is_expanded("María"));

        let expansion = Expansion::collapse_all();
        assert!(!expansion.is_expanded("Carlos"));
    }

    #[test]
    fn search_sync_expands_matched_paths_only() {
        let forest = build_forest(&[
            row("Carlos", None),
            row("María", Some("Carlos")),
            row("Juan", Some("María")),
            row("Ana", Some("Carlos")),
        ]);

        let filtered = search(&forest, "juan");
        let expansion = Expansion::sync_to_search(&filtered);

        assert!(expansion.is_expanded("Carlos"));
        assert!(expansion.is_expanded("María"));
        assert!(expansion.is_expanded("Juan"));
        assert!(!expansion.is_expanded("Ana"));
    }
}
