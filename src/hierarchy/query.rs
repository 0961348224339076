//! Read-only traversals over a forest.
//!
//! Everything here is pure: inputs are borrowed, outputs are freshly
//! allocated, and the forest is never mutated.

use super::node::{Forest, Node};

/// Ids of every node in the subtree below `node`, pre-order, excluding
/// `node` itself.
pub fn descendant_ids(node: &Node) -> Vec<String> {
    let mut ids = Vec::new();
    collect_descendants(node, &mut ids);
    ids
}

fn collect_descendants(node: &Node, ids: &mut Vec<String>) {
    for child in &node.children {
        ids.push(child.id.clone());
        collect_descendants(child, ids);
    }
}

/// Ids of every node in the forest, pre-order.
pub fn all_ids(forest: &[Node]) -> Vec<String> {
    let mut ids = Vec::new();
    for node in forest {
        ids.push(node.id.clone());
        collect_descendants(node, &mut ids);
    }
    ids
}

/// Find a node by id, pre-order, first match wins.
pub fn find_by_id<'a>(forest: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Prune the forest to nodes matching `term` (case-insensitive substring
/// of the display label or the id) and their ancestors.
///
/// A node that matches directly keeps its full subtree even when no
/// descendant matches; a node kept only for its descendants keeps just the
/// surviving children. A blank term means "no filter" and returns the
/// forest unchanged.
pub fn search(forest: &[Node], term: &str) -> Forest {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return forest.to_vec();
    }
    prune(forest, &term)
}

fn prune(nodes: &[Node], term: &str) -> Forest {
    let mut result = Vec::new();

    for node in nodes {
        let matches = node.id.to_lowercase().contains(term)
            || node.display_label.to_lowercase().contains(term);
        let surviving = prune(&node.children, term);

        if !matches && surviving.is_empty() {
            continue;
        }

        let mut kept = node.clone();
        if !surviving.is_empty() {
            kept.children = surviving;
        }
        // A direct hit with no matching descendants reveals everything
        // under it, so the original children stay.
        result.push(kept);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_forest;
    use crate::models::Row;

    fn row(entity: &str, parent: Option<&str>) -> Row {
        Row {
            entity_id: entity.to_string(),
            parent_id: parent.map(|p| p.to_string()),
            display_label: None,
        }
    }

    fn demo_forest() -> Forest {
        build_forest(&[
            row("Carlos", None),
            row("María", Some("Carlos")),
            row("Juan", Some("María")),
            row("Ana", Some("Carlos")),
            row("Luis", Some("Ana")),
        ])
    }

    #[test]
    fn descendant_ids_preorder_excluding_self() {
        let forest = demo_forest();
        let carlos = find_by_id(&forest, "Carlos").unwrap();

        // Siblings sort alphabetically, so Ana's branch comes first.
        assert_eq!(descendant_ids(carlos), vec!["Ana", "Luis", "María", "Juan"]);
    }

    #[test]
    fn all_ids_covers_whole_forest_preorder() {
        let forest = demo_forest();

        assert_eq!(
            all_ids(&forest),
            vec!["Carlos", "Ana", "Luis", "María", "Juan"]
        );
    }

    #[test]
    fn find_by_id_locates_deep_node() {
        let forest = demo_forest();

        assert_eq!(find_by_id(&forest, "Juan").unwrap().id, "Juan");
        assert!(find_by_id(&forest, "nobody").is_none());
    }

    #[test]
    fn search_keeps_ancestor_path_to_match() {
        let forest = demo_forest();

        let filtered = search(&forest, "juan");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "Carlos");
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].id, "María");
        assert_eq!(filtered[0].children[0].children[0].id, "Juan");
    }

    #[test]
    fn search_direct_hit_reveals_full_subtree() {
        let forest = demo_forest();

        // "ana" matches the Ana node itself; Luis doesn't match but stays.
        let filtered = search(&forest, "ana");

        let ana = find_by_id(&filtered, "Ana").unwrap();
        assert_eq!(ana.children[0].id, "Luis");
    }

    #[test]
    fn search_is_case_insensitive_on_label_and_id() {
        let forest = build_forest(&[Row {
            entity_id: "u1".to_string(),
            parent_id: None,
            display_label: Some("Carmen Díaz".to_string()),
        }]);

        assert_eq!(search(&forest, "CARMEN").len(), 1);
        assert_eq!(search(&forest, "U1").len(), 1);
        assert!(search(&forest, "zz").is_empty());
    }

    #[test]
    fn blank_term_returns_forest_unchanged() {
        let forest = demo_forest();

        assert_eq!(search(&forest, ""), forest);
        assert_eq!(search(&forest, "   "), forest);
    }

    #[test]
    fn search_does_not_mutate_input() {
        let forest = demo_forest();
        let before = forest.clone();

        let _ = search(&forest, "juan");

        assert_eq!(forest, before);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn matches(node: &Node, term: &str) -> bool {
            node.id.to_lowercase().contains(term)
                || node.display_label.to_lowercase().contains(term)
        }

        fn subtree_has_match(node: &Node, term: &str) -> bool {
            matches(node, term) || node.children.iter().any(|c| subtree_has_match(c, term))
        }

        proptest! {
            // Every surviving node either matches or has a matching
            // descendant.
            #[test]
            fn survivors_justify_themselves(
                rows in proptest::collection::vec(
                    ("[a-e]{1,2}", proptest::option::of("[a-e]{1,2}")),
                    0..16,
                ),
                term in "[a-e]{1,2}",
            ) {
                let rows: Vec<Row> = rows
                    .into_iter()
                    .map(|(entity, parent)| Row {
                        entity_id: entity,
                        parent_id: parent,
                        display_label: None,
                    })
                    .collect();
                let forest = build_forest(&rows);
                let filtered = search(&forest, &term);

                fn check(nodes: &[Node], term: &str) -> bool {
                    nodes.iter().all(|n| subtree_has_match(n, term) && check(&n.children, term))
                }
                prop_assert!(check(&filtered, &term));
            }
        }
    }
}
