//! Forest construction from flat rows.
//!
//! Rows arrive already normalized by the host boundary (empty and
//! null-sentinel leader values are `None`). The build itself never fails:
//! duplicate ids resolve first-wins, dangling or self-referencing leaders
//! promote the node to a root, and the output ordering is deterministic
//! for a given row sequence.

use std::collections::HashMap;

use crate::models::Row;

use super::node::{Forest, Node};

/// Build a forest from flat (entity, leader) rows.
///
/// Three passes: create one node per distinct non-empty entity id (first
/// row wins), attach each node to its leader or promote it to a root, then
/// recursively sort every sibling list by display label (case-insensitive,
/// ties broken by id).
pub fn build_forest(rows: &[Row]) -> Forest {
    let mut order: Vec<String> = Vec::new();
    let mut nodes: HashMap<String, Node> = HashMap::new();

    for row in rows {
        if row.entity_id.is_empty() || nodes.contains_key(&row.entity_id) {
            continue;
        }
        order.push(row.entity_id.clone());
        nodes.insert(
            row.entity_id.clone(),
            Node::new(
                row.entity_id.clone(),
                row.display_label.clone(),
                row.parent_id.clone(),
            ),
        );
    }

    // A node whose leader is unknown, or is itself, becomes a root.
    let mut child_ids: HashMap<String, Vec<String>> = HashMap::new();
    let mut root_ids: Vec<String> = Vec::new();
    for id in &order {
        match nodes[id].parent_id.clone() {
            Some(parent) if parent != *id && nodes.contains_key(&parent) => {
                child_ids.entry(parent).or_default().push(id.clone());
            }
            _ => root_ids.push(id.clone()),
        }
    }

    let mut forest: Forest = root_ids
        .iter()
        .filter_map(|id| assemble(id, &mut nodes, &mut child_ids))
        .collect();

    // Leaders forming a cycle leave their members reachable from no root.
    // Promote whatever is left, in input order, so every row still appears.
    for id in &order {
        if let Some(node) = assemble(id, &mut nodes, &mut child_ids) {
            forest.push(node);
        }
    }

    sort_siblings(&mut forest);
    forest
}

fn assemble(
    id: &str,
    nodes: &mut HashMap<String, Node>,
    child_ids: &mut HashMap<String, Vec<String>>,
) -> Option<Node> {
    let mut node = nodes.remove(id)?;
    if let Some(children) = child_ids.remove(id) {
        node.children = children
            .iter()
            .filter_map(|child| assemble(child, nodes, child_ids))
            .collect();
    }
    Some(node)
}

fn sort_siblings(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| {
        a.display_label
            .to_lowercase()
            .cmp(&b.display_label.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    for node in nodes.iter_mut() {
        sort_siblings(&mut node.children);
    }
}
