//! Node and Forest data structures.

/// An ordered sequence of root nodes, each a disjoint tree.
pub type Forest = Vec<Node>;

/// A node in the organizational tree.
///
/// Children are owned and ordered; membership is resolved once from a flat
/// map during the build, never by following live references afterwards, so
/// a subtree can never cycle back to an ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Entity id - the unique key, always searchable even when a display
    /// label is shown
    pub id: String,
    /// Label shown in the UI (falls back to the id)
    pub display_label: String,
    /// Leader id as given by the row, `None` for declared roots
    pub parent_id: Option<String>,
    /// Child nodes, sorted by display label then id (empty for leaves)
    pub children: Vec<Node>,
}

impl Node {
    /// Create a childless node. The display label falls back to the id
    /// when absent or empty.
    pub fn new(id: impl Into<String>, display_label: Option<String>, parent_id: Option<String>) -> Self {
        let id = id.into();
        let display_label = match display_label {
            Some(label) if !label.is_empty() => label,
            _ => id.clone(),
        };
        Self {
            id,
            display_label,
            parent_id,
            children: Vec::new(),
        }
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_falls_back_to_id() {
        let node = Node::new("ana", None, None);
        assert_eq!(node.display_label, "ana");

        let node = Node::new("ana", Some(String::new()), None);
        assert_eq!(node.display_label, "ana");

        let node = Node::new("ana", Some("Ana López".to_string()), None);
        assert_eq!(node.display_label, "Ana López");
    }

    #[test]
    fn new_node_is_leaf() {
        let node = Node::new("ana", None, Some("luis".to_string()));
        assert!(node.is_leaf());
        assert_eq!(node.parent_id.as_deref(), Some("luis"));
    }
}
