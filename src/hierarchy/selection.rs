//! Selected-id set with cascade and tri-state indication.
//!
//! Transitions are pure: each operation takes the old selection and
//! returns a new one, so the caller owns storage and decides when to
//! re-render or push the set to the host filter.

use std::collections::BTreeSet;

use super::node::Node;
use super::query::{all_ids, descendant_ids};

/// Checkbox display state of a node relative to its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    /// Node and all descendants selected
    Checked,
    /// Neither node nor any descendant selected
    Unchecked,
    /// Anything in between
    Indeterminate,
}

/// Target state for a cascade toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Select,
    Deselect,
}

/// The set of selected node ids.
///
/// Ids absent from the current forest are inert; they survive rebuilds
/// untouched and can be dropped with [`Selection::prune_stale`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// The flattened id set, sorted, as handed to the filter sink.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Cascade toggle: the node and its entire subtree move to
    /// `target`, whatever their prior mixed state was.
    pub fn toggle(&self, node: &Node, target: Toggle) -> Selection {
        let mut ids = self.ids.clone();
        let cascade = std::iter::once(node.id.clone()).chain(descendant_ids(node));
        match target {
            Toggle::Select => ids.extend(cascade),
            Toggle::Deselect => {
                for id in cascade {
                    ids.remove(&id);
                }
            }
        }
        Selection { ids }
    }

    /// The target a checkbox click on `node` resolves to: anything short
    /// of fully checked selects.
    pub fn toggle_target(&self, node: &Node) -> Toggle {
        if self.tri_state(node) == TriState::Checked {
            Toggle::Deselect
        } else {
            Toggle::Select
        }
    }

    pub fn select_all(forest: &[Node]) -> Selection {
        Selection {
            ids: all_ids(forest).into_iter().collect(),
        }
    }

    pub fn clear() -> Selection {
        Selection::new()
    }

    /// Drop ids that no longer exist in `forest`.
    pub fn prune_stale(&self, forest: &[Node]) -> Selection {
        let known: BTreeSet<String> = all_ids(forest).into_iter().collect();
        Selection {
            ids: self.ids.intersection(&known).cloned().collect(),
        }
    }

    /// Tri-state of `node` for display.
    ///
    /// Leaves are checked iff selected. An internal node is checked only
    /// when it is selected itself and every descendant is too; selected
    /// with no selected descendants is deliberately indeterminate, not
    /// checked (the node was picked but its children's state has not
    /// caught up).
    pub fn tri_state(&self, node: &Node) -> TriState {
        if node.is_leaf() {
            return if self.is_selected(&node.id) {
                TriState::Checked
            } else {
                TriState::Unchecked
            };
        }

        let descendants = descendant_ids(node);
        let selected = descendants
            .iter()
            .filter(|id| self.ids.contains(id.as_str()))
            .count();
        let self_selected = self.is_selected(&node.id);

        if self_selected && selected == descendants.len() {
            TriState::Checked
        } else if self_selected || selected > 0 {
            TriState::Indeterminate
        } else {
            TriState::Unchecked
        }
    }
}
