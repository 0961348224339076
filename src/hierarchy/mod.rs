//! Hierarchy engine
//!
//! Converts flat (entity, leader) rows into a forest and maintains the
//! derived views over it: search-pruned subtrees, expand/collapse state,
//! and multi-select with cascade and tri-state indication.
//!
//! # Module Structure
//!
//! - `node` - Node and Forest data structures
//! - `builder` - forest construction from flat rows
//! - `query` - read-only traversals and search pruning
//! - `selection` - selected-id set with cascade and tri-state
//! - `expansion` - expanded-id set, synced to active searches

mod builder;
mod expansion;
mod node;
mod query;
mod selection;

pub use builder::build_forest;
pub use expansion::Expansion;
pub use node::{Forest, Node};
pub use query::{all_ids, descendant_ids, find_by_id, search};
pub use selection::{Selection, Toggle, TriState};
