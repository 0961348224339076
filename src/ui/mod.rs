//! Terminal UI for the tree picker.
//!
//! - `theme` - design tokens (colors, icon sets, capability detection)
//! - `tree` - flattening and line rendering
//! - `input` - keyboard handling and the interactive loop

pub mod input;
pub mod theme;
pub mod tree;

pub use input::{key_to_action, run_interactive, TreeAction};
pub use tree::{flatten_visible, render_help_bar, render_status_bar, render_tree_row, TreeRow};
