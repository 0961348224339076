//! Orgtree - hierarchical multi-select filter for dashboard data sources
//!
//! Orgtree turns flat (entity, leader) rows into an organizational forest
//! and maintains the derived views a filter UI needs: search-pruned
//! subtrees, expand/collapse state, and cascading multi-select with
//! tri-state checkboxes. Selections flow back to the host as a
//! multi-value equality filter on the configured entity field.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod host;
pub mod models;
pub mod session;
pub mod ui;
pub mod watch;

// Re-exports for convenience
pub use config::{Config, SourceConfig, UiConfig};
pub use error::{OrgtreeError, OrgtreeResult};
pub use hierarchy::{
    all_ids, build_forest, descendant_ids, find_by_id, search, Expansion, Forest, Node, Selection,
    Toggle, TriState,
};
pub use host::{AppliedFilter, DemoHost, HostBridge, JsonFileHost};
pub use models::{DataTable, Row};
pub use session::{FilterSession, RefreshSummary};
pub use watch::{watch, WatchEvent, WatchOptions};
