//! Configuration module for orgtree
//!
//! Configuration hierarchy:
//! 1. Environment variables (ORGTREE_*)
//! 2. Explicit --config path
//! 3. Project config (./orgtree.toml)
//! 4. User config (~/.config/orgtree/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{load_or_default, load_with_warnings, save, ConfigWarning};
pub use types::{Config, SourceConfig, UiConfig};

/// Default project-level config file name.
pub const CONFIG_FILE: &str = "orgtree.toml";
