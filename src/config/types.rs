//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::error::{OrgtreeError, OrgtreeResult};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Which source and fields the hierarchy is built from.
///
/// The three required fields are validated for non-emptiness before any
/// build is attempted; whether they actually resolve against the host's
/// schema is checked at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SourceConfig {
    /// Source (worksheet, table, ...) to fetch rows from
    #[serde(default)]
    pub name: String,

    /// Column holding the unique entity id
    #[serde(default)]
    pub entity_field: String,

    /// Column holding the entity's leader id
    #[serde(default)]
    pub parent_field: String,

    /// Optional column holding a friendlier display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
}

impl SourceConfig {
    /// Reject the config when a required field is empty.
    pub fn validate(&self) -> OrgtreeResult<()> {
        if self.name.is_empty() {
            return Err(OrgtreeError::MissingConfigField { field: "name" });
        }
        if self.entity_field.is_empty() {
            return Err(OrgtreeError::MissingConfigField {
                field: "entity_field",
            });
        }
        if self.parent_field.is_empty() {
            return Err(OrgtreeError::MissingConfigField {
                field: "parent_field",
            });
        }
        Ok(())
    }

    /// The display field, with an empty string reading as unset.
    pub fn display_field(&self) -> Option<&str> {
        self.display_field.as_deref().filter(|f| !f.is_empty())
    }
}

/// UI tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Force unicode glyphs on or off; autodetected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<bool>,
}
