//! Error types for orgtree
//!
//! Uses `thiserror` for library errors. Configuration problems reject a
//! build outright; host failures are retryable and leave the session's
//! last-known-good state in place. Malformed *data* (duplicate ids,
//! dangling leaders) is never an error - the builder resolves it by
//! policy.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for orgtree operations
pub type OrgtreeResult<T> = Result<T, OrgtreeError>;

/// Main error type for orgtree operations
#[derive(Error, Debug)]
pub enum OrgtreeError {
    /// Required configuration field is empty
    #[error("required config field '{field}' is empty")]
    MissingConfigField { field: &'static str },

    /// Configured data source does not exist in the host
    #[error("source '{source_name}' not found in host")]
    SourceNotFound { source_name: String },

    /// Configured field does not exist in the source's columns
    #[error("field '{field}' not found in source '{source_name}'")]
    FieldNotFound { field: String, source_name: String },

    /// Invalid config file contents
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Host call failed; retryable, session state is left unchanged
    #[error("host request failed: {message}")]
    Host { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrgtreeError {
    /// Whether retrying the same operation can succeed without a config
    /// change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrgtreeError::Host { .. } | OrgtreeError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_field() {
        let err = OrgtreeError::FieldNotFound {
            field: "lider".to_string(),
            source_name: "Staff".to_string(),
        };
        assert_eq!(err.to_string(), "field 'lider' not found in source 'Staff'");
    }

    #[test]
    fn error_display_missing_config_field() {
        let err = OrgtreeError::MissingConfigField {
            field: "entity_field",
        };
        assert_eq!(
            err.to_string(),
            "required config field 'entity_field' is empty"
        );
    }

    #[test]
    fn host_errors_are_retryable() {
        let err = OrgtreeError::Host {
            message: "connection reset".to_string(),
        };
        assert!(err.is_retryable());

        let err = OrgtreeError::SourceNotFound {
            source_name: "Staff".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
