//! The host capability trait.
//!
//! Two operations matter to the core: fetching rows and applying the
//! flattened selection as a filter. `list_sources` exists for the doctor
//! checks and the init wizard; it is advisory and may be empty.

use serde::Serialize;

use crate::error::OrgtreeResult;
use crate::models::DataTable;

/// A multi-value equality filter as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFilter {
    /// Field the filter keys on (the configured entity field)
    pub field: String,
    /// Selected ids; an empty set never reaches the host - the filter is
    /// cleared instead
    pub values: Vec<String>,
}

/// Capability interface to the host dashboard.
///
/// Implementations adapt whatever the host actually looks like; the core
/// only ever sees this trait. Calls are synchronous from the core's point
/// of view - an adapter fronting an async host awaits completion before
/// returning.
pub trait HostBridge {
    /// Names of the sources this host can serve. Advisory; used by
    /// `check` and the init wizard.
    fn list_sources(&self) -> Vec<String>;

    /// Fetch the named source as a table.
    fn fetch_table(&self, source: &str) -> OrgtreeResult<DataTable>;

    /// Replace the filter on `field` with the given values.
    fn apply_filter(&mut self, field: &str, values: &[String]) -> OrgtreeResult<()>;

    /// Remove any filter on `field`.
    fn clear_filter(&mut self, field: &str) -> OrgtreeResult<()>;
}
