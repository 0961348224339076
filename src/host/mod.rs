//! Host Boundary (Interfaces)
//!
//! The core never talks to a dashboard directly: it depends on the narrow
//! [`HostBridge`] capability trait, and adapters translate the host's
//! actual API shape at this boundary.
//!
//! - `bridge` - the capability trait and the applied-filter record
//! - `demo` - built-in demo dataset, used when no data file is given
//! - `json_file` - named sources read from a JSON document

mod bridge;
mod demo;
mod json_file;

pub use bridge::{AppliedFilter, HostBridge};
pub use demo::{DemoHost, DEMO_SOURCE};
pub use json_file::JsonFileHost;
