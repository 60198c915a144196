//! Snapshot views over records
//!
//! The diff engine reads records only through [`FieldEnumerator`]. The
//! [`Document`] adapter is the in-memory implementation used by the listener,
//! the CLI and the tests.

pub mod document;
pub mod enumerator;
mod repr;

pub use document::{Document, SchemaGroup};
pub use enumerator::{normalize_path, FieldEnumerator};
