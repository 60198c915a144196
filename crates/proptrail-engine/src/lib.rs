//! proptrail engine - event handling layer
//!
//! Wires snapshot loading, the diff engine and a log sink together behind a
//! single event entry point, and owns operation lifecycle logging.

pub mod event;
pub mod listener;
pub mod loader;

pub use event::{AuditEvent, DocumentEventContext, EventContext};
pub use listener::{AuditListener, ListenerOutcome};
pub use loader::{InMemorySnapshotLoader, SnapshotLoader};
