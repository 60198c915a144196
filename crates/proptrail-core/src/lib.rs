//! proptrail core - property-level audit trail construction
//!
//! Given a "before" and an "after" snapshot of a schema-typed record, this
//! crate produces one [`ChangeDescriptor`] per leaf-level modification:
//! - Record model with a closed set of property shapes
//! - Field enumeration over snapshots, with dirty tracking
//! - Recursive diff engine with list membership deltas
//! - Descriptor builder with value formatting and path normalization
//! - Log sink seam for batch hand-off

#[doc(hidden)]
pub use proptrail_core_types;

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod sink;
pub mod snapshot;

// Re-export commonly used types
pub use config::AuditConfig;
pub use diff::{DescriptorBuilder, DiffEngine};
pub use errors::{AuditError, ExError, ExErrorKind, Result};
pub use model::{BlobRef, ChangeDescriptor, PropertyKind, PropertyNode, ScalarValue, Shape, TriggerContext};
pub use sink::{submit_batch, InMemoryLogSink, JsonLinesSink, LogSink};
pub use snapshot::{Document, FieldEnumerator, SchemaGroup};
