//! Record and audit-entry model
//!
//! - [`PropertyNode`]: one field of a record snapshot, with its shape and value
//! - [`ScalarValue`] / [`BlobRef`]: leaf values
//! - [`ChangeDescriptor`]: one normalized audit entry
//! - [`TriggerContext`]: identity copied from the triggering event

pub mod context;
pub mod descriptor;
pub mod node;
pub mod value;

pub use context::TriggerContext;
pub use descriptor::{ChangeDescriptor, CATEGORY_DOCUMENT, EVENT_PROPERTY_MODIFICATION};
pub use node::{PropertyKind, PropertyNode, Shape};
pub use value::{BlobRef, ScalarValue};
