//! Property diff engine.
//!
//! Compares the dirty fields of an "after" snapshot with their counterparts
//! in the "before" snapshot and produces one [`ChangeDescriptor`] per leaf
//! modification.
//!
//! ## Entry point
//!
//! ```ignore
//! use proptrail_core::diff::DiffEngine;
//!
//! let engine = DiffEngine::new(&config, &context);
//! let batch = engine.diff_document(&before, &after)?;
//! proptrail_core::sink::submit_batch(&sink, batch)?;
//! ```
//!
//! ## Guarantees
//!
//! - **One branch per node**: classification is a `match` over the node's
//!   [`PropertyKind`](crate::model::PropertyKind).
//! - **Records are transparent**: only their dirty leaves produce entries.
//! - **List deltas are membership-based**: added entries precede removed ones.
//! - **Attachments report filenames**, never payloads.
//! - **System fields are never reported** by `diff_document`.
//!
//! [`ChangeDescriptor`]: crate::model::ChangeDescriptor

pub mod builder;
pub mod engine;
pub mod list_delta;

pub use builder::DescriptorBuilder;
pub use engine::DiffEngine;
pub use list_delta::{list_delta, ListDelta};
