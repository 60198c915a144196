//! Core types shared across proptrail facilities
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names used by the
//!   logging macros and the audit descriptors

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
