//! Canonical schema constants for structured logging and audit entries
//!
//! Log field keys are shared by the logging macros; the extended-info keys
//! name the entries an audit backend stores alongside each change descriptor.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Audit subject
pub const FIELD_SUBJECT_ID: &str = "subject_id";
pub const FIELD_EVENT_NAME: &str = "event_name";

// Batch sizes
pub const FIELD_DESCRIPTOR_COUNT: &str = "descriptor_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Extended-info keys carried by every property modification entry
pub const EXT_FIELD_NAME: &str = "fieldname";
pub const EXT_OLD_VALUE: &str = "oldValue";
pub const EXT_NEW_VALUE: &str = "newValue";
