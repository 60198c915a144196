//! Canonical logging macros

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use proptrail_core::log_op_start;
/// log_op_start!("handle_event");
/// log_op_start!("handle_event", subject_id = "doc-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use proptrail_core::log_op_end;
/// log_op_end!("handle_event", duration_ms = 3);
/// log_op_end!("handle_event", duration_ms = 3, descriptor_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an [`ExError`](crate::errors::ExError) so the
/// event always carries a stable `err.code`. A request id attached with
/// `ExError::with_request_id` is logged as `request_id`.
///
/// # Example
///
/// ```
/// # use proptrail_core::{log_op_error, errors::AuditError};
/// let err = AuditError::PropertyNotFound { path: "dc:title".to_string() };
/// log_op_error!("handle_event", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            request_id = ex_err.request_id().map(|id| id.as_str()),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::proptrail_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            request_id = ex_err.request_id().map(|id| id.as_str()),
            $($field)*
        );
    }};
}
