//! Audit listener with boundary logging.
//!
//! ## Logging Ownership
//!
//! The listener owns lifecycle logging for `handle_event`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure or a missing sink
//!
//! The diff engine and snapshot adapter below use only `tracing::debug!()`.

use std::time::Instant;

use proptrail_core::{
    log_op_end, log_op_error, log_op_start, submit_batch, AuditConfig, AuditError, DiffEngine,
    ExError, LogSink, Result, TriggerContext,
};
use proptrail_core_types::TraceId;

use crate::event::{AuditEvent, DocumentEventContext, EventContext};
use crate::loader::SnapshotLoader;

const OP_HANDLE_EVENT: &str = "handle_event";

/// What a call to [`AuditListener::handle_event`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerOutcome {
    /// Event name not handled, or not a document event
    Ignored,
    /// No sink wired; nothing was diffed
    SinkUnavailable,
    /// Diff ran and found nothing to report; the sink was not called
    NoChanges,
    /// One batch with this many entries went to the sink
    Submitted(usize),
}

/// Turns document modification events into property audit entries
pub struct AuditListener<'a> {
    config: &'a AuditConfig,
    loader: &'a dyn SnapshotLoader,
    sink: Option<&'a dyn LogSink>,
}

impl<'a> AuditListener<'a> {
    /// A listener without a sink; every handled event reports
    /// [`ListenerOutcome::SinkUnavailable`] until one is wired
    pub fn new(config: &'a AuditConfig, loader: &'a dyn SnapshotLoader) -> Self {
        Self {
            config,
            loader,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: &'a dyn LogSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Handle one host event
    ///
    /// ## Errors
    ///
    /// - `SnapshotNotFound`: the loader has no before-snapshot
    /// - `PropertyNotFound` / `ShapeMismatch`: the snapshots disagree
    /// - `Sink`: the sink rejected the batch
    ///
    /// Nothing is submitted when an error is returned.
    pub fn handle_event(&self, event: &AuditEvent) -> Result<ListenerOutcome> {
        if !self.config.handles_event(&event.name) {
            tracing::debug!(event_name = %event.name, "event not handled");
            return Ok(ListenerOutcome::Ignored);
        }
        let EventContext::Document(doc_ctx) = &event.context else {
            tracing::debug!(event_name = %event.name, "not a document event");
            return Ok(ListenerOutcome::Ignored);
        };

        log_op_start!(
            OP_HANDLE_EVENT,
            request_id = event.request.request_id.as_str(),
            trace_id = event.request.trace_id.as_ref().map(TraceId::as_str),
            subject_id = doc_ctx.document.id(),
            event_name = event.name.as_str()
        );
        let start = Instant::now();

        let Some(sink) = self.sink else {
            log_op_error!(
                OP_HANDLE_EVENT,
                boundary_error(
                    AuditError::MissingCollaborator {
                        name: "log sink".to_string()
                    },
                    event,
                    doc_ctx
                ),
                duration_ms = start.elapsed().as_millis() as u64,
                subject_id = doc_ctx.document.id()
            );
            return Ok(ListenerOutcome::SinkUnavailable);
        };

        let submitted = self.process_document(event, doc_ctx, sink).map_err(|e| {
            log_op_error!(
                OP_HANDLE_EVENT,
                boundary_error(e.clone(), event, doc_ctx),
                duration_ms = start.elapsed().as_millis() as u64,
                subject_id = doc_ctx.document.id()
            );
            e
        })?;

        log_op_end!(
            OP_HANDLE_EVENT,
            duration_ms = start.elapsed().as_millis() as u64,
            descriptor_count = submitted
        );

        Ok(if submitted == 0 {
            ListenerOutcome::NoChanges
        } else {
            ListenerOutcome::Submitted(submitted)
        })
    }

    fn process_document(
        &self,
        event: &AuditEvent,
        doc_ctx: &DocumentEventContext,
        sink: &dyn LogSink,
    ) -> Result<usize> {
        let after = &doc_ctx.document;
        let before = self.loader.load_before(after.id())?;

        let trigger = TriggerContext::new(
            event.time,
            doc_ctx.principal_name.as_str(),
            after.id(),
            after.lifecycle_state(),
            doc_ctx.repository_name.as_str(),
        );
        let batch = DiffEngine::new(self.config, &trigger).diff_document(&before, after)?;
        submit_batch(sink, batch)
    }
}

fn boundary_error(err: AuditError, event: &AuditEvent, doc_ctx: &DocumentEventContext) -> ExError {
    ExError::from(err)
        .with_op(OP_HANDLE_EVENT)
        .with_entity_id(doc_ctx.document.id())
        .with_request_id(event.request.request_id.clone())
}
