//! Host events delivered to the listener.

use chrono::{DateTime, Utc};
use proptrail_core::Document;
use proptrail_core_types::RequestContext;

/// Context of an event raised against a document
#[derive(Debug, Clone)]
pub struct DocumentEventContext {
    /// The modified document, carrying dirty flags
    pub document: Document,
    pub principal_name: String,
    pub repository_name: String,
}

#[derive(Debug, Clone)]
pub enum EventContext {
    Document(DocumentEventContext),
    /// Anything not attached to a document
    Other,
}

/// A named host event
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub name: String,
    pub time: DateTime<Utc>,
    pub context: EventContext,
    pub request: RequestContext,
}

impl AuditEvent {
    /// An event raised against a document, timestamped now
    pub fn for_document(
        name: impl Into<String>,
        document: Document,
        principal_name: impl Into<String>,
        repository_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            time: Utc::now(),
            context: EventContext::Document(DocumentEventContext {
                document,
                principal_name: principal_name.into(),
                repository_name: repository_name.into(),
            }),
            request: RequestContext::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }
}
