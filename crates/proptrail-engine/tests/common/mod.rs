use chrono::{TimeZone, Utc};
use proptrail_core::{Document, PropertyNode, SchemaGroup};
use proptrail_engine::AuditEvent;

pub const MODIFIED: &str = "beforeDocumentModification";

/// Persisted state of `id` before any edit
#[allow(dead_code)]
pub fn stored_document(id: &str) -> Document {
    Document::new(id, "project")
        .with_schema(SchemaGroup::new(
            "dublincore",
            vec![
                PropertyNode::scalar("dc:title", Some("Report".into())),
                PropertyNode::scalar_list("dc:subjects", Some(vec!["science".into()])),
                PropertyNode::scalar("dc:modified", None),
            ],
        ))
        .with_schema(SchemaGroup::new(
            "file",
            vec![PropertyNode::attachment("content", None)],
        ))
}

/// A modification event for `document`, at a fixed time
#[allow(dead_code)]
pub fn modification_event(document: Document) -> AuditEvent {
    AuditEvent::for_document(MODIFIED, document, "Administrator", "default")
        .with_time(Utc.with_ymd_and_hms(2016, 3, 17, 9, 30, 0).unwrap())
}
