use chrono::{TimeZone, Utc};
use proptrail_core::{Document, PropertyNode, SchemaGroup, TriggerContext};

/// Trigger context shared by the fixtures
#[allow(dead_code)]
pub fn trigger() -> TriggerContext {
    TriggerContext::new(
        Utc.with_ymd_and_hms(2016, 3, 17, 9, 30, 0).unwrap(),
        "Administrator",
        "doc-1",
        "project",
        "default",
    )
}

/// A document laid out like a typical file document
///
/// - `dublincore`: title, description, subjects, the four system fields
/// - `test`: a `complex` record holding a string and a string list, a date
/// - `file`: the `content` attachment
#[allow(dead_code)]
pub fn sample_document() -> Document {
    Document::new("doc-1", "project")
        .with_schema(SchemaGroup::new(
            "dublincore",
            vec![
                PropertyNode::scalar("dc:title", Some("Report".into())),
                PropertyNode::scalar("dc:description", None),
                PropertyNode::scalar_list("dc:subjects", None),
                PropertyNode::scalar("dc:created", None),
                PropertyNode::scalar("dc:creator", Some("Administrator".into())),
                PropertyNode::scalar("dc:modified", None),
                PropertyNode::scalar_list("dc:contributors", None),
            ],
        ))
        .with_schema(SchemaGroup::new(
            "test",
            vec![
                PropertyNode::record(
                    "test:complex",
                    vec![
                        PropertyNode::scalar("string", None),
                        PropertyNode::scalar_list("stringlist", None),
                    ],
                ),
                PropertyNode::scalar("test:date", None),
            ],
        ))
        .with_schema(SchemaGroup::new(
            "file",
            vec![PropertyNode::attachment("content", None)],
        ))
}
