//! In-memory record snapshot with dirty tracking.

use serde::{Deserialize, Serialize};

use crate::errors::{AuditError, Result};
use crate::model::{PropertyKind, PropertyNode};
use crate::snapshot::enumerator::{normalize_path, FieldEnumerator};
use crate::snapshot::repr::DocumentRepr;

/// A named group of top-level fields (a schema)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup {
    pub(crate) name: String,
    pub(crate) properties: Vec<PropertyNode>,
}

impl SchemaGroup {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyNode>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PropertyNode] {
        &self.properties
    }
}

/// A record snapshot: identity, lifecycle state and ordered schema groups
///
/// Two ways to get dirty flags onto an "after" document:
/// - [`Document::set_property`] while editing a copy of the before-snapshot
/// - [`Document::track_changes`] when both snapshots arrive fully formed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    pub(crate) id: String,
    pub(crate) lifecycle_state: String,
    pub(crate) schemas: Vec<SchemaGroup>,
}

impl Document {
    pub fn new(id: impl Into<String>, lifecycle_state: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lifecycle_state: lifecycle_state.into(),
            schemas: Vec::new(),
        }
    }

    pub fn with_schema(mut self, group: SchemaGroup) -> Self {
        self.schemas.push(group);
        self
    }

    /// Parse a document from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the JSON is malformed or a field's value does
    /// not fit its declared type.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lifecycle_state(&self) -> &str {
        &self.lifecycle_state
    }

    pub fn set_lifecycle_state(&mut self, state: impl Into<String>) {
        self.lifecycle_state = state.into();
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaGroup> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// True if any top-level field is dirty
    pub fn is_dirty(&self) -> bool {
        self.schemas
            .iter()
            .flat_map(|s| s.properties.iter())
            .any(PropertyNode::is_dirty)
    }

    /// Replace the value at `path`
    ///
    /// A leaf whose value actually changes becomes dirty, as do all of its
    /// ancestors. Setting a record merges the given children into the
    /// existing ones by name; children not mentioned are left untouched.
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for an empty path or empty segment
    /// - `PropertyNotFound` if a segment does not resolve
    /// - `ShapeMismatch` if `kind` has a different shape than the field
    pub fn set_property(&mut self, path: &str, kind: PropertyKind) -> Result<bool> {
        let segments = split_path(path)?;
        let (first, rest) = segments
            .split_first()
            .ok_or_else(|| AuditError::InvalidPath {
                path: path.to_string(),
            })?;
        let top = self
            .schemas
            .iter_mut()
            .flat_map(|s| s.properties.iter_mut())
            .find(|p| p.name == *first)
            .ok_or_else(|| AuditError::PropertyNotFound {
                path: normalize_path(path).to_string(),
            })?;
        set_in(top, rest, kind)
    }

    /// Set dirty flags by comparing every field against `before`
    ///
    /// Returns the number of dirty top-level fields.
    ///
    /// # Errors
    ///
    /// - `PropertyNotFound` if `before` lacks a field present here
    /// - `ShapeMismatch` if the two snapshots disagree on a field's shape
    pub fn track_changes(&mut self, before: &Document) -> Result<usize> {
        let mut dirty = 0;
        for group in &mut self.schemas {
            for node in &mut group.properties {
                let counterpart =
                    before
                        .property(&node.path)
                        .ok_or_else(|| AuditError::PropertyNotFound {
                            path: normalize_path(&node.path).to_string(),
                        })?;
                if mark_against(node, counterpart)? {
                    dirty += 1;
                }
            }
        }
        tracing::debug!(subject_id = %self.id, dirty_fields = dirty, "tracked changes");
        Ok(dirty)
    }

    /// Forget all change tracking
    pub fn clear_dirty(&mut self) {
        for group in &mut self.schemas {
            for node in &mut group.properties {
                node.clear_dirty();
            }
        }
    }
}

impl FieldEnumerator for Document {
    fn schemas(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    fn properties(&self, schema: &str) -> &[PropertyNode] {
        self.schema(schema).map(SchemaGroup::properties).unwrap_or(&[])
    }

    fn property(&self, path: &str) -> Option<&PropertyNode> {
        let segments = split_path(path).ok()?;
        let (first, rest) = segments.split_first()?;
        let top = self
            .schemas
            .iter()
            .flat_map(|s| s.properties.iter())
            .find(|p| p.name == *first)?;
        rest.iter().try_fold(top, |node, name| node.child(name))
    }
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let normalized = normalize_path(path);
    let segments: Vec<&str> = normalized.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(AuditError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

fn set_in(node: &mut PropertyNode, rest: &[&str], kind: PropertyKind) -> Result<bool> {
    let Some((next, tail)) = rest.split_first() else {
        return assign(node, kind);
    };
    let parent_path = node.path.clone();
    let child = node
        .child_mut(next)
        .ok_or_else(|| AuditError::PropertyNotFound {
            path: normalize_path(&format!("{}/{}", parent_path, next)).to_string(),
        })?;
    let changed = set_in(child, tail, kind)?;
    if changed {
        node.dirty = true;
    }
    Ok(changed)
}

fn assign(node: &mut PropertyNode, kind: PropertyKind) -> Result<bool> {
    if node.shape() != kind.shape() {
        return Err(AuditError::ShapeMismatch {
            path: normalize_path(&node.path).to_string(),
            expected: node.shape(),
            found: kind.shape(),
        });
    }

    let changed = match kind {
        PropertyKind::Record(children) => {
            let mut changed = false;
            for incoming in children {
                let parent_path = node.path.clone();
                let target = node.child_mut(&incoming.name).ok_or_else(|| {
                    AuditError::PropertyNotFound {
                        path: normalize_path(&format!("{}/{}", parent_path, incoming.name))
                            .to_string(),
                    }
                })?;
                changed |= assign(target, incoming.kind)?;
            }
            changed
        }
        other => {
            if node.kind == other {
                false
            } else {
                node.kind = other;
                true
            }
        }
    };

    if changed {
        node.dirty = true;
    }
    Ok(changed)
}

fn mark_against(after: &mut PropertyNode, before: &PropertyNode) -> Result<bool> {
    if after.shape() != before.shape() {
        return Err(AuditError::ShapeMismatch {
            path: normalize_path(&after.path).to_string(),
            expected: before.shape(),
            found: after.shape(),
        });
    }

    let dirty = match &mut after.kind {
        PropertyKind::Record(children) => {
            let mut any = false;
            for child in children.iter_mut() {
                let counterpart =
                    before
                        .child(&child.name)
                        .ok_or_else(|| AuditError::PropertyNotFound {
                            path: normalize_path(&child.path).to_string(),
                        })?;
                any |= mark_against(child, counterpart)?;
            }
            any
        }
        kind => *kind != before.kind,
    };

    after.dirty = dirty;
    Ok(dirty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlobRef, ScalarValue, Shape};

    fn sample() -> Document {
        Document::new("doc-1", "project")
            .with_schema(SchemaGroup::new(
                "dublincore",
                vec![
                    PropertyNode::scalar("dc:title", None),
                    PropertyNode::scalar_list("dc:subjects", None),
                ],
            ))
            .with_schema(SchemaGroup::new(
                "test",
                vec![PropertyNode::record(
                    "test:complex",
                    vec![
                        PropertyNode::scalar("string", None),
                        PropertyNode::scalar_list("stringlist", None),
                    ],
                )],
            ))
            .with_schema(SchemaGroup::new(
                "file",
                vec![PropertyNode::attachment("content", None)],
            ))
    }

    #[test]
    fn test_property_lookup_by_path() {
        let doc = sample();
        assert_eq!(doc.property("dc:title").map(|n| n.path()), Some("/dc:title"));
        assert_eq!(
            doc.property("/test:complex/string").map(|n| n.path()),
            Some("/test:complex/string")
        );
        assert!(doc.property("test:complex/missing").is_none());
        assert!(doc.property("").is_none());
    }

    #[test]
    fn test_schemas_and_properties() {
        let doc = sample();
        assert_eq!(doc.schemas(), vec!["dublincore", "test", "file"]);
        assert_eq!(doc.properties("dublincore").len(), 2);
        assert!(doc.properties("unknown").is_empty());
    }

    #[test]
    fn test_set_property_marks_ancestors_dirty() {
        let mut doc = sample();
        let changed = doc
            .set_property(
                "test:complex/string",
                PropertyKind::Scalar(Some(ScalarValue::from("x"))),
            )
            .unwrap();
        assert!(changed);

        let complex = doc.property("test:complex").unwrap();
        assert!(complex.is_dirty());
        let dirty: Vec<&str> = complex.dirty_children().map(|c| c.name()).collect();
        assert_eq!(dirty, vec!["string"]);
        assert!(!doc.property("dc:title").unwrap().is_dirty());
    }

    #[test]
    fn test_set_property_same_value_is_not_dirty() {
        let mut doc = sample();
        let changed = doc
            .set_property("dc:title", PropertyKind::Scalar(None))
            .unwrap();
        assert!(!changed);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_set_record_merges_children() {
        let mut doc = sample();
        doc.set_property(
            "test:complex",
            PropertyKind::Record(vec![PropertyNode::scalar(
                "string",
                Some("x".into()),
            )]),
        )
        .unwrap();
        let complex = doc.property("test:complex").unwrap();
        assert_eq!(complex.children().len(), 2);
        assert_eq!(complex.dirty_children().count(), 1);
    }

    #[test]
    fn test_set_property_rejects_shape_change() {
        let mut doc = sample();
        let err = doc
            .set_property("dc:subjects", PropertyKind::Scalar(Some("x".into())))
            .unwrap_err();
        assert_eq!(
            err,
            AuditError::ShapeMismatch {
                path: "dc:subjects".to_string(),
                expected: Shape::ScalarList,
                found: Shape::Scalar,
            }
        );
    }

    #[test]
    fn test_set_property_unknown_path() {
        let mut doc = sample();
        let err = doc
            .set_property("dc:nope", PropertyKind::Scalar(None))
            .unwrap_err();
        assert!(matches!(err, AuditError::PropertyNotFound { .. }));

        let err = doc
            .set_property("test:complex//string", PropertyKind::Scalar(None))
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidPath { .. }));
    }

    #[test]
    fn test_track_changes_compares_values() {
        let before = sample();
        let mut after = sample();
        after
            .set_property(
                "content",
                PropertyKind::Attachment(Some(BlobRef::named("text.txt"))),
            )
            .unwrap();
        after.clear_dirty();
        assert!(!after.is_dirty());

        let dirty = after.track_changes(&before).unwrap();
        assert_eq!(dirty, 1);
        assert!(after.property("content").unwrap().is_dirty());
        assert!(!after.property("dc:title").unwrap().is_dirty());
    }

    #[test]
    fn test_track_changes_requires_matching_fields() {
        let before = Document::new("doc-1", "project");
        let mut after = sample();
        let err = after.track_changes(&before).unwrap_err();
        assert_eq!(
            err,
            AuditError::PropertyNotFound {
                path: "dc:title".to_string()
            }
        );
    }

    #[test]
    fn test_json_form_round_trips_values_and_paths() {
        let raw = r#"{
            "id": "doc-1",
            "lifecycle_state": "project",
            "schemas": [
                { "name": "dublincore", "properties": [
                    { "name": "dc:title", "type": "scalar", "value": "Report" },
                    { "name": "dc:subjects", "type": "scalar_list", "value": ["science"] },
                    { "name": "dc:issued", "type": "scalar", "value": null }
                ]},
                { "name": "test", "properties": [
                    { "name": "test:complex", "type": "record", "children": [
                        { "name": "string", "type": "scalar" }
                    ]}
                ]}
            ]
        }"#;
        let doc = Document::from_json_str(raw).unwrap();
        assert_eq!(doc.id(), "doc-1");
        assert_eq!(
            doc.property("test:complex/string").unwrap().path(),
            "/test:complex/string"
        );
        assert_eq!(
            doc.property("dc:subjects").unwrap().kind(),
            &PropertyKind::ScalarList(Some(vec![ScalarValue::from("science")]))
        );

        let json = serde_json::to_string(&doc).unwrap();
        let back = Document::from_json_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_json_keeps_date_looking_strings_as_strings() {
        let date = chrono::DateTime::parse_from_rfc3339("2016-03-17T10:00:00Z").unwrap();
        let doc = Document::new("doc-1", "project").with_schema(SchemaGroup::new(
            "dublincore",
            vec![
                PropertyNode::scalar("dc:title", Some("2016-03-17T10:00:00Z".into())),
                PropertyNode::scalar("dc:issued", Some(ScalarValue::Date(date))),
            ],
        ));

        let json = serde_json::to_string(&doc).unwrap();
        let back = Document::from_json_str(&json).unwrap();

        assert_eq!(back, doc);
        assert_eq!(
            back.property("dc:title").unwrap().kind(),
            &PropertyKind::Scalar(Some(ScalarValue::String(
                "2016-03-17T10:00:00Z".to_string()
            )))
        );
        assert_eq!(
            back.property("dc:issued").unwrap().kind(),
            &PropertyKind::Scalar(Some(ScalarValue::Date(date)))
        );
    }

    #[test]
    fn test_json_rejects_duplicate_top_level_names() {
        let raw = r#"{ "id": "d", "schemas": [
            { "name": "a", "properties": [ { "name": "x", "type": "scalar" } ] },
            { "name": "b", "properties": [ { "name": "x", "type": "scalar_list" } ] }
        ]}"#;
        let err = Document::from_json_str(raw).unwrap_err();
        assert!(matches!(err, AuditError::Serialization { ref message } if message.contains("`x`")));
    }

    #[test]
    fn test_json_rejects_children_on_scalar() {
        let raw = r#"{ "id": "d", "schemas": [ { "name": "s", "properties": [
            { "name": "x", "type": "scalar", "children": [ { "name": "y", "type": "scalar" } ] }
        ]}]}"#;
        let err = Document::from_json_str(raw).unwrap_err();
        assert!(matches!(err, AuditError::Serialization { .. }));
    }
}
