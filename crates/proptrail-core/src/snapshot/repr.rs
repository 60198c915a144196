//! Serialized form of a [`Document`]
//!
//! ```json
//! {
//!   "id": "doc-1",
//!   "lifecycle_state": "project",
//!   "schemas": [
//!     { "name": "dublincore", "properties": [
//!       { "name": "dc:title", "type": "scalar", "value": "Report" },
//!       { "name": "dc:subjects", "type": "scalar_list", "value": ["science"] },
//!       { "name": "dc:issued", "type": "scalar", "value": { "date": "2016-03-17T10:00:00+00:00" } }
//!     ]},
//!     { "name": "file", "properties": [
//!       { "name": "content", "type": "attachment", "value": { "filename": "text.txt" } }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Top-level field names are unique across all schemas of a document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuditError;
use crate::model::{PropertyKind, PropertyNode, Shape};
use crate::snapshot::document::{Document, SchemaGroup};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DocumentRepr {
    id: String,
    #[serde(default)]
    lifecycle_state: String,
    #[serde(default)]
    schemas: Vec<SchemaRepr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaRepr {
    name: String,
    #[serde(default)]
    properties: Vec<NodeRepr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRepr {
    name: String,
    #[serde(rename = "type")]
    shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeRepr>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    dirty: bool,
}

fn decode<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Result<Option<T>, AuditError> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(AuditError::from)
}

impl TryFrom<NodeRepr> for PropertyNode {
    type Error = AuditError;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        if repr.shape != Shape::Record && !repr.children.is_empty() {
            return Err(AuditError::Serialization {
                message: format!("{} field `{}` cannot have children", repr.shape, repr.name),
            });
        }

        let kind = match repr.shape {
            Shape::Scalar => PropertyKind::Scalar(decode(repr.value)?),
            Shape::ScalarList => PropertyKind::ScalarList(decode(repr.value)?),
            Shape::Attachment => PropertyKind::Attachment(decode(repr.value)?),
            Shape::Record => {
                if repr.value.is_some() {
                    return Err(AuditError::Serialization {
                        message: format!(
                            "record field `{}` takes `children`, not `value`",
                            repr.name
                        ),
                    });
                }
                let children = repr
                    .children
                    .into_iter()
                    .map(PropertyNode::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                PropertyKind::Record(children)
            }
        };

        Ok(PropertyNode::new(repr.name, kind).with_dirty(repr.dirty))
    }
}

impl From<PropertyNode> for NodeRepr {
    fn from(node: PropertyNode) -> Self {
        let shape = node.shape();
        let (value, children) = match node.kind {
            PropertyKind::Scalar(v) => (v.and_then(|v| serde_json::to_value(v).ok()), vec![]),
            PropertyKind::ScalarList(v) => (v.and_then(|v| serde_json::to_value(v).ok()), vec![]),
            PropertyKind::Attachment(v) => (v.and_then(|v| serde_json::to_value(v).ok()), vec![]),
            PropertyKind::Record(children) => {
                (None, children.into_iter().map(NodeRepr::from).collect())
            }
        };
        NodeRepr {
            name: node.name,
            shape,
            value,
            children,
            dirty: node.dirty,
        }
    }
}

impl TryFrom<DocumentRepr> for Document {
    type Error = AuditError;

    fn try_from(repr: DocumentRepr) -> Result<Self, Self::Error> {
        let mut doc = Document::new(repr.id, repr.lifecycle_state);
        let mut seen = HashSet::new();
        for schema in repr.schemas {
            let properties = schema
                .properties
                .into_iter()
                .map(PropertyNode::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            for node in &properties {
                if !seen.insert(node.name().to_string()) {
                    return Err(AuditError::Serialization {
                        message: format!(
                            "field `{}` declared more than once (schema `{}`)",
                            node.name(),
                            schema.name
                        ),
                    });
                }
            }
            doc = doc.with_schema(SchemaGroup::new(schema.name, properties));
        }
        Ok(doc)
    }
}

impl From<Document> for DocumentRepr {
    fn from(doc: Document) -> Self {
        DocumentRepr {
            id: doc.id,
            lifecycle_state: doc.lifecycle_state,
            schemas: doc
                .schemas
                .into_iter()
                .map(|group| SchemaRepr {
                    name: group.name,
                    properties: group.properties.into_iter().map(NodeRepr::from).collect(),
                })
                .collect(),
        }
    }
}
