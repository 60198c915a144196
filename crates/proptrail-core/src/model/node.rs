//! Property nodes
//!
//! A node's [`PropertyKind`] is the single source of truth for its shape:
//! each variant carries the value that shape allows, so a scalar can never
//! hold children and a record can never hold a scalar.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::value::{BlobRef, ScalarValue};

/// Payload-free tag of a [`PropertyKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Scalar,
    Record,
    ScalarList,
    Attachment,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shape::Scalar => "scalar",
            Shape::Record => "record",
            Shape::ScalarList => "scalar_list",
            Shape::Attachment => "attachment",
        };
        f.write_str(label)
    }
}

/// Shape and value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Scalar(Option<ScalarValue>),
    /// Nested, non-list record; the children are its sub-fields
    Record(Vec<PropertyNode>),
    ScalarList(Option<Vec<ScalarValue>>),
    Attachment(Option<BlobRef>),
}

impl PropertyKind {
    pub fn shape(&self) -> Shape {
        match self {
            PropertyKind::Scalar(_) => Shape::Scalar,
            PropertyKind::Record(_) => Shape::Record,
            PropertyKind::ScalarList(_) => Shape::ScalarList,
            PropertyKind::Attachment(_) => Shape::Attachment,
        }
    }
}

/// One field (or sub-field) of a record snapshot
///
/// `path` is assigned when the node is attached to a
/// [`Document`](crate::snapshot::Document): `/name` at the top level,
/// `/parent/name` below a record.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: PropertyKind,
    pub(crate) dirty: bool,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        let mut node = Self {
            name: name.into(),
            path: String::new(),
            kind,
            dirty: false,
        };
        node.assign_paths("");
        node
    }

    pub fn scalar(name: impl Into<String>, value: Option<ScalarValue>) -> Self {
        Self::new(name, PropertyKind::Scalar(value))
    }

    pub fn record(name: impl Into<String>, children: Vec<PropertyNode>) -> Self {
        Self::new(name, PropertyKind::Record(children))
    }

    pub fn scalar_list(name: impl Into<String>, values: Option<Vec<ScalarValue>>) -> Self {
        Self::new(name, PropertyKind::ScalarList(values))
    }

    pub fn attachment(name: impl Into<String>, blob: Option<BlobRef>) -> Self {
        Self::new(name, PropertyKind::Attachment(blob))
    }

    /// Mark this node dirty without touching its value
    ///
    /// Used by hosts whose change tracking is external to the value itself.
    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn shape(&self) -> Shape {
        self.kind.shape()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Direct children; empty for anything but a record
    pub fn children(&self) -> &[PropertyNode] {
        match &self.kind {
            PropertyKind::Record(children) => children,
            _ => &[],
        }
    }

    /// Children changed since the before-snapshot
    pub fn dirty_children(&self) -> impl Iterator<Item = &PropertyNode> {
        self.children().iter().filter(|c| c.dirty)
    }

    pub fn child(&self, name: &str) -> Option<&PropertyNode> {
        self.children().iter().find(|c| c.name == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut PropertyNode> {
        match &mut self.kind {
            PropertyKind::Record(children) => children.iter_mut().find(|c| c.name == name),
            _ => None,
        }
    }

    /// Re-root this node (and its subtree) under `parent_path`
    pub(crate) fn assign_paths(&mut self, parent_path: &str) {
        self.path = format!("{}/{}", parent_path, self.name);
        let path = self.path.clone();
        if let PropertyKind::Record(children) = &mut self.kind {
            for child in children {
                child.assign_paths(&path);
            }
        }
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
        if let PropertyKind::Record(children) = &mut self.kind {
            for child in children {
                child.clear_dirty();
            }
        }
    }
}
