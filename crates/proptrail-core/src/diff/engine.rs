//! Recursive property diff.
//!
//! The core entry point is [`DiffEngine::diff_document`], which walks the
//! dirty top-level fields of an "after" snapshot and pairs each with its
//! counterpart in the "before" snapshot by path.

use crate::config::AuditConfig;
use crate::diff::builder::DescriptorBuilder;
use crate::diff::list_delta::list_delta;
use crate::errors::{AuditError, Result};
use crate::model::{ChangeDescriptor, PropertyKind, PropertyNode, ScalarValue, TriggerContext};
use crate::snapshot::{normalize_path, FieldEnumerator};

/// Diff engine for one triggering event
///
/// Holds no state beyond borrowed configuration and trigger identity, so a
/// fresh engine per event is free.
#[derive(Debug, Clone, Copy)]
pub struct DiffEngine<'a> {
    config: &'a AuditConfig,
    builder: DescriptorBuilder<'a>,
}

impl<'a> DiffEngine<'a> {
    pub fn new(config: &'a AuditConfig, context: &'a TriggerContext) -> Self {
        Self {
            config,
            builder: DescriptorBuilder::new(config, context),
        }
    }

    pub fn builder(&self) -> &DescriptorBuilder<'a> {
        &self.builder
    }

    /// Diff every dirty, non-excluded top-level field of `after`
    ///
    /// Descriptors come out in schema order, then field order within a
    /// schema, then recursive order within a field.
    ///
    /// # Errors
    ///
    /// - `PropertyNotFound` if `before` lacks a field that is dirty in `after`
    /// - `ShapeMismatch` if the two snapshots disagree on a field's shape
    pub fn diff_document<B, A>(&self, before: &B, after: &A) -> Result<Vec<ChangeDescriptor>>
    where
        B: FieldEnumerator + ?Sized,
        A: FieldEnumerator + ?Sized,
    {
        let mut out = Vec::new();
        for schema in after.schemas() {
            for node in after.properties(schema) {
                if self.config.is_excluded(node.name()) {
                    tracing::debug!(field = node.name(), "skipping system field");
                    continue;
                }
                if !node.is_dirty() {
                    continue;
                }
                let counterpart = lookup(before, node)?;
                self.diff_into(before, counterpart, node, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Diff one dirty node against its before-snapshot counterpart
    ///
    /// `before_root` resolves the counterparts of dirty children when
    /// `after` is a record.
    ///
    /// # Errors
    ///
    /// Same as [`DiffEngine::diff_document`].
    pub fn diff<B>(
        &self,
        before_root: &B,
        before: &PropertyNode,
        after: &PropertyNode,
    ) -> Result<Vec<ChangeDescriptor>>
    where
        B: FieldEnumerator + ?Sized,
    {
        let mut out = Vec::new();
        self.diff_into(before_root, before, after, &mut out)?;
        Ok(out)
    }

    fn diff_into<B>(
        &self,
        before_root: &B,
        before: &PropertyNode,
        after: &PropertyNode,
        out: &mut Vec<ChangeDescriptor>,
    ) -> Result<()>
    where
        B: FieldEnumerator + ?Sized,
    {
        match (before.kind(), after.kind()) {
            (PropertyKind::Scalar(old), PropertyKind::Scalar(new)) => {
                out.push(self.builder.build(before.path(), old.as_ref(), new.as_ref()));
            }
            (PropertyKind::Record(_), PropertyKind::Record(_)) => {
                for child in after.dirty_children() {
                    let counterpart = lookup(before_root, child)?;
                    self.diff_into(before_root, counterpart, child, out)?;
                }
            }
            (PropertyKind::Attachment(old), PropertyKind::Attachment(new)) => {
                let old = old
                    .as_ref()
                    .and_then(|b| b.filename.clone())
                    .map(ScalarValue::String);
                let new = new
                    .as_ref()
                    .and_then(|b| b.filename.clone())
                    .map(ScalarValue::String);
                out.push(self.builder.build(before.path(), old.as_ref(), new.as_ref()));
            }
            (PropertyKind::ScalarList(old), PropertyKind::ScalarList(new)) => {
                self.diff_list(before.path(), old.as_deref(), new.as_deref(), out);
            }
            _ => {
                return Err(AuditError::ShapeMismatch {
                    path: normalize_path(after.path()).to_string(),
                    expected: before.shape(),
                    found: after.shape(),
                });
            }
        }
        Ok(())
    }

    fn diff_list(
        &self,
        path: &str,
        old: Option<&[ScalarValue]>,
        new: Option<&[ScalarValue]>,
        out: &mut Vec<ChangeDescriptor>,
    ) {
        let field_path = normalize_path(path);
        let delta = list_delta(old, new);

        for added in delta.added {
            let comment = format!(
                "{} : Added {}",
                field_path,
                self.builder.format_value(Some(added))
            );
            out.push(
                self.builder
                    .build_with_comment(field_path, None, Some(added), comment),
            );
        }

        for removed in delta.removed {
            let comment = format!(
                "{} : Removed {}",
                field_path,
                self.builder.format_value(Some(removed))
            );
            out.push(
                self.builder
                    .build_with_comment(field_path, Some(removed), None, comment),
            );
        }
    }
}

fn lookup<'r, B>(before_root: &'r B, after: &PropertyNode) -> Result<&'r PropertyNode>
where
    B: FieldEnumerator + ?Sized,
{
    before_root
        .property(after.path())
        .ok_or_else(|| AuditError::PropertyNotFound {
            path: normalize_path(after.path()).to_string(),
        })
}
