//! Change descriptor assembly and value formatting.

use chrono::Local;
use std::fmt::Write as _;

use crate::config::{AuditConfig, TimeZoneSetting};
use crate::model::{
    ChangeDescriptor, ScalarValue, TriggerContext, CATEGORY_DOCUMENT, EVENT_PROPERTY_MODIFICATION,
};
use crate::snapshot::normalize_path;

/// Builds descriptors for one triggering event
///
/// Identity fields come verbatim from the [`TriggerContext`]; formatting
/// rules come from the [`AuditConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    config: &'a AuditConfig,
    context: &'a TriggerContext,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(config: &'a AuditConfig, context: &'a TriggerContext) -> Self {
        Self { config, context }
    }

    /// Build a descriptor with the default `<path> : <old> -> <new>` comment
    pub fn build(
        &self,
        path: &str,
        old: Option<&ScalarValue>,
        new: Option<&ScalarValue>,
    ) -> ChangeDescriptor {
        let field_path = normalize_path(path);
        let old_value = self.format_value(old);
        let new_value = self.format_value(new);
        let comment = format!("{} : {} -> {}", field_path, old_value, new_value);
        self.assemble(field_path, old_value, new_value, comment)
    }

    /// Build a descriptor with a caller-supplied comment
    pub fn build_with_comment(
        &self,
        path: &str,
        old: Option<&ScalarValue>,
        new: Option<&ScalarValue>,
        comment: String,
    ) -> ChangeDescriptor {
        let old_value = self.format_value(old);
        let new_value = self.format_value(new);
        self.assemble(normalize_path(path), old_value, new_value, comment)
    }

    /// Render a value the way it appears in `old_value` / `new_value`
    ///
    /// Absent values become the configured empty token, dates use the
    /// configured pattern and zone, everything else its canonical string.
    pub fn format_value(&self, value: Option<&ScalarValue>) -> String {
        match value {
            None => self.config.empty_value.clone(),
            Some(ScalarValue::Date(date)) => {
                let mut out = String::new();
                let written = match self.config.time_zone {
                    TimeZoneSetting::Local => write!(
                        out,
                        "{}",
                        date.with_timezone(&Local).format(&self.config.date_pattern)
                    ),
                    TimeZoneSetting::Fixed(offset) => write!(
                        out,
                        "{}",
                        date.with_timezone(&offset).format(&self.config.date_pattern)
                    ),
                };
                match written {
                    Ok(()) => out,
                    Err(_) => date.to_rfc3339(),
                }
            }
            Some(other) => other.to_string(),
        }
    }

    fn assemble(
        &self,
        field_path: &str,
        old_value: String,
        new_value: String,
        comment: String,
    ) -> ChangeDescriptor {
        ChangeDescriptor {
            event_kind: EVENT_PROPERTY_MODIFICATION.to_string(),
            timestamp: self.context.event_time,
            category: CATEGORY_DOCUMENT.to_string(),
            subject_id: self.context.subject_id.clone(),
            subject_lifecycle_state: self.context.lifecycle_state.clone(),
            actor_name: self.context.actor_name.clone(),
            origin_id: self.context.origin_id.clone(),
            field_path: field_path.to_string(),
            old_value,
            new_value,
            comment,
        }
    }
}
