//! Change descriptors: the audit entries produced by a diff pass.

use chrono::{DateTime, Utc};
use proptrail_core_types::schema::{EXT_FIELD_NAME, EXT_NEW_VALUE, EXT_OLD_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event kind carried by every entry this crate produces
pub const EVENT_PROPERTY_MODIFICATION: &str = "Property Modification";

/// Category carried by every entry this crate produces
pub const CATEGORY_DOCUMENT: &str = "Document";

/// One detected leaf-level modification
///
/// Built only by [`DescriptorBuilder`](crate::diff::DescriptorBuilder) and
/// read-only afterwards. Old and new values are already formatted strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    pub(crate) event_kind: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) category: String,
    pub(crate) subject_id: String,
    pub(crate) subject_lifecycle_state: String,
    pub(crate) actor_name: String,
    pub(crate) origin_id: String,
    pub(crate) field_path: String,
    pub(crate) old_value: String,
    pub(crate) new_value: String,
    pub(crate) comment: String,
}

impl ChangeDescriptor {
    pub fn event_kind(&self) -> &str {
        &self.event_kind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn subject_lifecycle_state(&self) -> &str {
        &self.subject_lifecycle_state
    }

    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    pub fn origin_id(&self) -> &str {
        &self.origin_id
    }

    /// Normalized path (no leading slash)
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    pub fn old_value(&self) -> &str {
        &self.old_value
    }

    pub fn new_value(&self) -> &str {
        &self.new_value
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The `fieldname` / `oldValue` / `newValue` map an audit backend stores
    /// as extended info next to the entry.
    pub fn extended_info(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (EXT_FIELD_NAME, self.field_path.as_str()),
            (EXT_OLD_VALUE, self.old_value.as_str()),
            (EXT_NEW_VALUE, self.new_value.as_str()),
        ])
    }
}
