//! Before-snapshot loading.

use std::collections::HashMap;

use proptrail_core::{AuditError, Document, Result};

/// Fetches the persisted state of a record as it was before the pending
/// modification
pub trait SnapshotLoader {
    /// # Errors
    ///
    /// Returns `SnapshotNotFound` if nothing is stored for `subject_id`.
    fn load_before(&self, subject_id: &str) -> Result<Document>;
}

/// Loader over documents held in memory, keyed by document id
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotLoader {
    documents: HashMap<String, Document>,
}

impl InMemorySnapshotLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `document` under its own id, replacing any previous version
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id().to_string(), document);
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.insert(document);
        self
    }
}

impl SnapshotLoader for InMemorySnapshotLoader {
    fn load_before(&self, subject_id: &str) -> Result<Document> {
        let mut document = self
            .documents
            .get(subject_id)
            .cloned()
            .ok_or_else(|| AuditError::SnapshotNotFound {
                subject_id: subject_id.to_string(),
            })?;
        document.clear_dirty();
        Ok(document)
    }
}
