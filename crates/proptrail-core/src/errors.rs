use proptrail_core_types::RequestId;
use thiserror::Error;

use crate::model::Shape;

/// Result type alias using AuditError
pub type Result<T> = std::result::Result<T, AuditError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    InvalidPath,
    NotFound,
    /// A before/after pair disagrees on a field's shape
    ShapeMismatch,

    // Wiring
    /// A required collaborator (log sink, snapshot loader) is not available
    MissingCollaborator,
    InvalidConfig,

    // Integration
    Serialization,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ShapeMismatch => "ERR_SHAPE_MISMATCH",
            ExErrorKind::MissingCollaborator => "ERR_MISSING_COLLABORATOR",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus free-form context
/// for debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (the audited record)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add field path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised while diffing snapshots and submitting entries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    /// The before-snapshot has no node at a path reported dirty on the after-snapshot
    #[error("Property not found in snapshot: {path}")]
    PropertyNotFound { path: String },

    /// No before-snapshot could be loaded for the record
    #[error("Snapshot not found for subject: {subject_id}")]
    SnapshotNotFound { subject_id: String },

    /// The two snapshots disagree on a field's shape
    #[error("Shape mismatch at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: Shape,
        found: Shape,
    },

    #[error("Invalid property path: {path}")]
    InvalidPath { path: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A collaborator the pass depends on was not wired in
    #[error("Missing collaborator: {name}")]
    MissingCollaborator { name: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The log sink rejected a batch
    #[error("Log sink failure: {message}")]
    Sink { message: String },
}

impl From<AuditError> for ExError {
    fn from(err: AuditError) -> Self {
        let message = err.to_string();
        match err {
            AuditError::PropertyNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_message(message),
            AuditError::SnapshotNotFound { subject_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(subject_id)
                .with_message(message),
            AuditError::ShapeMismatch { path, .. } => ExError::new(ExErrorKind::ShapeMismatch)
                .with_path(path)
                .with_message(message),
            AuditError::InvalidPath { path } => ExError::new(ExErrorKind::InvalidPath)
                .with_path(path)
                .with_message(message),
            AuditError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            AuditError::MissingCollaborator { .. } => {
                ExError::new(ExErrorKind::MissingCollaborator).with_message(message)
            }
            AuditError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            AuditError::Sink { .. } => ExError::new(ExErrorKind::Persistence).with_message(message),
        }
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Serialization {
            message: err.to_string(),
        }
    }
}
