//! Error taxonomy for graph document operations.
//!
//! # Responsibility
//! - Give every core failure a semantic variant callers can match on.
//! - Keep duplicate no-ops out of the error path (those return `false`).
//!
//! # Invariants
//! - Operations that return an error leave the in-memory document unmodified
//!   for the attempted step.
//! - Validation findings are never reported through this type.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type GraphResult<T> = Result<T, GraphError>;

/// Failure raised by codec, mutation, rename and vault operations.
#[derive(Debug)]
pub enum GraphError {
    /// Persisted text is not valid JSON or misses required structure.
    MalformedDocument(String),
    /// Filesystem access failed for the given path.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Referenced note filename does not resolve.
    NoteNotFound(String),
    /// Referenced batch (by name or number) does not resolve.
    BatchNotFound(String),
    /// Relationship type outside the closed set of six.
    InvalidRelationshipType(String),
    /// Bidirectional add requested without an inverse type.
    MissingInverseType,
    /// Version text is not dotted decimal, or a bump cannot be applied to it.
    InvalidVersion(String),
    /// Metadata field update carries a value of the wrong shape.
    InvalidMetadataField { key: String, reason: String },
    /// Target identifier is already taken.
    NoteAlreadyExists(String),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDocument(details) => write!(f, "malformed graph document: {details}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::NoteNotFound(filename) => write!(f, "note not found: {filename}"),
            Self::BatchNotFound(batch) => write!(f, "batch not found: {batch}"),
            Self::InvalidRelationshipType(value) => write!(
                f,
                "invalid relationship type `{value}`; expected one of prerequisites, \
                 related_concepts, extends, extended_by, alternatives, examples"
            ),
            Self::MissingInverseType => {
                write!(f, "inverse type is required for a bidirectional relationship")
            }
            Self::InvalidVersion(value) => write!(f, "invalid version `{value}`"),
            Self::InvalidMetadataField { key, reason } => {
                write!(f, "invalid metadata field `{key}`: {reason}")
            }
            Self::NoteAlreadyExists(filename) => write!(f, "note already exists: {filename}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedDocument(value.to_string())
    }
}
