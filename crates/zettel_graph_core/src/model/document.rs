//! Graph document root aggregate.
//!
//! # Responsibility
//! - Define the persisted shape: `metadata`, `batches`, `notes`.
//! - Keep metadata typed where the tooling depends on a field, free-form
//!   everywhere else.
//!
//! # Invariants
//! - `notes` keeps insertion order; there is no sort key.
//! - A batch note list never holds the same filename twice when written
//!   through `Batch::push_unique`.

use crate::error::{GraphError, GraphResult};
use crate::model::note::Note;
use crate::model::version::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Document-level bookkeeping record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: Version,
    /// Declared count; validated against `notes.len()`.
    pub total_notes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form extension fields, rendered in key order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            total_notes: 0,
            last_updated: None,
            description: None,
            extra: Map::new(),
        }
    }

    /// Writes one named field, routing typed keys to their typed slot.
    ///
    /// Last write wins. `null` clears the optional text fields.
    pub fn set_field(&mut self, key: &str, value: Value) -> GraphResult<()> {
        let invalid = |reason: &str| GraphError::InvalidMetadataField {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "version" => {
                self.version =
                    serde_json::from_value(value).map_err(|err| invalid(&err.to_string()))?;
            }
            "total_notes" => {
                let count = value
                    .as_u64()
                    .ok_or_else(|| invalid("expected a non-negative integer"))?;
                self.total_notes =
                    usize::try_from(count).map_err(|_| invalid("count does not fit in usize"))?;
            }
            "last_updated" => self.last_updated = optional_text(value).map_err(|r| invalid(r))?,
            "description" => self.description = optional_text(value).map_err(|r| invalid(r))?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }
}

fn optional_text(value: Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        _ => Err("expected a string or null"),
    }
}

/// Named group of notes with an alternate numeric key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_number: i64,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Batch {
    pub fn new(batch_number: i64, name: impl Into<String>) -> Self {
        Self {
            batch_number,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.notes.iter().any(|entry| entry == filename)
    }

    /// Appends `filename` unless present; returns whether it was appended.
    pub fn push_unique(&mut self, filename: &str) -> bool {
        if self.contains(filename) {
            return false;
        }
        self.notes.push(filename.to_string());
        true
    }
}

/// Whole persisted graph, loaded and saved as one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub metadata: Metadata,
    pub batches: Vec<Batch>,
    pub notes: Vec<Note>,
}

impl GraphDocument {
    /// Creates a document with no batches and no notes.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            batches: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Set of every note filename present in the document.
    pub fn note_filenames(&self) -> HashSet<&str> {
        self.notes.iter().map(|note| note.filename.as_str()).collect()
    }
}
