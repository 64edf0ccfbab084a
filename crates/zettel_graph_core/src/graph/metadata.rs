//! Metadata record updates and the two version disciplines.
//!
//! # Responsibility
//! - Apply major bump, note count, description and named fields together.
//! - Provide the minor bump used by note editing.
//!
//! # Invariants
//! - A failed update leaves `document.metadata` as it was.

use crate::error::GraphResult;
use crate::model::document::GraphDocument;
use crate::model::version::Version;
use chrono::NaiveDate;
use log::info;
use serde_json::Value;

/// Date layout used for `metadata.last_updated`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Settings for one `update_metadata` call.
///
/// `Default` bumps the major version and refreshes the note count, which is
/// what note-adding workflows want.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataUpdate {
    pub increment_version: bool,
    pub update_note_count: bool,
    pub description: Option<String>,
    /// Extra named fields, applied in order after everything else.
    pub fields: Vec<(String, Value)>,
}

impl Default for MetadataUpdate {
    fn default() -> Self {
        Self {
            increment_version: true,
            update_note_count: true,
            description: None,
            fields: Vec::new(),
        }
    }
}

impl MetadataUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves `version` untouched.
    pub fn keep_version(mut self) -> Self {
        self.increment_version = false;
        self
    }

    /// Leaves `total_notes` untouched.
    pub fn keep_note_count(mut self) -> Self {
        self.update_note_count = false;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn last_updated(self, date: NaiveDate) -> Self {
        self.field("last_updated", Value::String(date.format(DATE_FORMAT).to_string()))
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.push((key.into(), value));
        self
    }
}

/// Applies `update` to the document metadata.
///
/// A major bump rewrites `version` as `(major+1).0`. The update is staged on
/// a copy, so a rejected field leaves the metadata unchanged.
///
/// # Errors
/// - `InvalidMetadataField` when a named field has the wrong value shape.
/// - `InvalidVersion` when the major component cannot be incremented.
pub fn update_metadata(document: &mut GraphDocument, update: &MetadataUpdate) -> GraphResult<()> {
    let mut metadata = document.metadata.clone();

    if update.increment_version {
        metadata.version = metadata.version.bump_major()?;
    }
    if update.update_note_count {
        metadata.total_notes = document.notes.len();
    }
    if let Some(description) = &update.description {
        metadata.description = Some(description.clone());
    }
    for (key, value) in &update.fields {
        metadata.set_field(key, value.clone())?;
    }

    info!(
        "event=metadata_update module=graph status=ok version={} total_notes={} fields={}",
        metadata.version,
        metadata.total_notes,
        update.fields.len()
    );
    document.metadata = metadata;
    Ok(())
}

/// Minor-update discipline of the note-editing workflow: adds one tenth.
///
/// Returns `(previous, current)`.
///
/// # Errors
/// - `InvalidVersion` when the version has no decimal value (`1.2.3`) or
///   the major component overflows; the version is left unchanged.
pub fn increment_minor_version(document: &mut GraphDocument) -> GraphResult<(Version, Version)> {
    let current = document.metadata.version.bump_minor()?;
    let previous = std::mem::replace(&mut document.metadata.version, current.clone());
    Ok((previous, current))
}

#[cfg(test)]
mod tests {
    use super::{increment_minor_version, update_metadata, MetadataUpdate};
    use crate::error::GraphError;
    use crate::model::document::{GraphDocument, Metadata};
    use crate::model::note::Note;
    use crate::model::version::Version;
    use chrono::NaiveDate;
    use serde_json::json;

    fn document_with_version(version: Version) -> GraphDocument {
        let mut document = GraphDocument::new(Metadata::new(version));
        document.notes.push(Note::new("a.md", "A", Vec::new(), ""));
        document
    }

    #[test]
    fn default_update_bumps_major_and_counts_notes() {
        let mut document = document_with_version(Version::new(3, 1));
        update_metadata(&mut document, &MetadataUpdate::new()).unwrap();
        assert_eq!(document.metadata.version.to_string(), "4.0");
        assert_eq!(document.metadata.total_notes, 1);
    }

    #[test]
    fn keep_flags_leave_fields_alone() {
        let mut document = document_with_version(Version::new(3, 0));
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let update = MetadataUpdate::new()
            .keep_version()
            .keep_note_count()
            .description("Added a.md")
            .last_updated(date)
            .field("forward_pass_batches_complete", json!(4));
        update_metadata(&mut document, &update).unwrap();

        assert_eq!(document.metadata.version, Version::new(3, 0));
        assert_eq!(document.metadata.total_notes, 0);
        assert_eq!(document.metadata.description.as_deref(), Some("Added a.md"));
        assert_eq!(document.metadata.last_updated.as_deref(), Some("2026-10-16"));
        assert_eq!(
            document.metadata.extra.get("forward_pass_batches_complete"),
            Some(&json!(4))
        );
    }

    #[test]
    fn rejected_field_leaves_metadata_unchanged() {
        let mut document = document_with_version(Version::new(2, 0));
        let update = MetadataUpdate::new().field("last_updated", json!(17));
        assert!(update_metadata(&mut document, &update).is_err());
        assert_eq!(document.metadata.version, Version::new(2, 0));
        assert_eq!(document.metadata.total_notes, 0);
    }

    #[test]
    fn later_field_wins_on_collision() {
        let mut document = document_with_version(Version::new(2, 0));
        let update = MetadataUpdate::new()
            .keep_version()
            .field("phase", json!("forward"))
            .field("phase", json!("backward"));
        update_metadata(&mut document, &update).unwrap();
        assert_eq!(document.metadata.extra.get("phase"), Some(&json!("backward")));
    }

    #[test]
    fn minor_increment_then_major_increment_is_explicit() {
        let mut document = document_with_version(Version::new(3, 0));
        let (previous, current) = increment_minor_version(&mut document).unwrap();
        assert_eq!(previous.to_string(), "3.0");
        assert_eq!(current.to_string(), "3.1");

        update_metadata(&mut document, &MetadataUpdate::new()).unwrap();
        assert_eq!(document.metadata.version.to_string(), "4.0");
    }

    #[test]
    fn minor_increment_uses_decimal_value_of_multi_digit_minor() {
        let mut document = document_with_version("3.10".parse().unwrap());
        let (previous, current) = increment_minor_version(&mut document).unwrap();
        assert_eq!(previous.to_string(), "3.10");
        assert_eq!(current.to_string(), "3.2");
    }

    #[test]
    fn minor_increment_failure_keeps_version() {
        let mut document = document_with_version("1.2.3".parse().unwrap());
        let err = increment_minor_version(&mut document).unwrap_err();
        assert!(matches!(err, GraphError::InvalidVersion(_)));
        assert_eq!(document.metadata.version.to_string(), "1.2.3");

        update_metadata(&mut document, &MetadataUpdate::new()).unwrap();
        assert_eq!(document.metadata.version.to_string(), "2.0");
    }

    #[test]
    fn major_overflow_is_rejected_without_changes() {
        let mut document = document_with_version(Version::new(u32::MAX, 0));
        let err = update_metadata(&mut document, &MetadataUpdate::new()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidVersion(_)));
        assert_eq!(document.metadata.total_notes, 0);
    }
}
