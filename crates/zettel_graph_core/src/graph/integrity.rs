//! Whole-document integrity checks.
//!
//! # Responsibility
//! - Report count drift, dangling batch entries and dangling edges.
//! - Report `extends`/`examples` edges missing their `extended_by` inverse.
//!
//! # Invariants
//! - Checks run in a fixed order and every finding is kept.
//! - Validation never mutates the document and never fails.

use crate::graph::lookup::find_note;
use crate::model::document::GraphDocument;
use crate::model::note::RelationshipType;
use log::{debug, warn};

/// Findings of one read-only integrity pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Human-readable findings in check order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks cross-references and inverse-edge consistency.
///
/// Every failure is collected; the pass always completes:
/// 1. `metadata.total_notes` equals the note count.
/// 2. Every batch entry names an existing note.
/// 3. Every edge targets an existing note.
/// 4. Every `extends`/`examples` edge A->B has an `extended_by` edge B->A.
pub fn validate(document: &GraphDocument) -> ValidationReport {
    let mut errors = Vec::new();

    let actual = document.notes.len();
    let declared = document.metadata.total_notes;
    if actual != declared {
        errors.push(format!(
            "Metadata total_notes ({declared}) doesn't match actual count ({actual})"
        ));
    }

    let filenames = document.note_filenames();

    for batch in &document.batches {
        for filename in &batch.notes {
            if !filenames.contains(filename.as_str()) {
                errors.push(format!(
                    "Batch '{}' references non-existent note: {filename}",
                    batch.name
                ));
            }
        }
    }

    for note in &document.notes {
        for (kind, edges) in note.relationships.iter() {
            for edge in edges {
                if !filenames.contains(edge.note.as_str()) {
                    errors.push(format!(
                        "Note '{}' has {kind} relationship to non-existent note: {}",
                        note.filename, edge.note
                    ));
                }
            }
        }
    }

    for note in &document.notes {
        for kind in [RelationshipType::Extends, RelationshipType::Examples] {
            let Some(inverse) = kind.reconciled_inverse() else {
                continue;
            };
            for edge in note.relationships.get(kind) {
                let Some(target) = find_note(&document.notes, &edge.note) else {
                    continue;
                };
                if !target.relationships.contains(inverse, &note.filename) {
                    errors.push(format!(
                        "Note '{}' {kind} '{}' but inverse {inverse} not found",
                        note.filename, edge.note
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        debug!(
            "event=graph_validate module=graph status=ok notes={}",
            document.notes.len()
        );
    } else {
        warn!(
            "event=graph_validate module=graph status=error notes={} errors={}",
            document.notes.len(),
            errors.len()
        );
    }
    ValidationReport { errors }
}
