//! Identifier rename sweep inside the graph document.

use crate::error::{GraphError, GraphResult};
use crate::graph::lookup::find_note;
use crate::model::document::GraphDocument;
use crate::model::note::{normalize_filename, RelationshipType};
use log::info;

/// Rewrites every occurrence of note identifier `old` to `new`.
///
/// Both identifiers are normalized to the `.md` suffix first. Touches the
/// note's own `filename`, each batch list holding it, and every edge target.
/// Returns the number of rewritten references: one per batch, one for the
/// note itself, one per edge.
///
/// # Errors
/// - `NoteNotFound` when `old` is not in the document.
/// - `NoteAlreadyExists` when `new` is already taken.
pub fn rename_note_references(
    document: &mut GraphDocument,
    old: &str,
    new: &str,
) -> GraphResult<usize> {
    let old = normalize_filename(old);
    let new = normalize_filename(new);
    if find_note(&document.notes, &old).is_none() {
        return Err(GraphError::NoteNotFound(old));
    }
    if find_note(&document.notes, &new).is_some() {
        return Err(GraphError::NoteAlreadyExists(new));
    }

    let mut count = 0;
    for batch in &mut document.batches {
        let mut touched = false;
        for entry in batch.notes.iter_mut().filter(|entry| **entry == old) {
            *entry = new.clone();
            touched = true;
        }
        if touched {
            count += 1;
        }
    }

    for note in &mut document.notes {
        if note.filename == old {
            note.filename = new.clone();
            count += 1;
        }
        for kind in RelationshipType::ALL {
            for edge in note
                .relationships
                .get_mut(kind)
                .iter_mut()
                .filter(|edge| edge.note == old)
            {
                edge.note = new.clone();
                count += 1;
            }
        }
    }

    info!("event=note_rename module=graph status=ok old={old} new={new} references={count}");
    Ok(count)
}
