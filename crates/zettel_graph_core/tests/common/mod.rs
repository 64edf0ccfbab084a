#![allow(dead_code)]

use zettel_graph_core::{Batch, GraphDocument, Metadata, Note, Version};

/// Empty document with a single batch `B1` at version 1.0.
pub fn empty_document() -> GraphDocument {
    let mut document = GraphDocument::new(Metadata::new(Version::new(1, 0)));
    document.batches.push(Batch::new(1, "B1"));
    document
}

pub fn note(filename: &str) -> Note {
    Note::new(filename, filename.trim_end_matches(".md").to_uppercase(), vec!["x".to_string()], "s")
}

/// Document holding the given notes, all listed in batch `B1`, with a
/// matching `total_notes`.
pub fn document_with(filenames: &[&str]) -> GraphDocument {
    let mut document = empty_document();
    for filename in filenames {
        document.notes.push(note(filename));
        document.batches[0].notes.push(filename.to_string());
    }
    document.metadata.total_notes = document.notes.len();
    document
}
