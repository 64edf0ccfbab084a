//! Operations over one exclusively held graph document.
//!
//! # Responsibility
//! - Lookup, mutation, integrity checking, metadata and statistics.
//! - Identifier rename sweep across notes, batches and edges.
//!
//! # Invariants
//! - Every operation takes the document by `&` or `&mut`; nothing is shared.
//! - Duplicate inserts are `false` results, not errors.
//! - Validation reports findings and never fails.

pub mod integrity;
pub mod lookup;
pub mod metadata;
pub mod mutation;
pub mod rename;
pub mod stats;

pub use integrity::{validate, ValidationReport};
pub use lookup::{
    find_batch, find_batch_by_name, find_batch_by_number, find_batch_mut, find_note,
    find_note_mut, BatchRef,
};
pub use metadata::{increment_minor_version, update_metadata, MetadataUpdate, DATE_FORMAT};
pub use mutation::{
    add_note, add_note_to_batch, add_relationship, create_note,
    establish_bidirectional_relationships, remove_note, update_note, NewRelationship, NoteChange,
    NoteUpdate,
};
pub use rename::rename_note_references;
pub use stats::{get_statistics, GraphStatistics};
