//! Core library for Zettelkasten-style note graph documents.
//! This crate owns the document shape and every consistency rule over it.

pub mod error;
pub mod graph;
pub mod logging;
pub mod model;
pub mod store;
pub mod vault;

pub use error::{GraphError, GraphResult};
pub use graph::{
    add_note, add_note_to_batch, add_relationship, create_note,
    establish_bidirectional_relationships, find_batch, find_batch_by_name, find_batch_by_number,
    find_note, get_statistics, increment_minor_version, remove_note, rename_note_references,
    update_metadata, update_note, validate, BatchRef, GraphStatistics, MetadataUpdate,
    NewRelationship, NoteChange, NoteUpdate, ValidationReport,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Batch, GraphDocument, Metadata};
pub use model::note::{normalize_filename, wikilink_stem, Edge, Note, RelationshipType, Relationships};
pub use model::version::Version;
pub use vault::{create_backup, Vault, WikilinkUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
