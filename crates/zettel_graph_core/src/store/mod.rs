//! Whole-document persistence for the graph JSON file.
//!
//! # Responsibility
//! - Parse and render the persisted text form.
//! - Load and save the full document; there is no partial path.
//!
//! # Invariants
//! - A failed load never yields a partial document.
//! - Rendering is deterministic for an unchanged document.

mod codec;

pub use codec::{load, parse_document, render_document, save};
