//! Graph document domain model.
//!
//! # Responsibility
//! - Define the persisted aggregate (`GraphDocument`) and its parts.
//! - Keep the relationship vocabulary closed and typed.
//!
//! # Invariants
//! - `Note::filename` is the primary key across the document.
//! - Edges and batch memberships have no lifecycle of their own.

pub mod document;
pub mod note;
pub mod version;
