//! Exact-match lookups by note filename and batch reference.

use crate::model::document::Batch;
use crate::model::note::Note;
use std::fmt::{Display, Formatter};

/// Unambiguous batch key: callers pick name or number, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchRef {
    Name(String),
    Number(i64),
}

impl BatchRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl Display for BatchRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Number(number) => write!(f, "#{number}"),
        }
    }
}

/// First note whose filename matches exactly.
pub fn find_note<'a>(notes: &'a [Note], filename: &str) -> Option<&'a Note> {
    notes.iter().find(|note| note.filename == filename)
}

pub fn find_note_mut<'a>(notes: &'a mut [Note], filename: &str) -> Option<&'a mut Note> {
    notes.iter_mut().find(|note| note.filename == filename)
}

pub fn find_batch_by_name<'a>(batches: &'a [Batch], name: &str) -> Option<&'a Batch> {
    batches.iter().find(|batch| batch.name == name)
}

pub fn find_batch_by_number(batches: &[Batch], number: i64) -> Option<&Batch> {
    batches.iter().find(|batch| batch.batch_number == number)
}

/// Dispatches to the name or number lookup; first match wins.
pub fn find_batch<'a>(batches: &'a [Batch], key: &BatchRef) -> Option<&'a Batch> {
    match key {
        BatchRef::Name(name) => find_batch_by_name(batches, name),
        BatchRef::Number(number) => find_batch_by_number(batches, *number),
    }
}

pub fn find_batch_mut<'a>(batches: &'a mut [Batch], key: &BatchRef) -> Option<&'a mut Batch> {
    batches.iter_mut().find(|batch| match key {
        BatchRef::Name(name) => batch.name == *name,
        BatchRef::Number(number) => batch.batch_number == *number,
    })
}
