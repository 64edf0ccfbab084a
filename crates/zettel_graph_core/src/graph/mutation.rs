//! Note, batch and relationship mutations.
//!
//! # Responsibility
//! - Insert notes and batch memberships without duplicates.
//! - Remove notes together with every reference to them.
//! - Add edges, optionally with their inverse, and reconcile missing inverses.
//! - Edit note title, tags and summary.
//!
//! # Invariants
//! - Errors are raised before the document is touched.
//! - An edge `(kind, target)` appears at most once per note.

use crate::error::{GraphError, GraphResult};
use crate::graph::lookup::{find_batch_mut, find_note, find_note_mut, BatchRef};
use crate::model::document::GraphDocument;
use crate::model::note::{Edge, Note, RelationshipType, Relationships};
use log::{debug, info};

/// Builds a note entry without touching any document.
///
/// When `relationships` is `None` all six slots start empty.
pub fn create_note(
    filename: impl Into<String>,
    title: impl Into<String>,
    tags: Vec<String>,
    summary: impl Into<String>,
    relationships: Option<Relationships>,
) -> Note {
    let mut note = Note::new(filename, title, tags, summary);
    if let Some(relationships) = relationships {
        note.relationships = relationships;
    }
    note
}

/// Appends `note` unless its filename is already taken.
///
/// Returns `false` (document unchanged) for a duplicate filename.
pub fn add_note(document: &mut GraphDocument, note: Note) -> bool {
    if find_note(&document.notes, &note.filename).is_some() {
        debug!(
            "event=note_add module=graph status=skip reason=duplicate filename={}",
            note.filename
        );
        return false;
    }
    info!(
        "event=note_add module=graph status=ok filename={} edges={}",
        note.filename,
        note.relationships.edge_count()
    );
    document.notes.push(note);
    true
}

/// Lists `filename` in the batch selected by `batch`.
///
/// # Errors
/// - `BatchNotFound` when no batch matches the key.
///
/// Returns `false` when the batch already lists the filename.
pub fn add_note_to_batch(
    document: &mut GraphDocument,
    filename: &str,
    batch: &BatchRef,
) -> GraphResult<bool> {
    let target = find_batch_mut(&mut document.batches, batch)
        .ok_or_else(|| GraphError::BatchNotFound(batch.to_string()))?;
    let added = target.push_unique(filename);
    debug!(
        "event=batch_add module=graph status={} filename={} batch={}",
        if added { "ok" } else { "skip" },
        filename,
        target.name
    );
    Ok(added)
}

/// Removes a note and cascades over batches and every other note's edges.
///
/// Returns `false` when no note has that filename.
pub fn remove_note(document: &mut GraphDocument, filename: &str) -> bool {
    let Some(index) = document
        .notes
        .iter()
        .position(|note| note.filename == filename)
    else {
        debug!("event=note_remove module=graph status=skip reason=missing filename={filename}");
        return false;
    };
    document.notes.remove(index);

    let mut batch_refs = 0;
    for batch in &mut document.batches {
        let before = batch.notes.len();
        batch.notes.retain(|entry| entry != filename);
        batch_refs += before - batch.notes.len();
    }

    let edge_refs: usize = document
        .notes
        .iter_mut()
        .map(|note| note.relationships.remove_target(filename))
        .sum();

    info!(
        "event=note_remove module=graph status=ok filename={filename} batch_refs={batch_refs} edge_refs={edge_refs}"
    );
    true
}

/// Validated request for `add_relationship`.
///
/// `inverse` set means the link is bidirectional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipType,
    pub why: String,
    pub inverse: Option<RelationshipType>,
}

impl NewRelationship {
    /// One-directional link `source --kind--> target`.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipType,
        why: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            why: why.into(),
            inverse: None,
        }
    }

    /// Also adds `target --inverse--> source` when the forward edge is new.
    pub fn with_inverse(mut self, inverse: RelationshipType) -> Self {
        self.inverse = Some(inverse);
        self
    }

    /// Builds a request from untyped input, as a front end receives it.
    ///
    /// # Errors
    /// - `InvalidRelationshipType` for `kind` or `inverse` outside the set.
    /// - `MissingInverseType` when `bidirectional` is set without `inverse`.
    pub fn parse(
        source: &str,
        target: &str,
        kind: &str,
        why: &str,
        bidirectional: bool,
        inverse: Option<&str>,
    ) -> GraphResult<Self> {
        let request = Self::new(source, target, kind.parse()?, why);
        if !bidirectional {
            return Ok(request);
        }
        let inverse = inverse.ok_or(GraphError::MissingInverseType)?;
        Ok(request.with_inverse(inverse.parse()?))
    }
}

/// Adds `source --kind--> target`, plus the inverse edge when requested.
///
/// # Errors
/// - `NoteNotFound` when either endpoint is missing.
///
/// Returns `false` without touching the inverse side when the forward edge
/// already exists. The inverse edge copies the forward `why` verbatim and is
/// skipped if the target already links back under that kind.
pub fn add_relationship(
    document: &mut GraphDocument,
    request: &NewRelationship,
) -> GraphResult<bool> {
    let source_index = note_index(document, &request.source)?;
    let target_index = note_index(document, &request.target)?;

    let source = &mut document.notes[source_index];
    if source.relationships.contains(request.kind, &request.target) {
        debug!(
            "event=relationship_add module=graph status=skip reason=duplicate source={} kind={} target={}",
            request.source, request.kind, request.target
        );
        return Ok(false);
    }
    source
        .relationships
        .get_mut(request.kind)
        .push(Edge::new(request.target.as_str(), request.why.as_str()));

    let mut inverse_added = false;
    if let Some(inverse) = request.inverse {
        let target = &mut document.notes[target_index];
        if !target.relationships.contains(inverse, &request.source) {
            target
                .relationships
                .get_mut(inverse)
                .push(Edge::new(request.source.as_str(), request.why.as_str()));
            inverse_added = true;
        }
    }

    info!(
        "event=relationship_add module=graph status=ok source={} kind={} target={} inverse_added={}",
        request.source, request.kind, request.target, inverse_added
    );
    Ok(true)
}

/// Ensures every `extends`/`examples` edge A->B has `extended_by` B->A.
///
/// Edges to missing notes are ignored. Returns the number of inverse edges
/// created; a second run in a row returns zero.
pub fn establish_bidirectional_relationships(document: &mut GraphDocument) -> usize {
    let mut pending = Vec::new();
    for note in &document.notes {
        for (kind, edges) in note.relationships.iter() {
            let Some(inverse) = kind.reconciled_inverse() else {
                continue;
            };
            for edge in edges {
                pending.push((
                    edge.note.clone(),
                    inverse,
                    Edge::new(note.filename.as_str(), edge.why.as_str()),
                ));
            }
        }
    }

    let mut added = 0;
    for (target, inverse, back_edge) in pending {
        let Some(target_note) = find_note_mut(&mut document.notes, &target) else {
            continue;
        };
        if target_note.relationships.contains(inverse, &back_edge.note) {
            continue;
        }
        target_note.relationships.get_mut(inverse).push(back_edge);
        added += 1;
    }

    info!("event=bidirectional_reconcile module=graph status=ok added={added}");
    added
}

/// Partial edit of a note's display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub summary: Option<String>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.tags.is_none() && self.summary.is_none()
    }
}

/// One applied field edit with its previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteChange {
    Title { old: String, new: String },
    Tags { old: Vec<String>, new: Vec<String> },
    Summary { old: String, new: String },
}

impl NoteChange {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Tags { .. } => "tags",
            Self::Summary { .. } => "summary",
        }
    }
}

/// Applies the given fields to an existing note.
///
/// # Errors
/// - `NoteNotFound` when `filename` does not resolve.
///
/// Returns the applied changes in `title, tags, summary` order.
pub fn update_note(
    document: &mut GraphDocument,
    filename: &str,
    update: NoteUpdate,
) -> GraphResult<Vec<NoteChange>> {
    let note = find_note_mut(&mut document.notes, filename)
        .ok_or_else(|| GraphError::NoteNotFound(filename.to_string()))?;

    let mut changes = Vec::new();
    if let Some(title) = update.title {
        let old = std::mem::replace(&mut note.title, title.clone());
        changes.push(NoteChange::Title { old, new: title });
    }
    if let Some(tags) = update.tags {
        let old = std::mem::replace(&mut note.tags, tags.clone());
        changes.push(NoteChange::Tags { old, new: tags });
    }
    if let Some(summary) = update.summary {
        let old = std::mem::replace(&mut note.summary, summary.clone());
        changes.push(NoteChange::Summary { old, new: summary });
    }

    info!(
        "event=note_update module=graph status=ok filename={filename} fields={}",
        changes
            .iter()
            .map(NoteChange::field)
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(changes)
}

fn note_index(document: &GraphDocument, filename: &str) -> GraphResult<usize> {
    document
        .notes
        .iter()
        .position(|note| note.filename == filename)
        .ok_or_else(|| GraphError::NoteNotFound(filename.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{create_note, NewRelationship, NoteUpdate};
    use crate::error::GraphError;
    use crate::model::note::{Edge, RelationshipType, Relationships};

    #[test]
    fn create_note_defaults_to_empty_slots() {
        let note = create_note("a.md", "A", vec!["x".to_string()], "s", None);
        assert_eq!(note.relationships, Relationships::default());
        assert_eq!(note.relationships.edge_count(), 0);
    }

    #[test]
    fn create_note_keeps_supplied_relationships() {
        let mut relationships = Relationships::default();
        relationships.extends.push(Edge::new("b.md", "builds on b"));
        let note = create_note("a.md", "A", Vec::new(), "s", Some(relationships.clone()));
        assert_eq!(note.relationships, relationships);
    }

    #[test]
    fn parse_rejects_unknown_forward_type() {
        let err = NewRelationship::parse("a.md", "b.md", "parent", "x", false, None).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationshipType(value) if value == "parent"));
    }

    #[test]
    fn parse_rejects_unknown_inverse_type() {
        let err = NewRelationship::parse("a.md", "b.md", "extends", "x", true, Some("child"))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationshipType(value) if value == "child"));
    }

    #[test]
    fn parse_requires_inverse_when_bidirectional() {
        let err = NewRelationship::parse("a.md", "b.md", "extends", "x", true, None).unwrap_err();
        assert!(matches!(err, GraphError::MissingInverseType));
    }

    #[test]
    fn parse_ignores_inverse_when_one_directional() {
        let request =
            NewRelationship::parse("a.md", "b.md", "extends", "x", false, Some("extended_by"))
                .unwrap();
        assert_eq!(request.kind, RelationshipType::Extends);
        assert_eq!(request.inverse, None);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(NoteUpdate::default().is_empty());
        let update = NoteUpdate {
            summary: Some("new".to_string()),
            ..NoteUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
