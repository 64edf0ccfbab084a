//! Note, edge and relationship-slot model.
//!
//! # Responsibility
//! - Define the note record and its six typed relationship slots.
//! - Own filename normalization to the canonical `.md` suffix.
//!
//! # Invariants
//! - Relationship types form a closed set; unknown names are rejected.
//! - A `(type, target)` pair appears at most once per note when written
//!   through the mutation layer.

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Canonical suffix carried by every note identifier.
pub const NOTE_SUFFIX: &str = ".md";

/// Closed set of relationship kinds a note can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Prerequisites,
    RelatedConcepts,
    Extends,
    ExtendedBy,
    Alternatives,
    Examples,
}

impl RelationshipType {
    /// All kinds in persisted slot order.
    pub const ALL: [RelationshipType; 6] = [
        Self::Prerequisites,
        Self::RelatedConcepts,
        Self::Extends,
        Self::ExtendedBy,
        Self::Alternatives,
        Self::Examples,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prerequisites => "prerequisites",
            Self::RelatedConcepts => "related_concepts",
            Self::Extends => "extends",
            Self::ExtendedBy => "extended_by",
            Self::Alternatives => "alternatives",
            Self::Examples => "examples",
        }
    }

    /// Inverse kind maintained by the reconciliation pass.
    ///
    /// Only `extends` and `examples` are forward kinds; both map to
    /// `extended_by`.
    pub fn reconciled_inverse(self) -> Option<RelationshipType> {
        match self {
            Self::Extends | Self::Examples => Some(Self::ExtendedBy),
            _ => None,
        }
    }
}

impl Display for RelationshipType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = GraphError;

    fn from_str(value: &str) -> GraphResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| GraphError::InvalidRelationshipType(value.to_string()))
    }
}

/// Directed link from the owning note to `note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Target note filename.
    pub note: String,
    /// Free-text explanation of the link.
    pub why: String,
}

impl Edge {
    pub fn new(note: impl Into<String>, why: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            why: why.into(),
        }
    }
}

/// Six ordered edge lists, one per relationship kind.
///
/// Missing slots load as empty lists; unknown slot names fail to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relationships {
    #[serde(default)]
    pub prerequisites: Vec<Edge>,
    #[serde(default)]
    pub related_concepts: Vec<Edge>,
    #[serde(default)]
    pub extends: Vec<Edge>,
    #[serde(default)]
    pub extended_by: Vec<Edge>,
    #[serde(default)]
    pub alternatives: Vec<Edge>,
    #[serde(default)]
    pub examples: Vec<Edge>,
}

impl Relationships {
    pub fn get(&self, kind: RelationshipType) -> &[Edge] {
        match kind {
            RelationshipType::Prerequisites => &self.prerequisites,
            RelationshipType::RelatedConcepts => &self.related_concepts,
            RelationshipType::Extends => &self.extends,
            RelationshipType::ExtendedBy => &self.extended_by,
            RelationshipType::Alternatives => &self.alternatives,
            RelationshipType::Examples => &self.examples,
        }
    }

    pub fn get_mut(&mut self, kind: RelationshipType) -> &mut Vec<Edge> {
        match kind {
            RelationshipType::Prerequisites => &mut self.prerequisites,
            RelationshipType::RelatedConcepts => &mut self.related_concepts,
            RelationshipType::Extends => &mut self.extends,
            RelationshipType::ExtendedBy => &mut self.extended_by,
            RelationshipType::Alternatives => &mut self.alternatives,
            RelationshipType::Examples => &mut self.examples,
        }
    }

    /// Iterates slots in persisted order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (RelationshipType, &[Edge])> + '_ {
        RelationshipType::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    /// Returns whether an edge to `target` exists under `kind`.
    pub fn contains(&self, kind: RelationshipType, target: &str) -> bool {
        self.get(kind).iter().any(|edge| edge.note == target)
    }

    /// Drops every edge (any kind) pointing at `target`; returns how many.
    pub fn remove_target(&mut self, target: &str) -> usize {
        let mut removed = 0;
        for kind in RelationshipType::ALL {
            let slot = self.get_mut(kind);
            let before = slot.len();
            slot.retain(|edge| edge.note != target);
            removed += before - slot.len();
        }
        removed
    }

    /// Total number of edges across all slots.
    pub fn edge_count(&self) -> usize {
        self.iter().map(|(_, edges)| edges.len()).sum()
    }
}

/// One note entry of the graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, normalized to end with `.md`.
    pub filename: String,
    pub title: String,
    /// Display order only; no semantic ordering.
    pub tags: Vec<String>,
    pub summary: String,
    #[serde(default)]
    pub relationships: Relationships,
}

impl Note {
    /// Creates a note with all six relationship slots empty.
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        tags: Vec<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            tags,
            summary: summary.into(),
            relationships: Relationships::default(),
        }
    }
}

/// Appends the canonical `.md` suffix when it is missing.
pub fn normalize_filename(filename: &str) -> String {
    let trimmed = filename.trim();
    if trimmed.ends_with(NOTE_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{NOTE_SUFFIX}")
    }
}

/// Returns the identifier without its `.md` suffix, as used in `[[wikilinks]]`.
pub fn wikilink_stem(filename: &str) -> &str {
    filename.strip_suffix(NOTE_SUFFIX).unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::{normalize_filename, wikilink_stem, Edge, RelationshipType, Relationships};
    use crate::error::GraphError;

    #[test]
    fn relationship_type_parses_all_known_names() {
        for kind in RelationshipType::ALL {
            assert_eq!(kind.as_str().parse::<RelationshipType>().unwrap(), kind);
        }
    }

    #[test]
    fn relationship_type_rejects_unknown_name() {
        let err = "Extends".parse::<RelationshipType>().unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationshipType(value) if value == "Extends"));
    }

    #[test]
    fn only_forward_kinds_have_reconciled_inverse() {
        assert_eq!(
            RelationshipType::Examples.reconciled_inverse(),
            Some(RelationshipType::ExtendedBy)
        );
        assert_eq!(RelationshipType::Prerequisites.reconciled_inverse(), None);
        assert_eq!(RelationshipType::ExtendedBy.reconciled_inverse(), None);
    }

    #[test]
    fn remove_target_clears_every_slot() {
        let mut relationships = Relationships::default();
        relationships.prerequisites.push(Edge::new("b.md", "x"));
        relationships.examples.push(Edge::new("b.md", "y"));
        relationships.examples.push(Edge::new("c.md", "z"));

        assert_eq!(relationships.remove_target("b.md"), 2);
        assert_eq!(relationships.edge_count(), 1);
        assert!(relationships.contains(RelationshipType::Examples, "c.md"));
    }

    #[test]
    fn filename_normalization_is_idempotent() {
        assert_eq!(normalize_filename("agents"), "agents.md");
        assert_eq!(normalize_filename("agents.md"), "agents.md");
        assert_eq!(wikilink_stem("agents.md"), "agents");
        assert_eq!(wikilink_stem("agents"), "agents");
    }
}
