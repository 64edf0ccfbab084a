//! Aggregate counts over a graph document.

use crate::model::document::GraphDocument;
use crate::model::note::RelationshipType;
use std::collections::BTreeMap;

/// Aggregate counts derived from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
    pub total_notes: usize,
    pub total_batches: usize,
    /// Edge count per kind; all six kinds are present, zero or not.
    pub relationship_counts: BTreeMap<RelationshipType, usize>,
    /// Tag -> number of notes listing it.
    pub tag_distribution: BTreeMap<String, usize>,
}

impl GraphStatistics {
    pub fn unique_tags(&self) -> usize {
        self.tag_distribution.len()
    }

    /// Most frequent tags first; ties broken by tag name.
    pub fn top_tags(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut tags: Vec<(&str, usize)> = self
            .tag_distribution
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        tags.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
        tags.truncate(limit);
        tags
    }
}

pub fn get_statistics(document: &GraphDocument) -> GraphStatistics {
    let mut relationship_counts: BTreeMap<RelationshipType, usize> = RelationshipType::ALL
        .into_iter()
        .map(|kind| (kind, 0))
        .collect();
    let mut tag_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for note in &document.notes {
        for (kind, edges) in note.relationships.iter() {
            *relationship_counts.entry(kind).or_default() += edges.len();
        }
        for tag in &note.tags {
            *tag_distribution.entry(tag.clone()).or_default() += 1;
        }
    }

    GraphStatistics {
        total_notes: document.notes.len(),
        total_batches: document.batches.len(),
        relationship_counts,
        tag_distribution,
    }
}
