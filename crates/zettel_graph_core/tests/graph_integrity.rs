mod common;

use common::document_with;
use zettel_graph_core::{
    get_statistics, update_metadata, validate, Edge, MetadataUpdate, RelationshipType,
};

#[test]
fn consistent_document_validates() {
    let mut document = document_with(&["a.md", "b.md"]);
    document.notes[0]
        .relationships
        .extends
        .push(Edge::new("b.md", "x"));
    document.notes[1]
        .relationships
        .extended_by
        .push(Edge::new("a.md", "x"));

    let report = validate(&document);
    assert!(report.is_valid(), "{:?}", report.errors);
}

#[test]
fn dangling_edge_is_reported_by_name() {
    let mut document = document_with(&["a.md"]);
    document.notes[0]
        .relationships
        .related_concepts
        .push(Edge::new("ghost.md", "missing"));

    let report = validate(&document);
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("ghost.md"));
    assert!(report.errors[0].contains("related_concepts"));
}

#[test]
fn all_findings_are_accumulated() {
    let mut document = document_with(&["a.md", "b.md"]);
    document.metadata.total_notes = 7;
    document.batches[0].notes.push("lost.md".to_string());
    document.notes[0]
        .relationships
        .extends
        .push(Edge::new("b.md", "no inverse"));
    document.notes[1]
        .relationships
        .examples
        .push(Edge::new("a.md", "no inverse either"));

    let report = validate(&document);
    assert_eq!(report.errors.len(), 4, "{:?}", report.errors);
    assert!(report.errors[0].contains("total_notes (7)"));
    assert!(report.errors[1].contains("Batch 'B1'") && report.errors[1].contains("lost.md"));
    assert!(report.errors[2].contains("'a.md' extends 'b.md'"));
    assert!(report.errors[3].contains("'b.md' examples 'a.md'"));
}

#[test]
fn orphaned_notes_are_not_flagged() {
    let mut document = document_with(&["a.md"]);
    document.batches[0].notes.clear();
    assert!(validate(&document).is_valid());
}

#[test]
fn note_count_update_restores_count_invariant() {
    let mut document = document_with(&["a.md", "b.md", "c.md"]);
    document.metadata.total_notes = 0;

    update_metadata(&mut document, &MetadataUpdate::new().keep_version()).unwrap();
    assert_eq!(document.metadata.total_notes, document.notes.len());
    assert!(validate(&document).is_valid());
}

#[test]
fn statistics_cover_every_relationship_kind() {
    let mut document = document_with(&["a.md", "b.md"]);
    document.notes[0]
        .relationships
        .prerequisites
        .push(Edge::new("b.md", "x"));

    let stats = get_statistics(&document);
    assert_eq!(stats.total_notes, 2);
    for kind in RelationshipType::ALL {
        let expected = usize::from(kind == RelationshipType::Prerequisites);
        assert_eq!(stats.relationship_counts[&kind], expected);
    }
    assert_eq!(stats.tag_distribution["x"], 2);
}
