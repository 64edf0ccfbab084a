//! Human-readable report printing.

use std::io::{self, Write};
use zettel_graph_core::{find_note, Batch, GraphDocument, GraphStatistics, Note, ValidationReport};

const RULE_WIDTH: usize = 60;
const TOP_TAGS: usize = 10;

fn rule(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn print_stats(out: &mut dyn Write, stats: &GraphStatistics) -> io::Result<()> {
    writeln!(out, "Graph Statistics")?;
    rule(out)?;
    writeln!(out, "Total notes: {}", stats.total_notes)?;
    writeln!(out, "Total batches: {}", stats.total_batches)?;
    writeln!(out)?;
    writeln!(out, "Relationship counts:")?;
    for (kind, count) in &stats.relationship_counts {
        writeln!(out, "  {kind}: {count}")?;
    }
    writeln!(out)?;
    writeln!(out, "Unique tags: {}", stats.unique_tags())?;
    writeln!(out, "Top {TOP_TAGS} tags:")?;
    for (tag, count) in stats.top_tags(TOP_TAGS) {
        writeln!(out, "  {tag}: {count}")?;
    }
    Ok(())
}

pub fn print_note(out: &mut dyn Write, note: &Note) -> io::Result<()> {
    writeln!(out, "Note: {}", note.filename)?;
    rule(out)?;
    writeln!(out, "Title: {}", note.title)?;
    writeln!(out, "Tags: {}", note.tags.join(", "))?;
    writeln!(out, "Summary: {}", note.summary)?;
    writeln!(out)?;
    writeln!(out, "Relationships:")?;
    for (kind, edges) in note.relationships.iter().filter(|(_, edges)| !edges.is_empty()) {
        writeln!(out, "  {kind}: {}", edges.len())?;
        for edge in edges {
            writeln!(out, "    - {}: {}", edge.note, edge.why)?;
        }
    }
    Ok(())
}

pub fn print_batch(out: &mut dyn Write, document: &GraphDocument, batch: &Batch) -> io::Result<()> {
    writeln!(out, "Batch {}: {}", batch.batch_number, batch.name)?;
    rule(out)?;
    writeln!(out, "Total notes: {}", batch.notes.len())?;
    writeln!(out)?;
    writeln!(out, "Notes:")?;
    for filename in &batch.notes {
        match find_note(&document.notes, filename) {
            Some(note) => writeln!(out, "  - {filename}: {}", note.title)?,
            None => writeln!(out, "  - {filename}: [NOT FOUND IN GRAPH]")?,
        }
    }
    Ok(())
}

pub fn print_metadata(out: &mut dyn Write, document: &GraphDocument) -> io::Result<()> {
    writeln!(out, "Graph Metadata")?;
    rule(out)?;
    let fields = serde_json::to_value(&document.metadata)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if let serde_json::Value::Object(map) = fields {
        for (key, value) in map {
            match value {
                serde_json::Value::String(text) => writeln!(out, "{key}: {text}")?,
                other => writeln!(out, "{key}: {other}")?,
            }
        }
    }
    Ok(())
}

pub fn print_validation(out: &mut dyn Write, report: &ValidationReport) -> io::Result<()> {
    writeln!(out, "Graph Validation")?;
    rule(out)?;
    if report.is_valid() {
        writeln!(out, "[OK] Graph is valid")?;
        writeln!(out)?;
        writeln!(out, "All checks passed:")?;
        writeln!(out, "  [OK] Metadata counts match actual counts")?;
        writeln!(out, "  [OK] All batch references point to existing notes")?;
        writeln!(out, "  [OK] All relationship targets exist")?;
        writeln!(out, "  [OK] Bidirectional relationships are consistent")?;
        return Ok(());
    }
    writeln!(out, "[ERROR] Graph has {} error(s):", report.errors.len())?;
    writeln!(out)?;
    for (index, error) in report.errors.iter().enumerate() {
        writeln!(out, "{}. {error}", index + 1)?;
    }
    Ok(())
}
