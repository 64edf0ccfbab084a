//! JSON text codec and file load/save for graph documents.
//!
//! # Responsibility
//! - Read the document from text, rejecting malformed shapes.
//! - Render with two-space indentation and a trailing newline.
//!
//! # Invariants
//! - `save` replaces the target only after the full text is written.

use crate::error::{GraphError, GraphResult};
use crate::model::document::GraphDocument;
use log::{debug, error, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = "tmp";

/// Parses persisted JSON text into a document.
///
/// # Errors
/// - `MalformedDocument` when the text is not JSON, or when `metadata`,
///   `batches` or `notes` is missing or mistyped.
pub fn parse_document(text: &str) -> GraphResult<GraphDocument> {
    Ok(serde_json::from_str(text)?)
}

/// Renders the document as 2-space indented JSON with a trailing newline.
///
/// Non-ASCII text is written as-is. Struct fields keep declaration order and
/// free-form metadata keys are sorted, so repeated saves are byte-stable.
pub fn render_document(document: &GraphDocument) -> GraphResult<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    buffer.push(b'\n');
    String::from_utf8(buffer).map_err(|err| GraphError::MalformedDocument(err.to_string()))
}

/// Loads the whole document from `path`.
///
/// # Side effects
/// - Emits `graph_load` logging events with duration and status.
pub fn load(path: impl AsRef<Path>) -> GraphResult<GraphDocument> {
    let path = path.as_ref();
    let started_at = Instant::now();
    debug!(
        "event=graph_load module=store status=start path={}",
        path.display()
    );

    let result = fs::read_to_string(path)
        .map_err(|err| GraphError::io(path, err))
        .and_then(|text| parse_document(&text));

    match &result {
        Ok(document) => info!(
            "event=graph_load module=store status=ok path={} notes={} batches={} duration_ms={}",
            path.display(),
            document.notes.len(),
            document.batches.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=graph_load module=store status=error path={} duration_ms={} error={}",
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Writes the whole document to `path`, replacing any previous content.
///
/// The text goes to a sibling temp file first and is renamed over the
/// destination, so readers never observe a half-written file.
///
/// # Side effects
/// - Emits `graph_save` logging events with duration and status.
pub fn save(document: &GraphDocument, path: impl AsRef<Path>) -> GraphResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let result = write_replacing(document, path);

    match &result {
        Ok(()) => info!(
            "event=graph_save module=store status=ok path={} notes={} version={} duration_ms={}",
            path.display(),
            document.notes.len(),
            document.metadata.version,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=graph_save module=store status=error path={} duration_ms={} error={}",
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn write_replacing(document: &GraphDocument, path: &Path) -> GraphResult<()> {
    let text = render_document(document)?;
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, text).map_err(|err| GraphError::io(&temp_path, err))?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(GraphError::io(path, err));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}
