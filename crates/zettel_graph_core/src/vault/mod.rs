//! Markdown vault helpers around the graph document.
//!
//! # Responsibility
//! - Locate note files next to the graph document.
//! - Create timestamped backups of the document before destructive edits.
//! - Rename note files and rewrite `[[wikilinks]]` in sibling notes.
//!
//! # Invariants
//! - Only top-level `*.md` files of the vault root are scanned.
//! - A file that cannot be read or written is skipped, never half-written.

mod wikilinks;

pub use wikilinks::replace_wikilinks;

use crate::error::{GraphError, GraphResult};
use crate::model::note::{normalize_filename, NOTE_SUFFIX};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "knowledge_graph_backup_";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Wikilink rewrite result for one markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikilinkUpdate {
    pub path: PathBuf,
    pub replacements: usize,
}

/// Copies the graph document to `knowledge_graph_backup_<timestamp>.json`
/// in the same directory and returns the backup path.
pub fn create_backup(graph_path: &Path, now: NaiveDateTime) -> GraphResult<PathBuf> {
    let file_name = format!(
        "{BACKUP_PREFIX}{}.json",
        now.format(BACKUP_TIMESTAMP_FORMAT)
    );
    let backup_path = graph_path.with_file_name(file_name);
    fs::copy(graph_path, &backup_path).map_err(|err| GraphError::io(graph_path, err))?;
    info!(
        "event=backup_create module=vault status=ok source={} backup={}",
        graph_path.display(),
        backup_path.display()
    );
    Ok(backup_path)
}

/// Directory holding note markdown files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Vault rooted at the directory containing the graph document.
    pub fn for_graph(graph_path: &Path) -> Self {
        let root = graph_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn note_path(&self, filename: &str) -> PathBuf {
        self.root.join(normalize_filename(filename))
    }

    /// Renames the markdown file of a note.
    ///
    /// # Errors
    /// - `NoteNotFound` when the old file is missing.
    /// - `NoteAlreadyExists` when the new file is already present.
    pub fn rename_note_file(&self, old: &str, new: &str) -> GraphResult<()> {
        let old_path = self.note_path(old);
        let new_path = self.note_path(new);
        if !old_path.is_file() {
            return Err(GraphError::NoteNotFound(normalize_filename(old)));
        }
        if new_path.exists() {
            return Err(GraphError::NoteAlreadyExists(normalize_filename(new)));
        }
        fs::rename(&old_path, &new_path).map_err(|err| GraphError::io(&old_path, err))?;
        info!(
            "event=note_file_rename module=vault status=ok old={} new={}",
            old_path.display(),
            new_path.display()
        );
        Ok(())
    }

    /// Rewrites `[[old_stem]]` to `[[new_stem]]` in every top-level markdown
    /// file except `new_stem.md` itself.
    ///
    /// Returns only files that changed, sorted by path.
    ///
    /// # Errors
    /// - `Io` when the vault directory cannot be listed.
    pub fn rewrite_wikilinks(
        &self,
        old_stem: &str,
        new_stem: &str,
    ) -> GraphResult<Vec<WikilinkUpdate>> {
        let entries = fs::read_dir(&self.root).map_err(|err| GraphError::io(&self.root, err))?;
        let renamed_file = format!("{new_stem}{NOTE_SUFFIX}");

        let mut markdown_files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .filter(|path| path.file_name().is_some_and(|name| name != renamed_file.as_str()))
            .collect();
        markdown_files.sort();

        let mut updates = Vec::new();
        for path in markdown_files {
            match rewrite_file(&path, old_stem, new_stem) {
                Ok(0) => {}
                Ok(replacements) => updates.push(WikilinkUpdate { path, replacements }),
                Err(err) => warn!(
                    "event=wikilink_rewrite module=vault status=skip path={} error={}",
                    path.display(),
                    err
                ),
            }
        }

        info!(
            "event=wikilink_rewrite module=vault status=ok old={old_stem} new={new_stem} files={}",
            updates.len()
        );
        Ok(updates)
    }
}

fn rewrite_file(path: &Path, old_stem: &str, new_stem: &str) -> std::io::Result<usize> {
    let content = fs::read_to_string(path)?;
    let (rewritten, count) = replace_wikilinks(&content, old_stem, new_stem);
    if count > 0 {
        fs::write(path, rewritten)?;
    }
    Ok(count)
}
