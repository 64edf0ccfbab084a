//! Subcommand handlers: load, operate, save, report.
//!
//! # Invariants
//! - Mutating commands save only after every core step succeeded.
//! - Core errors propagate to `main`, which maps them to exit status 1.

use crate::config::Command;
use crate::render;
use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::warn;
use std::io::Write;
use std::path::{Path, PathBuf};
use zettel_graph_core::store::{load, save};
use zettel_graph_core::{
    add_note, add_note_to_batch, add_relationship, create_backup, create_note,
    establish_bidirectional_relationships, find_batch_by_name, find_note, get_statistics,
    increment_minor_version, normalize_filename, remove_note, rename_note_references,
    update_metadata, update_note, validate, wikilink_stem, BatchRef, GraphDocument,
    MetadataUpdate, NewRelationship, NoteChange, NoteUpdate, Relationships, Vault,
};

const MAX_RENAME_WARNINGS: usize = 5;

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Completed, but the findings warrant a non-zero exit status.
    Failure,
}

/// Per-invocation inputs shared by all handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub graph_path: PathBuf,
    pub now: NaiveDateTime,
}

impl Context {
    pub fn new(graph_path: PathBuf) -> Self {
        Self {
            graph_path,
            now: Local::now().naive_local(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

pub fn run(command: Command, ctx: &Context, out: &mut dyn Write) -> Result<Outcome> {
    match command {
        Command::AddNote {
            filename,
            title,
            tags,
            summary,
            batch,
            relationships,
        } => add_note_command(
            ctx,
            out,
            &filename,
            title,
            parse_tags(&tags),
            summary,
            &batch,
            relationships.as_deref(),
        ),
        Command::AddRelationship {
            source,
            target,
            kind,
            why,
            bidirectional,
            inverse_type,
        } => {
            let request = NewRelationship::parse(
                &normalize_filename(&source),
                &normalize_filename(&target),
                &kind,
                &why,
                bidirectional,
                inverse_type.as_deref(),
            )?;
            add_relationship_command(ctx, out, &request)
        }
        Command::UpdateNote {
            filename,
            title,
            tags,
            summary,
        } => {
            let update = NoteUpdate {
                title,
                tags: tags.as_deref().map(parse_tags),
                summary,
            };
            update_note_command(ctx, out, &filename, update)
        }
        Command::RemoveNote { filename } => remove_note_command(ctx, out, &filename),
        Command::Rename { old, new } => rename_command(ctx, out, &old, &new),
        Command::Reconcile => reconcile_command(ctx, out),
        Command::Stats => {
            let document = load_graph(ctx)?;
            render::print_stats(out, &get_statistics(&document))?;
            Ok(Outcome::Success)
        }
        Command::Note { filename } => {
            let document = load_graph(ctx)?;
            let filename = normalize_filename(&filename);
            let note = find_note(&document.notes, &filename)
                .ok_or_else(|| anyhow!("Note '{filename}' not found"))?;
            render::print_note(out, note)?;
            Ok(Outcome::Success)
        }
        Command::Batch { name } => {
            let document = load_graph(ctx)?;
            let batch = find_batch_by_name(&document.batches, &name)
                .ok_or_else(|| anyhow!("Batch '{name}' not found"))?;
            render::print_batch(out, &document, batch)?;
            Ok(Outcome::Success)
        }
        Command::Metadata => {
            let document = load_graph(ctx)?;
            render::print_metadata(out, &document)?;
            Ok(Outcome::Success)
        }
        Command::Validate => {
            let document = load_graph(ctx)?;
            let report = validate(&document);
            render::print_validation(out, &report)?;
            Ok(if report.is_valid() {
                Outcome::Success
            } else {
                Outcome::Failure
            })
        }
    }
}

/// Splits comma-separated tags, trimming and dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_graph(ctx: &Context) -> Result<GraphDocument> {
    load(&ctx.graph_path)
        .with_context(|| format!("failed to load graph {}", ctx.graph_path.display()))
}

fn save_graph(ctx: &Context, document: &GraphDocument) -> Result<()> {
    save(document, &ctx.graph_path)
        .with_context(|| format!("failed to save graph {}", ctx.graph_path.display()))
}

#[allow(clippy::too_many_arguments)]
fn add_note_command(
    ctx: &Context,
    out: &mut dyn Write,
    filename: &str,
    title: String,
    tags: Vec<String>,
    summary: String,
    batch: &str,
    relationships_json: Option<&str>,
) -> Result<Outcome> {
    let filename = normalize_filename(filename);
    let relationships = relationships_json
        .map(|text| serde_json::from_str::<Relationships>(text))
        .transpose()
        .context("invalid relationships JSON")?;

    let mut document = load_graph(ctx)?;
    if find_note(&document.notes, &filename).is_some() {
        bail!("Note '{filename}' already exists in graph");
    }

    let has_relationships = relationships.is_some();
    let note = create_note(filename.as_str(), title.as_str(), tags.clone(), summary, relationships);
    add_note(&mut document, note);
    add_note_to_batch(&mut document, &filename, &BatchRef::name(batch))?;

    if has_relationships {
        let added = establish_bidirectional_relationships(&mut document);
        writeln!(out, "Established {added} bidirectional relationships")?;
    }

    let update = MetadataUpdate::new()
        .description(format!("Added {filename}"))
        .last_updated(ctx.today());
    update_metadata(&mut document, &update)?;
    save_graph(ctx, &document)?;

    writeln!(out, "Successfully added note: {filename}")?;
    writeln!(out, "- Title: {title}")?;
    writeln!(out, "- Tags: {}", tags.join(", "))?;
    writeln!(out, "- Batch: {batch}")?;
    writeln!(out, "- Version: {}", document.metadata.version)?;
    writeln!(out, "- Total notes: {}", document.metadata.total_notes)?;
    Ok(Outcome::Success)
}

fn add_relationship_command(
    ctx: &Context,
    out: &mut dyn Write,
    request: &NewRelationship,
) -> Result<Outcome> {
    let mut document = load_graph(ctx)?;
    if !add_relationship(&mut document, request)? {
        writeln!(
            out,
            "Relationship already exists: {} --{}--> {}",
            request.source, request.kind, request.target
        )?;
        return Ok(Outcome::Success);
    }

    let update = MetadataUpdate::new()
        .keep_version()
        .keep_note_count()
        .last_updated(ctx.today());
    update_metadata(&mut document, &update)?;
    save_graph(ctx, &document)?;

    writeln!(out, "Successfully added relationship:")?;
    writeln!(out, "  {}", request.source)?;
    writeln!(out, "    --{}--> {}", request.kind, request.target)?;
    if let Some(inverse) = request.inverse {
        writeln!(out, "  {}", request.target)?;
        writeln!(out, "    --{inverse}--> {}", request.source)?;
    }
    Ok(Outcome::Success)
}

fn update_note_command(
    ctx: &Context,
    out: &mut dyn Write,
    filename: &str,
    update: NoteUpdate,
) -> Result<Outcome> {
    if update.is_empty() {
        bail!("At least one update field (--title, --tags, --summary) is required");
    }
    let filename = normalize_filename(filename);

    let mut document = load_graph(ctx)?;
    let changes = update_note(&mut document, &filename, update)?;
    let fields: Vec<&str> = changes.iter().map(NoteChange::field).collect();

    let metadata = MetadataUpdate::new()
        .keep_version()
        .keep_note_count()
        .description(format!("Updated {filename}: {}", fields.join(", ")))
        .last_updated(ctx.today());
    update_metadata(&mut document, &metadata)?;
    let (previous, current) = increment_minor_version(&mut document)?;
    save_graph(ctx, &document)?;

    writeln!(out, "Successfully updated note: {filename}")?;
    writeln!(out, "Version: {previous} -> {current}")?;
    writeln!(out)?;
    for change in &changes {
        match change {
            NoteChange::Title { old, new } | NoteChange::Summary { old, new } => {
                print_change(out, change.field(), old, new)?
            }
            NoteChange::Tags { old, new } => {
                print_change(out, change.field(), &old.join(", "), &new.join(", "))?
            }
        }
    }
    Ok(Outcome::Success)
}

fn print_change(out: &mut dyn Write, field: &str, old: &str, new: &str) -> std::io::Result<()> {
    let mut label = field.to_string();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    writeln!(out, "{label}:")?;
    writeln!(out, "  Old: {old}")?;
    writeln!(out, "  New: {new}")
}

fn remove_note_command(ctx: &Context, out: &mut dyn Write, filename: &str) -> Result<Outcome> {
    let filename = normalize_filename(filename);
    let mut document = load_graph(ctx)?;
    if !remove_note(&mut document, &filename) {
        bail!("Note '{filename}' not found in graph");
    }

    let update = MetadataUpdate::new()
        .description(format!("Removed {filename}"))
        .last_updated(ctx.today());
    update_metadata(&mut document, &update)?;
    save_graph(ctx, &document)?;

    writeln!(out, "Successfully removed note: {filename}")?;
    writeln!(out, "- Version: {}", document.metadata.version)?;
    writeln!(out, "- Total notes: {}", document.metadata.total_notes)?;
    Ok(Outcome::Success)
}

fn reconcile_command(ctx: &Context, out: &mut dyn Write) -> Result<Outcome> {
    let mut document = load_graph(ctx)?;
    let added = establish_bidirectional_relationships(&mut document);
    if added > 0 {
        let update = MetadataUpdate::new()
            .keep_version()
            .keep_note_count()
            .last_updated(ctx.today());
        update_metadata(&mut document, &update)?;
        save_graph(ctx, &document)?;
    }
    writeln!(out, "Established {added} bidirectional relationships")?;
    Ok(Outcome::Success)
}

fn rename_command(ctx: &Context, out: &mut dyn Write, old: &str, new: &str) -> Result<Outcome> {
    let old = normalize_filename(old);
    let new = normalize_filename(new);
    let graph_path = ctx.graph_path.as_path();
    let vault = Vault::for_graph(graph_path);

    writeln!(out, "Renaming note: {old} -> {new}")?;
    if !vault.note_path(&old).is_file() {
        bail!("File does not exist: {old}");
    }
    if vault.note_path(&new).exists() {
        bail!("Target filename already exists: {new}");
    }
    if !graph_path.is_file() {
        bail!("Knowledge graph not found: {}", graph_path.display());
    }

    let backup = create_backup(graph_path, ctx.now)?;
    writeln!(out, "Backup created: {}", file_label(&backup))?;

    vault.rename_note_file(&old, &new)?;
    writeln!(out, "Renamed file: {old} -> {new}")?;

    let (document, references) = match sweep_graph(ctx, &old, &new) {
        Ok(result) => result,
        Err(err) => {
            if let Err(revert_err) = vault.rename_note_file(&new, &old) {
                warn!("event=note_file_rename module=cli status=error revert=true error={revert_err}");
            }
            return Err(err.context("failed to update knowledge graph; file rename reverted"));
        }
    };
    writeln!(out, "Updated {references} references in knowledge graph")?;

    let updates = match vault.rewrite_wikilinks(wikilink_stem(&old), wikilink_stem(&new)) {
        Ok(updates) => updates,
        Err(err) => {
            writeln!(out, "Warning: failed to update wikilinks: {err}")?;
            Vec::new()
        }
    };
    if updates.is_empty() {
        writeln!(out, "No wikilinks found to update")?;
    } else {
        writeln!(out, "Updated wikilinks in {} files:", updates.len())?;
        for update in &updates {
            writeln!(
                out,
                "  - {}: {} reference(s)",
                file_label(&update.path),
                update.replacements
            )?;
        }
    }

    let report = validate(&document);
    if report.is_valid() {
        writeln!(out, "Graph validation passed")?;
    } else {
        writeln!(out, "Validation warnings:")?;
        for error in report.errors.iter().take(MAX_RENAME_WARNINGS) {
            writeln!(out, "  - {error}")?;
        }
        if report.errors.len() > MAX_RENAME_WARNINGS {
            writeln!(
                out,
                "  ... and {} more",
                report.errors.len() - MAX_RENAME_WARNINGS
            )?;
        }
    }
    Ok(Outcome::Success)
}

fn sweep_graph(ctx: &Context, old: &str, new: &str) -> Result<(GraphDocument, usize)> {
    let mut document = load_graph(ctx)?;
    let references = rename_note_references(&mut document, old, new)?;
    let update = MetadataUpdate::new()
        .keep_version()
        .keep_note_count()
        .last_updated(ctx.today());
    update_metadata(&mut document, &update)?;
    save_graph(ctx, &document)?;
    Ok((document, references))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
