//! Command-line arguments and environment fallbacks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "zettel-graph")]
#[command(about = "Maintain a Zettelkasten note graph document")]
#[command(version)]
pub struct Cli {
    /// Graph document; its directory holds the note markdown files
    #[arg(
        long,
        env = "ZETTEL_GRAPH",
        default_value = "knowledge_graph_full.json",
        global = true
    )]
    pub graph: PathBuf,

    /// Absolute directory for rotating log files (logging is off when unset)
    #[arg(long, env = "ZETTEL_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "ZETTEL_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new note and list it in a batch
    #[command(display_order = 1)]
    AddNote {
        filename: String,
        title: String,
        /// Comma-separated tags
        tags: String,
        summary: String,
        /// Target batch name
        batch: String,
        /// Relationships JSON, e.g. '{"prerequisites": [{"note": "b.md", "why": "..."}]}'
        relationships: Option<String>,
    },
    /// Link two notes
    #[command(display_order = 2)]
    AddRelationship {
        source: String,
        target: String,
        /// prerequisites|related_concepts|extends|extended_by|alternatives|examples
        #[arg(value_name = "TYPE")]
        kind: String,
        why: String,
        /// Also add the inverse edge on the target
        #[arg(long)]
        bidirectional: bool,
        /// Relationship type for the inverse edge
        #[arg(long)]
        inverse_type: Option<String>,
    },
    /// Edit a note's title, tags or summary
    #[command(display_order = 3)]
    UpdateNote {
        filename: String,
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tags, replacing the current list
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
    /// Remove a note and every reference to it
    #[command(display_order = 4)]
    RemoveNote { filename: String },
    /// Rename a note file and rewrite every reference to it
    #[command(display_order = 5)]
    Rename { old: String, new: String },
    /// Add missing extended_by edges for extends/examples links
    #[command(display_order = 6)]
    Reconcile,
    /// Show graph statistics
    #[command(display_order = 10)]
    Stats,
    /// Show one note
    #[command(display_order = 11)]
    Note { filename: String },
    /// Show one batch
    #[command(display_order = 12)]
    Batch { name: String },
    /// Show graph metadata
    #[command(display_order = 13)]
    Metadata,
    /// Check graph integrity (exit status 1 on findings)
    #[command(display_order = 14)]
    Validate,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_relationship_parses_flags() {
        let cli = Cli::try_parse_from([
            "zettel-graph",
            "--graph",
            "/vault/graph.json",
            "add-relationship",
            "a.md",
            "b.md",
            "extends",
            "builds on b",
            "--bidirectional",
            "--inverse-type",
            "extended_by",
        ])
        .unwrap();

        assert_eq!(cli.graph.to_str(), Some("/vault/graph.json"));
        match cli.command {
            Command::AddRelationship {
                kind,
                bidirectional,
                inverse_type,
                ..
            } => {
                assert_eq!(kind, "extends");
                assert!(bidirectional);
                assert_eq!(inverse_type.as_deref(), Some("extended_by"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
