use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aye — undo store for AI-applied edits
#[derive(Parser, Debug)]
#[command(name = "aye", version, about = "Snapshot/undo store for agent-applied source edits")]
pub struct Cli {
    /// Project root (overrides AYE_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Snapshot store directory (overrides AYE_SNAPSHOT_DIR)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List batches, newest first (or batches that captured FILE)
    History {
        /// Restrict to batches that captured this file
        file: Option<PathBuf>,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the captured content of FILE in BATCH
    ///
    /// Пример:
    ///   aye show src/main.py 003
    Show {
        file: PathBuf,
        /// Batch id or ordinal (003_20240115T093000 | 003 | 3)
        batch: String,
    },
    /// Restore files from a batch (default: the most recent one)
    ///
    /// Примеры:
    ///   aye restore                # весь последний батч
    ///   aye restore 002            # весь батч 002
    ///   aye restore 002 notes.txt  # один файл из батча 002
    #[command(visible_alias = "revert")]
    Restore {
        /// Batch id or ordinal
        batch: Option<String>,
        /// Base name of a single file to restore
        file: Option<String>,
    },
    /// Keep the N most recent batches and delete the rest
    Keep {
        /// Number of batches to keep (default: AYE_KEEP or 10)
        count: Option<usize>,
    },
    /// Snapshot then write a set of proposed edits
    ///
    /// JSON формат (массив объектов):
    /// [
    ///   {"path":"src/main.py","content":"..."},
    ///   {"file_name":"notes.txt","file_content":"..."}
    /// ]
    Apply {
        /// JSON file with edits ("-" reads stdin)
        #[arg(long)]
        edits_file: Option<PathBuf>,
        /// JSON string with edits (used if --edits-file is not set)
        #[arg(long)]
        edits_json: Option<String>,
    },
    /// Collect source files (path → content) as sent to the inference service
    Collect {
        /// File mask, comma-separated (overrides AYE_FILE_MASK)
        #[arg(long)]
        mask: Option<String>,
        /// Only the top-level directory
        #[arg(long, default_value_t = false)]
        no_recursive: bool,
        /// Print the full mapping as JSON instead of a path list
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}
