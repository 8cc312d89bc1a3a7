//! CLI parse: clap types for Scandesk. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scandesk CLI - inbox/output document desk with ordered merges
#[derive(Parser)]
#[command(name = "scandesk")]
#[command(about = "Manage scanned documents: list, rename, move, delete and merge in order")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where config/config.toml is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inbox directory (overrides configuration)
    #[arg(long)]
    pub inbox: Option<PathBuf>,

    /// Output directory (overrides configuration)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the REST API (and frontend files, if configured)
    Serve {
        /// Socket address to bind, e.g. 0.0.0.0:3000
        #[arg(long)]
        bind: Option<String>,
        /// Directory of frontend files served at /
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// List documents with their ids
    List {
        /// List the output directory instead of the inbox
        #[arg(long)]
        outdir: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Rename an inbox document
    Rename {
        /// Document id
        id: String,
        /// New file name
        name: String,
    },
    /// Delete an inbox document
    Delete {
        /// Document id
        id: String,
    },
    /// Move an inbox document to the output directory
    Move {
        /// Document id
        id: String,
    },
    /// Merge inbox documents, in the given order, into a new inbox document
    Merge {
        /// Destination file name
        #[arg(long)]
        name: String,
        /// Document ids in merge order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the id a file would have
    Id {
        /// Path to a file (relative paths are resolved against the current directory)
        path: PathBuf,
    },
}
