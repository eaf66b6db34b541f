use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pyindex",
    version,
    about = "Index Python source trees into a searchable catalog",
    after_help = "Search queries are free text, or `kind:term` where kind is one of \
                  module, class, function, method, var, variable, import, doc, docstring."
)]
pub struct Cli {
    /// Catalog database path (default: ~/.pyindex/pyindex.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a directory for Python files and index them.
    ///
    /// Respects .gitignore and skips hidden files, virtualenvs and caches.
    /// Re-indexing the same directory replaces each module's previous entries.
    Index {
        /// Directory to index (default: current directory)
        #[arg(default_value = ".")]
        directory: PathBuf,
        /// Project name (default: directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Search indexed code (free text or `kind:term`)
    Search {
        /// Search query
        query: String,
        /// Restrict to one project
        #[arg(short, long)]
        project: Option<i64>,
        /// Maximum results per category (default from config, 20)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show an indexed file with its functions, classes and variables
    View {
        /// Absolute file path as indexed
        path: String,
    },

    /// List indexed projects
    Projects,

    /// Show one project
    Project {
        /// Project ID
        id: i64,
    },

    /// Start the MCP server on stdio
    Serve,
}
