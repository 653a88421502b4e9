//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::check::CheckArgs;
use crate::commands::export::ExportArgs;
use crate::commands::import::ImportArgs;

/// PiyoLog export reader.
///
/// Parses daily text exports from the ぴよログ baby log app into per-category
/// tables and stores them in a local SQLite database.
#[derive(Debug, Parser)]
#[command(name = "piyo", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse exports and append their tables to the database.
    Import(ImportArgs),

    /// Parse exports without touching the database.
    Check(CheckArgs),

    /// Show the database location and stored row counts.
    Status,

    /// Print the rows of one stored table as JSONL.
    Export(ExportArgs),
}
