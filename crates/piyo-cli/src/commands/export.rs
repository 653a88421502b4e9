//! Implementation of the `piyo export` command.
//!
//! Prints the rows of one stored table as JSONL, in key order.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::Config;
use crate::commands::util::open_database;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Table to print (e.g. `event`, `sleep_end`, `breastfeeding`).
    pub table: String,
}

/// Writes every row of the table, one JSON object per line.
///
/// Returns the number of rows written.
pub fn run<W: Write>(writer: &mut W, args: &ExportArgs, config: &Config) -> Result<usize> {
    let db = open_database(config)?;
    let rows = db
        .list_rows(&args.table)
        .with_context(|| format!("failed to export {}", args.table))?;

    for row in &rows {
        serde_json::to_writer(&mut *writer, row)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
