//! Import command for parsing exports into the local `SQLite` store.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use piyo_core::{BuiltinLocale, ParseOutput};
use piyo_db::Database;

use crate::Config;
use crate::commands::util::{expand_paths, open_database, parse_files, write_table_counts};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Export dialect, overriding the configured locale.
    #[arg(long)]
    pub locale: Option<BuiltinLocale>,

    /// Parse and report without writing to the database.
    #[arg(long)]
    pub dry_run: bool,

    /// Export files, or directories of `*.txt` exports.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Parses the exports, continuing the database's event index, and appends
/// every table in one transaction.
pub fn run<W: Write>(writer: &mut W, args: &ImportArgs, config: &Config) -> Result<ParseOutput> {
    let files = expand_paths(&args.paths)?;

    // A dry run never creates the database, but still continues its index.
    let mut db = if args.dry_run && !config.database_path.exists() {
        None
    } else {
        Some(open_database(config)?)
    };
    let first_index = db
        .as_ref()
        .map(Database::next_event_index)
        .transpose()?
        .unwrap_or(0);

    let output = parse_files(&files, args.locale, config, first_index)?;

    match db.as_mut() {
        Some(db) if !args.dry_run => {
            let inserted = db
                .append_tables(&output.tables)
                .context("failed to store tables")?;
            tracing::debug!(inserted, "import complete");
            writeln!(
                writer,
                "Imported {} file(s) into {}",
                files.len(),
                config.database_path.display()
            )?;
        }
        _ => writeln!(writer, "Parsed {} file(s) (dry run, nothing stored)", files.len())?,
    }
    writeln!(writer, "Event index: {first_index}..{}", output.next_index)?;
    writeln!(writer, "Tables:")?;
    write_table_counts(writer, &output.tables)?;

    Ok(output)
}
