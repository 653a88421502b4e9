//! Shared utilities for CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use piyo_core::{BuiltinLocale, EventIndex, ParseOutput, TableSet, read_texts};
use piyo_db::Database;

use crate::Config;

/// Opens the configured database, creating its parent directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Parses export files in order with the resolved locale, numbering events
/// from `first_index`.
pub fn parse_files(
    files: &[PathBuf],
    builtin: Option<BuiltinLocale>,
    config: &Config,
    first_index: EventIndex,
) -> Result<ParseOutput> {
    let locale = config
        .resolve_locale(builtin)
        .context("failed to load locale")?;
    let vocabulary = locale.vocabulary().context("invalid locale")?;
    tracing::debug!(
        dialect = %locale.dialect,
        files = files.len(),
        first_index,
        "parsing exports"
    );
    let output = read_texts(files, &vocabulary, config.parse_options(), first_index)?;
    Ok(output)
}

/// Expands directories into the `*.txt` exports they contain, sorted by
/// file name. Other paths are passed through in the order given.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(exports_in(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn exports_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!(dir = %dir.display(), files = files.len(), "expanded export directory");
    Ok(files)
}

/// Writes one `- table: rows` line per table.
pub fn write_table_counts<W: Write>(writer: &mut W, tables: &TableSet) -> Result<()> {
    for table in tables {
        writeln!(writer, "- {}: {}", table.name(), table.len())?;
    }
    Ok(())
}
