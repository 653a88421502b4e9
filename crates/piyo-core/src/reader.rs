//! Reading export files from disk.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::locale::Vocabulary;
use crate::parser::{DayParser, ParseError, ParseOptions, ParseOutput};
use crate::record::EventIndex;
use crate::table::{SchemaMismatch, TableSet};

/// Buffer size for export files. Exports are at most a few hundred KB.
const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("cannot append tables from {}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaMismatch,
    },
}

impl ReadError {
    /// The file the fault occurred in.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Schema { path, .. } => path,
        }
    }
}

/// Parses one export file, numbering its events from `first_index`.
pub fn read_text(
    path: &Path,
    vocabulary: &Vocabulary<'_>,
    options: ParseOptions,
    first_index: EventIndex,
) -> Result<ParseOutput, ReadError> {
    let io_error = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut parser = DayParser::new(vocabulary, options, first_index);
    for line in reader.lines() {
        let line = line.map_err(io_error)?;
        parser.feed_line(&line).map_err(|source| ReadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let output = parser.finish();
    tracing::debug!(
        path = %path.display(),
        first_index,
        next_index = output.next_index,
        rows = output.tables.total_rows(),
        "read export"
    );
    Ok(output)
}

/// Parses export files strictly in order, continuing the event index from
/// one file to the next, and concatenates their tables.
pub fn read_texts<P: AsRef<Path>>(
    paths: &[P],
    vocabulary: &Vocabulary<'_>,
    options: ParseOptions,
    first_index: EventIndex,
) -> Result<ParseOutput, ReadError> {
    let mut combined = ParseOutput {
        tables: TableSet::empty(vocabulary.locale().dialect.as_str()),
        next_index: first_index,
    };
    for path in paths {
        let path = path.as_ref();
        let output = read_text(path, vocabulary, options, combined.next_index)?;
        combined
            .tables
            .append(output.tables)
            .map_err(|source| ReadError::Schema {
                path: path.to_path_buf(),
                source,
            })?;
        combined.next_index = output.next_index;
    }
    Ok(combined)
}
