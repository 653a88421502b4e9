//! Status command for showing what the store holds.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::commands::util::open_database;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let counts = db.row_counts()?;

    writeln!(writer, "PiyoLog status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if counts.iter().all(|count| count.rows == 0) {
        writeln!(writer, "No exports imported.")?;
        return Ok(());
    }

    writeln!(writer, "Next event index: {}", db.next_event_index()?)?;
    writeln!(writer, "Tables:")?;
    for count in counts {
        writeln!(writer, "- {}: {}", count.table, count.rows)?;
    }

    Ok(())
}
