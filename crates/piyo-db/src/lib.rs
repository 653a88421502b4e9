//! Storage layer for parsed PiyoLog tables.
//!
//! Every output table of `piyo-core` has a SQLite table of the same name and
//! columns. Rows are inserted with the keys the parser assigned, so importing
//! the same export twice fails on the duplicate `event_index` instead of
//! silently duplicating data. Use [`Database::next_event_index`] as the first
//! index of a later import to continue the sequence.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//!
//! # Schema
//!
//! Timestamps are stored as RFC 3339 TEXT with the export's UTC offset (e.g.,
//! `2024-01-15T06:30:00+09:00`), dates as `YYYY-MM-DD`. Boolean columns are
//! declared `BOOLEAN` and hold 0 or 1. Enumerated values (`feeding_order`,
//! diaper `volume`/`consistency`, event `category`) are snake_case tokens.

use std::path::Path;

use piyo_core::table::{DAY_TABLE, Table, TableSet, schema, table_names};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The table is not part of the store.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// The table's columns differ from the stored table's.
    #[error("table {table} has columns {found:?}, but the store has {expected:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

/// Number of stored rows in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- One row per day block; several exports may cover the same date
            CREATE TABLE IF NOT EXISTS day (
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                age_years INTEGER NOT NULL,
                age_months INTEGER NOT NULL,
                age_days INTEGER NOT NULL,
                comment TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_day_date ON day(date);

            -- category: snake_case category name, NULL for unrecognized labels
            CREATE TABLE IF NOT EXISTS event (
                event_index INTEGER PRIMARY KEY,
                timestamp TEXT NOT NULL,
                label TEXT NOT NULL,
                category TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_event_timestamp ON event(timestamp);
            CREATE INDEX IF NOT EXISTS idx_event_category ON event(category);

            CREATE TABLE IF NOT EXISTS sleep_start (
                event_index INTEGER PRIMARY KEY,
                error BOOLEAN NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS sleep_end (
                event_index INTEGER PRIMARY KEY,
                sleeping_minutes INTEGER,
                wake_up_time TEXT NOT NULL,
                bedtime TEXT,
                error BOOLEAN NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS height (
                event_index INTEGER PRIMARY KEY,
                height_cm REAL NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS weight (
                event_index INTEGER PRIMARY KEY,
                weight_kg REAL NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS head_circumference (
                event_index INTEGER PRIMARY KEY,
                head_circumference_cm REAL NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS temperature (
                event_index INTEGER PRIMARY KEY,
                temperature_c REAL NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS expressed_milk (
                event_index INTEGER PRIMARY KEY,
                volume_ml INTEGER NOT NULL,
                in_progress BOOLEAN NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS formula_milk (
                event_index INTEGER PRIMARY KEY,
                volume_ml INTEGER,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            -- feeding_order: left_to_right, right_to_left, or NULL when simultaneous/unknown
            CREATE TABLE IF NOT EXISTS breastfeeding (
                event_index INTEGER PRIMARY KEY,
                volume_ml INTEGER,
                left_minutes INTEGER,
                right_minutes INTEGER,
                feeding_order TEXT,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS diaper (
                event_index INTEGER PRIMARY KEY,
                volume TEXT NOT NULL,
                consistency TEXT NOT NULL,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS clinic_visit (
                event_index INTEGER PRIMARY KEY,
                note TEXT,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS vaccination (
                event_index INTEGER PRIMARY KEY,
                vaccine TEXT,
                FOREIGN KEY (event_index) REFERENCES event(event_index) ON DELETE CASCADE
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts every row of one table in a single transaction.
    ///
    /// Returns the number of inserted rows.
    pub fn append_table(&mut self, table: &Table) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let inserted = insert_rows(&tx, table)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// Inserts every table of a set in a single transaction.
    ///
    /// Tables are written in set order, so events precede the category
    /// records that reference them.
    pub fn append_tables(&mut self, tables: &TableSet) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for table in tables {
            inserted += insert_rows(&tx, table)?;
        }
        tx.commit()?;
        tracing::debug!(dialect = tables.dialect(), inserted, "appended tables");
        Ok(inserted)
    }

    /// Returns the index the next imported event should receive.
    pub fn next_event_index(&self) -> Result<i64, DbError> {
        let next = self.conn.query_row(
            "SELECT COALESCE(MAX(event_index) + 1, 0) FROM event",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Counts stored rows per table, in table order.
    pub fn row_counts(&self) -> Result<Vec<TableCount>, DbError> {
        let mut counts = Vec::new();
        for table in table_names() {
            let rows = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            counts.push(TableCount { table, rows });
        }
        Ok(counts)
    }

    /// Lists the rows of one table in key order, as JSON objects keyed by column.
    pub fn list_rows(&self, table: &str) -> Result<Vec<Map<String, JsonValue>>, DbError> {
        let columns = stored_columns(&self.conn, table)?;
        let order = if table == DAY_TABLE {
            "date ASC, rowid ASC"
        } else {
            "event_index ASC"
        };
        let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {table} ORDER BY {order}",
            names.join(", ")
        ))?;

        let mut rows = stmt.query([])?;
        let mut objects = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = Map::new();
            for (i, column) in columns.iter().enumerate() {
                let value = json_value(row.get_ref(i)?, column.boolean);
                object.insert(column.name.clone(), value);
            }
            objects.push(object);
        }
        Ok(objects)
    }
}

struct StoredColumn {
    name: String,
    boolean: bool,
}

/// Reads a table's columns from the store. Only tables `piyo-core` produces
/// are queried.
fn stored_columns(conn: &Connection, table: &str) -> Result<Vec<StoredColumn>, DbError> {
    if schema(table).is_none() {
        return Err(DbError::UnknownTable(table.to_string()));
    }
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| {
        let declared: String = row.get(2)?;
        Ok(StoredColumn {
            name: row.get(1)?,
            boolean: declared.eq_ignore_ascii_case("BOOLEAN"),
        })
    })?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    if columns.is_empty() {
        return Err(DbError::UnknownTable(table.to_string()));
    }
    Ok(columns)
}

fn insert_rows(conn: &Connection, table: &Table) -> Result<usize, DbError> {
    let stored = stored_columns(conn, table.name())?;
    if stored.len() != table.columns().len()
        || stored
            .iter()
            .zip(table.columns())
            .any(|(column, name)| column.name != *name)
    {
        return Err(DbError::SchemaMismatch {
            table: table.name().to_string(),
            expected: stored.into_iter().map(|column| column.name).collect(),
            found: table.columns().to_vec(),
        });
    }
    if table.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; stored.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        table.name(),
        table.columns().join(", "),
    ))?;
    let mut inserted = 0;
    for row in table.rows() {
        inserted += stmt.execute(params_from_iter(row.iter().map(sql_value)))?;
    }
    tracing::trace!(table = table.name(), inserted, "inserted rows");
    Ok(inserted)
}

fn sql_value(value: &piyo_core::Value) -> SqlValue {
    match value {
        piyo_core::Value::Null => SqlValue::Null,
        piyo_core::Value::Integer(v) => SqlValue::Integer(*v),
        piyo_core::Value::Real(v) => SqlValue::Real(*v),
        piyo_core::Value::Text(v) => SqlValue::Text(v.clone()),
        piyo_core::Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
    }
}

fn json_value(value: ValueRef<'_>, boolean: bool) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(v) if boolean => JsonValue::Bool(v != 0),
        ValueRef::Integer(v) => JsonValue::from(v),
        ValueRef::Real(v) => JsonValue::from(v),
        ValueRef::Text(v) | ValueRef::Blob(v) => {
            JsonValue::String(String::from_utf8_lossy(v).into_owned())
        }
    }
}
