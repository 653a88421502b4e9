//! Output tables and the assembler that fills them.
//!
//! Every output table has a fixed column schema that does not depend on the
//! export dialect: enumerations are written as English snake_case tokens,
//! timestamps as RFC 3339 text, dates as `YYYY-MM-DD`. A [`TableSet`] always
//! carries every table, empty ones included.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::category::Category;
use crate::record::{CategoryRecord, DayBlock, Event};

pub const DAY_TABLE: &str = "day";
pub const EVENT_TABLE: &str = "event";

pub const DAY_COLUMNS: &[&str] = &[
    "date",
    "name",
    "age_years",
    "age_months",
    "age_days",
    "comment",
];
pub const EVENT_COLUMNS: &[&str] = &["event_index", "timestamp", "label", "category"];

/// Column schema of a category table. The first column is the event index.
pub const fn category_columns(category: Category) -> &'static [&'static str] {
    match category {
        Category::SleepStart => &["event_index", "error"],
        Category::SleepEnd => &[
            "event_index",
            "sleeping_minutes",
            "wake_up_time",
            "bedtime",
            "error",
        ],
        Category::Height => &["event_index", "height_cm"],
        Category::Weight => &["event_index", "weight_kg"],
        Category::HeadCircumference => &["event_index", "head_circumference_cm"],
        Category::Temperature => &["event_index", "temperature_c"],
        Category::ExpressedMilk => &["event_index", "volume_ml", "in_progress"],
        Category::FormulaMilk => &["event_index", "volume_ml"],
        Category::Breastfeeding => &[
            "event_index",
            "volume_ml",
            "left_minutes",
            "right_minutes",
            "feeding_order",
        ],
        Category::Diaper => &["event_index", "volume", "consistency"],
        Category::ClinicVisit => &["event_index", "note"],
        Category::Vaccination => &["event_index", "vaccine"],
    }
}

/// Names of every output table, in table order.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    [DAY_TABLE, EVENT_TABLE]
        .into_iter()
        .chain(Category::ALL.into_iter().map(|category| category.as_str()))
}

/// Column schema of an output table, if `table` names one.
pub fn schema(table: &str) -> Option<&'static [&'static str]> {
    match table {
        DAY_TABLE => Some(DAY_COLUMNS),
        EVENT_TABLE => Some(EVENT_COLUMNS),
        other => other.parse::<Category>().ok().map(category_columns),
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Raised when two tables or table sets cannot be concatenated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaMismatch {
    #[error("cannot append {found} tables to {expected} tables")]
    Dialect { expected: String, found: String },

    #[error("table {table} has columns {found:?}, expected {expected:?}")]
    Columns {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("table sets differ: expected {expected:?}, found {found:?}")]
    Tables {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Rows under a fixed column schema. The first column is the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    fn for_category(category: Category) -> Self {
        Self::new(category.as_str(), category_columns(category).iter().copied())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. The row must have one value per column.
    pub fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width for {}", self.name);
        self.rows.push(row);
    }

    /// Returns every value of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.columns.iter().position(|column| column == name)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }

    fn check_compatible(&self, other: &Self) -> Result<(), SchemaMismatch> {
        if self.name == other.name && self.columns == other.columns {
            Ok(())
        } else {
            Err(SchemaMismatch::Columns {
                table: other.name.clone(),
                expected: self.columns.clone(),
                found: other.columns.clone(),
            })
        }
    }
}

/// Every output table of one run, tagged with the dialect it was decoded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSet {
    dialect: String,
    tables: Vec<Table>,
}

impl TableSet {
    /// Creates a set holding every output table, all empty.
    pub fn empty(dialect: impl Into<String>) -> Self {
        TableBuilder::new(dialect).finish()
    }

    /// Creates a set from arbitrary tables.
    pub fn from_tables(dialect: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            dialect: dialect.into(),
            tables,
        }
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }

    fn names(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.name.clone()).collect()
    }

    /// Concatenates `other` onto this set, table by table.
    ///
    /// Nothing is appended unless every table is compatible.
    pub fn append(&mut self, other: Self) -> Result<(), SchemaMismatch> {
        if self.dialect != other.dialect {
            return Err(SchemaMismatch::Dialect {
                expected: self.dialect.clone(),
                found: other.dialect,
            });
        }
        if self.tables.len() != other.tables.len()
            || self
                .tables
                .iter()
                .zip(&other.tables)
                .any(|(ours, theirs)| ours.name != theirs.name)
        {
            return Err(SchemaMismatch::Tables {
                expected: self.names(),
                found: other.names(),
            });
        }
        for (ours, theirs) in self.tables.iter().zip(&other.tables) {
            ours.check_compatible(theirs)?;
        }
        for (ours, theirs) in self.tables.iter_mut().zip(other.tables) {
            ours.rows.extend(theirs.rows);
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

/// Collects day blocks, events and category records in arrival order.
#[derive(Debug)]
pub struct TableBuilder {
    dialect: String,
    days: Table,
    events: Table,
    categories: BTreeMap<Category, Table>,
}

impl TableBuilder {
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            days: Table::new(DAY_TABLE, DAY_COLUMNS.iter().copied()),
            events: Table::new(EVENT_TABLE, EVENT_COLUMNS.iter().copied()),
            categories: BTreeMap::new(),
        }
    }

    pub fn push_day(&mut self, day: DayBlock) {
        self.days.push(vec![
            Value::Text(day.date.format("%Y-%m-%d").to_string()),
            Value::Text(day.name),
            day.age.years.into(),
            day.age.months.into(),
            day.age.days.into(),
            day.comment.into(),
        ]);
    }

    pub fn push_event(&mut self, event: &Event) {
        self.events.push(vec![
            event.index.into(),
            Value::Text(event.timestamp.to_rfc3339()),
            event.label.as_str().into(),
            event.category.map(|category| category.as_str()).into(),
        ]);
    }

    pub fn push_record(&mut self, record: CategoryRecord) {
        let category = record.category();
        let row = record_row(record);
        self.categories
            .entry(category)
            .or_insert_with(|| Table::for_category(category))
            .push(row);
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Materializes every table, including categories that saw no records.
    pub fn finish(mut self) -> TableSet {
        let mut tables = Vec::with_capacity(Category::ALL.len() + 2);
        tables.push(self.days);
        tables.push(self.events);
        for category in Category::ALL {
            let table = self
                .categories
                .remove(&category)
                .unwrap_or_else(|| Table::for_category(category));
            tables.push(table);
        }
        TableSet {
            dialect: self.dialect,
            tables,
        }
    }
}

fn record_row(record: CategoryRecord) -> Vec<Value> {
    match record {
        CategoryRecord::SleepStart(r) => vec![r.index.into(), r.error.into()],
        CategoryRecord::SleepEnd(r) => vec![
            r.index.into(),
            r.sleeping_minutes.into(),
            Value::Text(r.wake_up_time.to_rfc3339()),
            r.bedtime.map(|bedtime| bedtime.to_rfc3339()).into(),
            r.error.into(),
        ],
        CategoryRecord::Height(r)
        | CategoryRecord::Weight(r)
        | CategoryRecord::HeadCircumference(r)
        | CategoryRecord::Temperature(r) => vec![r.index.into(), r.value.into()],
        CategoryRecord::ExpressedMilk(r) => {
            vec![r.index.into(), r.volume_ml.into(), r.in_progress.into()]
        }
        CategoryRecord::FormulaMilk(r) => vec![r.index.into(), r.volume_ml.into()],
        CategoryRecord::Breastfeeding(r) => vec![
            r.index.into(),
            r.volume_ml.into(),
            r.left_minutes.into(),
            r.right_minutes.into(),
            r.order.map(|order| order.as_str()).into(),
        ],
        CategoryRecord::Diaper(r) => vec![
            r.index.into(),
            r.volume.as_str().into(),
            r.consistency.as_str().into(),
        ],
        CategoryRecord::ClinicVisit(r) | CategoryRecord::Vaccination(r) => {
            vec![r.index.into(), r.text.into()]
        }
    }
}
