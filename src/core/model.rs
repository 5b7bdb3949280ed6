// ComboStats - core/model.rs
//
// Core data model types: typed cell values, column schema, and the
// immutable in-memory table that flows through filtering, display,
// and export. Pure data definitions with no I/O and no UI.

use crate::util::constants::DATE_FORMAT;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// Column types
// =============================================================================

/// Semantic type of a column, declared per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Date,
    Boolean,
}

impl ColumnType {
    /// True for types that have a numeric view (`Value::as_f64`).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnType::Text)
    }
}

// =============================================================================
// Values
// =============================================================================

/// A single table cell.
///
/// `Null` is the "missing" marker: it is produced for SQL NULLs and for any
/// value that fails conversion to the column's declared type. Null never
/// satisfies a range, substring, or equality predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a raw value to the declared column type.
    ///
    /// Failed conversions yield `Value::Null` rather than an error.
    pub fn coerce(self, ty: ColumnType) -> Value {
        match ty {
            ColumnType::Integer => match self {
                Value::Int(i) => Value::Int(i),
                Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Value::Int(f as i64),
                Value::Bool(b) => Value::Int(i64::from(b)),
                Value::Text(s) => parse_integer(&s).map_or(Value::Null, Value::Int),
                _ => Value::Null,
            },
            ColumnType::Float => match self {
                Value::Int(i) => Value::Float(i as f64),
                Value::Float(f) if f.is_finite() => Value::Float(f),
                Value::Text(s) => parse_float(&s).map_or(Value::Null, Value::Float),
                _ => Value::Null,
            },
            ColumnType::Text => match self {
                Value::Null => Value::Null,
                Value::Text(s) => Value::Text(s),
                other => Value::Text(other.key()),
            },
            ColumnType::Date => match self {
                Value::Date(d) => Value::Date(d),
                Value::Text(s) => parse_date(&s).map_or(Value::Null, Value::Date),
                _ => Value::Null,
            },
            ColumnType::Boolean => match self {
                Value::Bool(b) => Value::Bool(b),
                Value::Int(0) => Value::Bool(false),
                Value::Int(1) => Value::Bool(true),
                Value::Text(s) => parse_bool(&s).map_or(Value::Null, Value::Bool),
                _ => Value::Null,
            },
        }
    }

    /// Numeric view used by range predicates, sorting, and charts.
    ///
    /// Dates map to days since the common era so they order correctly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Date(d) => Some(f64::from(d.num_days_from_ce())),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::Null => None,
        }
    }

    /// Canonical string form: membership key, table display, and CSV field.
    pub fn key(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::Bool(b) => b.to_string(),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        parse_float(s)
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let parsed = s
        .parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok())?;
    parsed.is_finite().then_some(parsed)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "oui" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "non" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Schema
// =============================================================================

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column called `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

// =============================================================================
// Table
// =============================================================================

/// One record, positionally aligned with the table schema.
pub type Row = Vec<Value>;

/// An ordered, immutable sequence of rows with a fixed schema.
///
/// Every filtering, sorting, or paging operation builds a new `Table`;
/// row positions in the new table are contiguous from zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table. Rows shorter than the schema are padded with `Null`,
    /// longer rows are truncated.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        let width = schema.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { schema, rows }
    }

    /// A table with the same schema and a new set of rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self::new(self.schema.clone(), rows)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name)
            .map(|idx| self.schema.columns()[idx].ty)
    }

    /// The cell at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)
    }

    /// Observed `(min, max)` of a column's numeric view, ignoring missing
    /// values. `None` if the column is absent or has no numeric values.
    pub fn numeric_bounds(&self, name: &str) -> Option<(f64, f64)> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .filter_map(|row| row[col].as_f64())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Distinct non-missing values of a column, as membership keys.
    pub fn distinct_keys(&self, name: &str) -> BTreeSet<String> {
        let Some(col) = self.column_index(name) else {
            return BTreeSet::new();
        };
        self.rows
            .iter()
            .filter(|row| !row[col].is_null())
            .map(|row| row[col].key())
            .collect()
    }
}
