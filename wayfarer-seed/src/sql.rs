//! SQL text primitives: value formatting, escaping, and multi-row INSERT
//! statements. Script assembly lives in [`crate::script`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Double embedded single quotes so a value can sit inside a quoted literal.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// A single literal in a VALUES tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "'{}'", escape(v)),
            SqlValue::Bool(v) => write!(f, "{}", i32::from(*v)),
            SqlValue::Date(v) => write!(f, "'{}'", v.format("%Y-%m-%d")),
            SqlValue::DateTime(v) => write!(f, "'{}'", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::DateTime(v)
    }
}

/// Engines cap the number of terms in one compound statement (SQLite's
/// default is 500), so large inserts are split into several statements.
pub const MAX_ROWS_PER_STATEMENT: usize = 500;

/// Accumulates rows for a multi-row INSERT.
///
/// Renders one value tuple per line, starts a fresh statement every
/// [`MAX_ROWS_PER_STATEMENT`] rows, and terminates each with `;`. A builder
/// that never received a row renders nothing, so optional sections disappear
/// from the script instead of producing invalid SQL.
#[derive(Debug)]
pub struct InsertBuilder {
    header: String,
    rows: Vec<String>,
}

impl InsertBuilder {
    pub fn new(table: &str, columns: &[&str]) -> Self {
        Self::with_verb("INSERT", table, columns)
    }

    /// `INSERT OR IGNORE`, used where re-running against pre-seeded reference
    /// rows must not fail.
    pub fn or_ignore(table: &str, columns: &[&str]) -> Self {
        Self::with_verb("INSERT OR IGNORE", table, columns)
    }

    fn with_verb(verb: &str, table: &str, columns: &[&str]) -> Self {
        Self {
            header: format!("{verb} INTO {table} ({}) VALUES", columns.join(", ")),
            rows: Vec::new(),
        }
    }

    pub fn row<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = SqlValue>,
    {
        let tuple = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.rows.push(format!("({tuple})"));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Render the statement(s), or `None` when no rows were added.
    pub fn render(&self) -> Option<String> {
        if self.rows.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(self.header.len() + self.rows.len() * 32);
        for chunk in self.rows.chunks(MAX_ROWS_PER_STATEMENT) {
            out.push_str(&self.header);
            out.push('\n');
            out.push_str(&chunk.join(",\n"));
            out.push_str(";\n");
        }
        Some(out)
    }
}
