//! Dry-run the generated script against an in-memory SQLite database carrying
//! the application schema and baseline rows. Catches broken references and
//! malformed SQL before the script ever reaches a real database.

use std::collections::BTreeMap;

use rusqlite::Connection;
use thiserror::Error;

use crate::config::Existing;
use crate::schema;

/// Tables checked for row counts, in insert order.
const TABLES: &[&str] = &[
    "CountryDefinition",
    "User",
    "Profile",
    "Nationality",
    "Passport",
    "TravellerType",
    "Destination",
    "Trip",
    "TripData",
    "TreasureHunt",
    "Tag",
    "DestinationTag",
    "TripTag",
];

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("script failed to execute: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("foreign key violations after applying script: {0:?}")]
    ForeignKeys(Vec<String>),

    #[error("Downs section left {table} with {remaining} rows")]
    DownsIncomplete { table: String, remaining: i64 },
}

/// Row counts observed after the Ups section ran.
#[derive(Debug)]
pub struct VerifyReport {
    pub row_counts: BTreeMap<String, i64>,
}

/// Apply schema, baseline, and the Ups section; check referential integrity;
/// then apply the Downs section and confirm it clears every seeded table.
pub fn run(ups: &str, downs: &str, existing: &Existing) -> Result<VerifyReport, VerifyError> {
    let conn = Connection::open_in_memory()?;
    // Defer referential-integrity checking to `foreign_key_check` below: the
    // script inserts in dependency order but must not be rejected mid-apply, so
    // enforcement stays off during execution (the standard SQLite default, which
    // the `bundled` build otherwise flips on).
    conn.pragma_update(None, "foreign_keys", false)?;
    conn.execute_batch(schema::SCHEMA)?;
    conn.execute_batch(&schema::baseline_sql(existing))?;

    conn.execute_batch(ups)?;

    let violations = foreign_key_violations(&conn)?;
    if !violations.is_empty() {
        return Err(VerifyError::ForeignKeys(violations));
    }

    let mut row_counts = BTreeMap::new();
    for table in TABLES {
        row_counts.insert((*table).to_string(), count_rows(&conn, table)?);
    }

    conn.execute_batch(downs)?;
    for table in TABLES {
        let remaining = count_rows(&conn, table)?;
        if remaining != 0 {
            return Err(VerifyError::DownsIncomplete {
                table: (*table).to_string(),
                remaining,
            });
        }
    }

    Ok(VerifyReport { row_counts })
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64, rusqlite::Error> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
}

fn foreign_key_violations(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let rows = stmt.query_map([], |row| {
        let table: String = row.get(0)?;
        let rowid: Option<i64> = row.get(1)?;
        let parent: String = row.get(2)?;
        Ok(format!(
            "{table} row {} references missing {parent}",
            rowid.map_or_else(|| "?".to_string(), |id| id.to_string())
        ))
    })?;
    rows.collect()
}
