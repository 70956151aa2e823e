//! The application schema the generated script populates, plus a baseline
//! data set standing in for the rows the application's own evolutions create
//! before the seed script ever runs. Both are only used for verification:
//! the script itself assumes the schema already exists.

use crate::config::Existing;
use crate::sql::{InsertBuilder, SqlValue};

/// SQL schema for the travel application database.
/// Creates all tables with proper constraints, foreign keys, and indexes.
pub const SCHEMA: &str = r#"
-- Reference countries, keyed by ISO 3166-1 numeric code
CREATE TABLE IF NOT EXISTS CountryDefinition (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

-- Accounts
CREATE TABLE IF NOT EXISTS User (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    salt TEXT NOT NULL,
    creation_date TEXT NOT NULL
);

-- One profile per account
CREATE TABLE IF NOT EXISTS Profile (
    user_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    gender TEXT NOT NULL,
    creation_date TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Nationality (
    user_id INTEGER NOT NULL,
    country_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, country_id),
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE,
    FOREIGN KEY (country_id) REFERENCES CountryDefinition(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Passport (
    user_id INTEGER NOT NULL,
    country_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, country_id),
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE,
    FOREIGN KEY (country_id) REFERENCES CountryDefinition(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS TravellerTypeDefinition (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS TravellerType (
    user_id INTEGER NOT NULL,
    traveller_type_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, traveller_type_id),
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE,
    FOREIGN KEY (traveller_type_id) REFERENCES TravellerTypeDefinition(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Destination (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    district TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    country_id INTEGER NOT NULL,
    is_public INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE,
    FOREIGN KEY (country_id) REFERENCES CountryDefinition(id)
);

CREATE INDEX IF NOT EXISTS idx_destination_country ON Destination(country_id);

CREATE TABLE IF NOT EXISTS Trip (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    is_public INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE
);

-- Stops within a trip, ordered by position
CREATE TABLE IF NOT EXISTS TripData (
    trip_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    PRIMARY KEY (trip_id, position),
    FOREIGN KEY (trip_id) REFERENCES Trip(id) ON DELETE CASCADE,
    FOREIGN KEY (destination_id) REFERENCES Destination(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_trip_data_destination ON TripData(destination_id);

CREATE TABLE IF NOT EXISTS TreasureHunt (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    riddle TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES User(id) ON DELETE CASCADE,
    FOREIGN KEY (destination_id) REFERENCES Destination(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Tag (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tag_name ON Tag(name);

CREATE TABLE IF NOT EXISTS DestinationTag (
    tag_id INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    PRIMARY KEY (tag_id, destination_id),
    FOREIGN KEY (tag_id) REFERENCES Tag(id) ON DELETE CASCADE,
    FOREIGN KEY (destination_id) REFERENCES Destination(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS TripTag (
    tag_id INTEGER NOT NULL,
    trip_id INTEGER NOT NULL,
    PRIMARY KEY (tag_id, trip_id),
    FOREIGN KEY (tag_id) REFERENCES Tag(id) ON DELETE CASCADE,
    FOREIGN KEY (trip_id) REFERENCES Trip(id) ON DELETE CASCADE
);
"#;

/// Placeholder country id used by baseline destinations. ISO numeric codes
/// for real countries start at 4, so this never collides with fetched data.
const BASELINE_COUNTRY_ID: i64 = 1;

/// Rows simulating what the application's base evolutions leave behind.
///
/// The generated script assumes these rows exist and continues every id
/// sequence after them, so verification has to plant exactly as many as the
/// configured offsets claim.
pub fn baseline_sql(existing: &Existing) -> String {
    let mut out = String::new();

    let mut countries = InsertBuilder::new("CountryDefinition", &["id", "name"]);
    countries.row([
        SqlValue::from(BASELINE_COUNTRY_ID),
        SqlValue::from("Baseline Country"),
    ]);

    let mut users = InsertBuilder::new("User", &["username", "password", "salt", "creation_date"]);
    for i in 1..=existing.users {
        users.row([
            SqlValue::from(format!("baseline-user-{i}@wayfarer.test")),
            SqlValue::from("not-a-real-hash"),
            SqlValue::from("not-a-real-salt"),
            SqlValue::from("2019-01-01 00:00:00"),
        ]);
    }

    let mut definitions = InsertBuilder::new("TravellerTypeDefinition", &["description"]);
    for i in 1..=existing.traveller_types {
        definitions.row([SqlValue::from(format!("Traveller type {i}"))]);
    }

    let mut trips = InsertBuilder::new("Trip", &["user_id", "is_public"]);
    for _ in 0..existing.trips {
        trips.row([SqlValue::from(1i64), SqlValue::from(true)]);
    }

    let mut destinations = InsertBuilder::new(
        "Destination",
        &[
            "user_id",
            "name",
            "type",
            "district",
            "latitude",
            "longitude",
            "country_id",
            "is_public",
        ],
    );
    for i in 1..=existing.destinations {
        destinations.row([
            SqlValue::from(1i64),
            SqlValue::from(format!("Baseline destination {i}")),
            SqlValue::from("Town"),
            SqlValue::from("Baseline district"),
            SqlValue::from(0.0),
            SqlValue::from(0.0),
            SqlValue::from(BASELINE_COUNTRY_ID),
            SqlValue::from(true),
        ]);
    }

    let mut tags = InsertBuilder::new("Tag", &["id", "name"]);
    // BTreeMap iteration is name-ordered; ids were assigned by the evolutions
    for (name, &id) in &existing.tags {
        tags.row([SqlValue::from(id), SqlValue::from(name.as_str())]);
    }

    for builder in [countries, users, definitions, trips, destinations, tags] {
        if let Some(statement) = builder.render() {
            out.push_str(&statement);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn existing() -> Existing {
        Existing {
            users: 3,
            trips: 1,
            destinations: 64,
            traveller_types: 7,
            tags: BTreeMap::from([
                ("Russia".to_string(), 1),
                ("sports".to_string(), 2),
                ("#Wayfarer".to_string(), 3),
            ]),
        }
    }

    #[test]
    fn test_schema_and_baseline_apply_cleanly() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(&baseline_sql(&existing())).unwrap();

        let users: i64 = conn
            .query_row("SELECT COUNT(*) FROM User", [], |row| row.get(0))
            .unwrap();
        assert_eq!(users, 3);

        let destinations: i64 = conn
            .query_row("SELECT COUNT(*) FROM Destination", [], |row| row.get(0))
            .unwrap();
        assert_eq!(destinations, 64);

        let max_destination: i64 = conn
            .query_row("SELECT MAX(id) FROM Destination", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max_destination, 64);

        let tags: i64 = conn
            .query_row("SELECT COUNT(*) FROM Tag", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tags, 3);
    }

    #[test]
    fn test_baseline_ids_are_sequential_from_one() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(&baseline_sql(&existing())).unwrap();

        let max_user: i64 = conn
            .query_row("SELECT MAX(id) FROM User", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max_user, 3);

        let max_definition: i64 = conn
            .query_row("SELECT MAX(id) FROM TravellerTypeDefinition", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(max_definition, 7);
    }
}
