//! Turns a [`SeedBatch`] into the final migration script: an Ups section of
//! multi-row inserts in foreign-key order and a Downs section that clears the
//! seeded tables again.

use crate::generate::SeedBatch;
use crate::sql::{InsertBuilder, SqlValue};

/// Tables the Downs section clears, in reverse foreign-key order.
const DOWN_TABLES: &[&str] = &[
    "TripTag",
    "DestinationTag",
    "Tag",
    "TreasureHunt",
    "TripData",
    "Trip",
    "Destination",
    "TravellerType",
    "Passport",
    "Nationality",
    "Profile",
    "User",
    "CountryDefinition",
];

/// Render the Ups section. Section order follows the schema's foreign keys;
/// ids are written explicitly so a mismatch with the configured offsets fails
/// loudly on a primary-key conflict instead of silently mis-referencing rows.
pub fn render_ups(batch: &SeedBatch) -> String {
    let mut sections: Vec<InsertBuilder> = Vec::new();

    let mut countries = InsertBuilder::or_ignore("CountryDefinition", &["id", "name"]);
    for country in &batch.countries {
        countries.row([
            SqlValue::from(country.numeric_code),
            SqlValue::from(country.name.as_str()),
        ]);
    }
    sections.push(countries);

    let mut users = InsertBuilder::new(
        "User",
        &["id", "username", "password", "salt", "creation_date"],
    );
    for user in &batch.users {
        users.row([
            SqlValue::from(user.id),
            SqlValue::from(user.email.as_str()),
            SqlValue::from(user.password_hash.as_str()),
            SqlValue::from(user.salt.as_str()),
            SqlValue::from(user.created),
        ]);
    }
    sections.push(users);

    let mut profiles = InsertBuilder::new(
        "Profile",
        &[
            "user_id",
            "first_name",
            "last_name",
            "date_of_birth",
            "gender",
            "creation_date",
        ],
    );
    for profile in &batch.profiles {
        profiles.row([
            SqlValue::from(profile.user_id),
            SqlValue::from(profile.first_name.as_str()),
            SqlValue::from(profile.last_name.as_str()),
            SqlValue::from(profile.date_of_birth),
            SqlValue::from(profile.gender.as_str()),
            SqlValue::from(profile.created),
        ]);
    }
    sections.push(profiles);

    // the same (user, country) pairs feed both tables
    for table in ["Nationality", "Passport"] {
        let mut builder = InsertBuilder::new(table, &["user_id", "country_id"]);
        for citizenship in &batch.citizenships {
            builder.row([
                SqlValue::from(citizenship.user_id),
                SqlValue::from(citizenship.country_id),
            ]);
        }
        sections.push(builder);
    }

    let mut traveller_types =
        InsertBuilder::new("TravellerType", &["user_id", "traveller_type_id"]);
    for assignment in &batch.traveller_types {
        traveller_types.row([
            SqlValue::from(assignment.user_id),
            SqlValue::from(assignment.traveller_type_id),
        ]);
    }
    sections.push(traveller_types);

    let mut destinations = InsertBuilder::new(
        "Destination",
        &[
            "id",
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
    for destination in &batch.destinations {
        destinations.row([
            SqlValue::from(destination.id),
            SqlValue::from(destination.owner_id),
            SqlValue::from(destination.name.as_str()),
            SqlValue::from(destination.kind.as_str()),
            SqlValue::from(destination.district.as_str()),
            SqlValue::from(destination.latitude),
            SqlValue::from(destination.longitude),
            SqlValue::from(destination.country_id),
            SqlValue::from(destination.is_public),
        ]);
    }
    sections.push(destinations);

    let mut trips = InsertBuilder::new("Trip", &["id", "user_id", "is_public"]);
    for trip in &batch.trips {
        trips.row([
            SqlValue::from(trip.id),
            SqlValue::from(trip.owner_id),
            SqlValue::from(trip.is_public),
        ]);
    }
    sections.push(trips);

    let mut trip_legs =
        InsertBuilder::new("TripData", &["trip_id", "position", "destination_id"]);
    for leg in &batch.trip_legs {
        trip_legs.row([
            SqlValue::from(leg.trip_id),
            SqlValue::from(leg.position),
            SqlValue::from(leg.destination_id),
        ]);
    }
    sections.push(trip_legs);

    let mut hunts = InsertBuilder::new(
        "TreasureHunt",
        &["user_id", "destination_id", "riddle", "start_date", "end_date"],
    );
    for hunt in &batch.treasure_hunts {
        hunts.row([
            SqlValue::from(hunt.owner_id),
            SqlValue::from(hunt.destination_id),
            SqlValue::from(hunt.riddle.as_str()),
            SqlValue::from(hunt.start_date),
            SqlValue::from(hunt.end_date),
        ]);
    }
    sections.push(hunts);

    let mut tags = InsertBuilder::new("Tag", &["id", "name"]);
    for tag in &batch.tags {
        tags.row([SqlValue::from(tag.id), SqlValue::from(tag.name.as_str())]);
    }
    sections.push(tags);

    let mut destination_tags =
        InsertBuilder::new("DestinationTag", &["tag_id", "destination_id"]);
    for link in &batch.destination_tags {
        destination_tags.row([
            SqlValue::from(link.tag_id),
            SqlValue::from(link.destination_id),
        ]);
    }
    sections.push(destination_tags);

    let mut trip_tags = InsertBuilder::new("TripTag", &["tag_id", "trip_id"]);
    for link in &batch.trip_tags {
        trip_tags.row([SqlValue::from(link.tag_id), SqlValue::from(link.trip_id)]);
    }
    sections.push(trip_tags);

    let mut out = String::new();
    for section in sections {
        if let Some(statement) = section.render() {
            out.push_str(&statement);
        }
    }
    out
}

pub fn render_downs() -> String {
    let mut out = String::new();
    for table in DOWN_TABLES {
        out.push_str(&format!("DELETE FROM {table};\n"));
    }
    out
}

/// The complete migration script as written to disk.
pub fn render_script(batch: &SeedBatch) -> String {
    format!(
        "-- !Ups\n{}\n-- !Downs\n{}",
        render_ups(batch),
        render_downs()
    )
}
