use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Gender;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// Reference country as listed by the public countries API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, e.g. "NZ"
    pub alpha2: String,
    /// ISO 3166-1 numeric code, used as the primary key in the target schema
    pub numeric_code: i64,
    pub name: String,
}

/// Account row destined for the User table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    #[serde(with = "datetime_format")]
    pub created: DateTime<Utc>,
}

/// Profile row paired one-to-one with a generated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProfile {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(with = "datetime_format")]
    pub created: DateTime<Utc>,
}

/// (user, country) pair. The same pair seeds both the Nationality and the
/// Passport tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizenship {
    pub user_id: i64,
    pub country_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravellerTypeAssignment {
    pub user_id: i64,
    pub traveller_type_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub kind: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country_id: i64,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub owner_id: i64,
    pub is_public: bool,
}

/// One stop of a trip. Positions are contiguous starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripLeg {
    pub trip_id: i64,
    pub position: u32,
    pub destination_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureHunt {
    pub owner_id: i64,
    pub destination_id: i64,
    pub riddle: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationTag {
    pub tag_id: i64,
    pub destination_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTag {
    pub tag_id: i64,
    pub trip_id: i64,
}
