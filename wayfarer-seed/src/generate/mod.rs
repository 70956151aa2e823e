//! Row generation. Everything in here is pure and single-threaded: given the
//! fetched reference data, the parsed destinations, and an RNG, it produces
//! the in-memory rows the script renderer turns into SQL.

mod tags;
mod treasure_hunts;
mod trips;
mod users;

pub use tags::{tag_destinations, tag_trips, TagRegistry};
pub use treasure_hunts::build_treasure_hunts;
pub use trips::{build_trip_legs, build_trips};
pub use users::{assign_citizenships, assign_traveller_types, build_users, capitalize, UserBatch};

use chrono::NaiveDate;
use rand::Rng;
use thiserror::Error;
use wayfarer_types::{
    Citizenship, Country, Destination, DestinationTag, GeneratedProfile, GeneratedUser, Tag,
    TravellerTypeAssignment, TreasureHunt, Trip, TripLeg, TripTag,
};

use crate::config::Existing;
use crate::fetch::{CountryCatalog, Persona};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("destination {destination_id} references country code {code} missing from the catalog")]
    UnknownCountry { destination_id: i64, code: i64 },

    #[error("cannot generate trips or treasure hunts without destinations")]
    NoDestinations,

    #[error("cannot generate trips or treasure hunts without users")]
    NoUsers,
}

/// How many of each entity to invent on top of the destinations CSV.
#[derive(Debug, Clone, Copy)]
pub struct Counts {
    pub trips: u32,
    pub treasure_hunts: u32,
}

/// Everything the script renderer needs, in insert order.
#[derive(Debug)]
pub struct SeedBatch {
    pub countries: Vec<Country>,
    pub users: Vec<GeneratedUser>,
    pub profiles: Vec<GeneratedProfile>,
    pub citizenships: Vec<Citizenship>,
    pub traveller_types: Vec<TravellerTypeAssignment>,
    pub destinations: Vec<Destination>,
    pub trips: Vec<Trip>,
    pub trip_legs: Vec<TripLeg>,
    pub treasure_hunts: Vec<TreasureHunt>,
    pub tags: Vec<Tag>,
    pub destination_tags: Vec<DestinationTag>,
    pub trip_tags: Vec<TripTag>,
}

/// Run every generation stage in dependency order.
pub fn generate(
    catalog: &CountryCatalog,
    personas: &[Persona],
    destinations: Vec<Destination>,
    counts: Counts,
    existing: &Existing,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<SeedBatch, GenerateError> {
    let batch = users::build_users(personas, existing.users, rng);
    let citizenships = users::assign_citizenships(&batch.users, catalog, rng);
    let traveller_types =
        users::assign_traveller_types(&batch.users, existing.traveller_types, rng);

    let total_users = existing.users + batch.users.len() as i64;

    let trips = trips::build_trips(counts.trips, total_users, existing.trips, rng)?;
    let trip_legs = trips::build_trip_legs(&trips, &destinations, rng)?;

    let treasure_hunts = treasure_hunts::build_treasure_hunts(
        counts.treasure_hunts,
        total_users,
        &destinations,
        catalog,
        today,
        rng,
    )?;

    let mut registry = TagRegistry::new(&existing.tags);
    let destination_tags = tags::tag_destinations(&mut registry, &destinations, catalog)?;
    let trip_tags = tags::tag_trips(&mut registry, &trip_legs, &destinations, catalog)?;

    Ok(SeedBatch {
        countries: catalog.all().to_vec(),
        users: batch.users,
        profiles: batch.profiles,
        citizenships,
        traveller_types,
        destinations,
        trips,
        trip_legs,
        treasure_hunts,
        tags: registry.into_new_tags(),
        destination_tags,
        trip_tags,
    })
}

/// Look up a destination's country, which must have come from the catalog.
fn country_name<'a>(
    catalog: &'a CountryCatalog,
    destination: &Destination,
) -> Result<&'a str, GenerateError> {
    catalog
        .get_by_code(destination.country_id)
        .map(|c| c.name.as_str())
        .ok_or(GenerateError::UnknownCountry {
            destination_id: destination.id,
            code: destination.country_id,
        })
}
