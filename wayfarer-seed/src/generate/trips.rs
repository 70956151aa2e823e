//! Trip rows and their legs.

use std::collections::HashSet;

use rand::Rng;
use wayfarer_types::{Destination, Trip, TripLeg};

use super::GenerateError;

/// Trips owned by random users (existing ones included). Trip ids continue
/// the table's sequence after the existing rows.
pub fn build_trips(
    count: u32,
    total_users: i64,
    existing_trips: i64,
    rng: &mut impl Rng,
) -> Result<Vec<Trip>, GenerateError> {
    if count > 0 && total_users == 0 {
        return Err(GenerateError::NoUsers);
    }

    Ok((0..count)
        .map(|i| Trip {
            id: existing_trips + i64::from(i) + 1,
            owner_id: rng.gen_range(1..=total_users),
            is_public: rng.gen_bool(0.5),
        })
        .collect())
}

/// 1..=4 legs per trip at positions 1..n, each leg visiting a distinct
/// destination. Duplicate draws are re-rolled, so the leg count is capped at
/// the number of available destinations.
pub fn build_trip_legs(
    trips: &[Trip],
    destinations: &[Destination],
    rng: &mut impl Rng,
) -> Result<Vec<TripLeg>, GenerateError> {
    if !trips.is_empty() && destinations.is_empty() {
        return Err(GenerateError::NoDestinations);
    }

    let max_legs = destinations.len().min(4) as u32;
    let mut legs = Vec::new();

    for trip in trips {
        let mut used = HashSet::new();
        for position in 1..=rng.gen_range(1..=max_legs) {
            let mut destination_id = destinations[rng.gen_range(0..destinations.len())].id;
            while used.contains(&destination_id) {
                destination_id = destinations[rng.gen_range(0..destinations.len())].id;
            }
            used.insert(destination_id);

            legs.push(TripLeg {
                trip_id: trip.id,
                position,
                destination_id,
            });
        }
    }

    Ok(legs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn destinations(ids: &[i64]) -> Vec<Destination> {
        ids.iter()
            .map(|&id| Destination {
                id,
                owner_id: 1,
                name: format!("Place {id}"),
                kind: "Town".to_string(),
                district: "Somewhere".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                country_id: 554,
                is_public: true,
            })
            .collect()
    }

    #[test]
    fn test_trip_ids_continue_after_existing_rows() {
        let mut rng = StdRng::seed_from_u64(11);
        let trips = build_trips(3, 10, 1, &mut rng).unwrap();

        assert_eq!(
            trips.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert!(trips.iter().all(|t| (1..=10).contains(&t.owner_id)));
    }

    #[test]
    fn test_trips_without_users_is_an_error() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(matches!(
            build_trips(1, 0, 0, &mut rng),
            Err(GenerateError::NoUsers)
        ));
    }

    #[test]
    fn test_legs_visit_distinct_destinations_with_contiguous_positions() {
        let mut rng = StdRng::seed_from_u64(11);
        let trips = build_trips(50, 10, 0, &mut rng).unwrap();
        let destinations = destinations(&[65, 66, 67, 68, 69, 70]);

        let legs = build_trip_legs(&trips, &destinations, &mut rng).unwrap();

        for trip in &trips {
            let mine: Vec<_> = legs.iter().filter(|l| l.trip_id == trip.id).collect();
            assert!(!mine.is_empty() && mine.len() <= 4);

            let positions: Vec<_> = mine.iter().map(|l| l.position).collect();
            assert_eq!(positions, (1..=mine.len() as u32).collect::<Vec<_>>());

            let visited: HashSet<_> = mine.iter().map(|l| l.destination_id).collect();
            assert_eq!(visited.len(), mine.len());
        }
    }

    #[test]
    fn test_leg_count_capped_by_destination_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let trips = build_trips(20, 10, 0, &mut rng).unwrap();
        let destinations = destinations(&[65, 66]);

        let legs = build_trip_legs(&trips, &destinations, &mut rng).unwrap();
        for trip in &trips {
            assert!(legs.iter().filter(|l| l.trip_id == trip.id).count() <= 2);
        }
    }

    #[test]
    fn test_legs_reference_destination_ids_not_indices() {
        let mut rng = StdRng::seed_from_u64(11);
        let trips = build_trips(10, 10, 0, &mut rng).unwrap();
        let destinations = destinations(&[65, 66, 67]);

        let legs = build_trip_legs(&trips, &destinations, &mut rng).unwrap();
        assert!(legs.iter().all(|l| l.destination_id >= 65));
    }

    #[test]
    fn test_legs_without_destinations_is_an_error() {
        let mut rng = StdRng::seed_from_u64(11);
        let trips = build_trips(1, 10, 0, &mut rng).unwrap();
        assert!(matches!(
            build_trip_legs(&trips, &[], &mut rng),
            Err(GenerateError::NoDestinations)
        ));
    }
}
