//! Treasure hunt rows: a masked-name riddle pointing at a destination, open
//! for a bounded window starting in the near future.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use wayfarer_types::{Destination, TreasureHunt};

use super::{country_name, GenerateError};
use crate::fetch::CountryCatalog;

/// Only lowercase letters get masked, so capitals and punctuation still give
/// the name's shape away.
static LOWERCASE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[a-z]").expect("Failed to compile mask regex"));

/// Keep the first three characters, mask the rest.
fn mask_name(name: &str) -> String {
    let prefix: String = name.chars().take(3).collect();
    let rest: String = name.chars().skip(3).collect();
    format!("{prefix}{}", LOWERCASE.replace_all(&rest, "_"))
}

fn riddle(destination_name: &str, country: &str) -> String {
    format!(
        "What is {}? Which is in {country}",
        mask_name(destination_name)
    )
}

pub fn build_treasure_hunts(
    count: u32,
    total_users: i64,
    destinations: &[Destination],
    catalog: &CountryCatalog,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<Vec<TreasureHunt>, GenerateError> {
    if count > 0 && destinations.is_empty() {
        return Err(GenerateError::NoDestinations);
    }
    if count > 0 && total_users == 0 {
        return Err(GenerateError::NoUsers);
    }

    let mut hunts = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let destination = &destinations[rng.gen_range(0..destinations.len())];
        let country = country_name(catalog, destination)?;

        let start_date = today + Duration::days(rng.gen_range(0..=100));
        let end_date = start_date + Duration::days(rng.gen_range(5..=40));

        hunts.push(TreasureHunt {
            owner_id: rng.gen_range(1..=total_users),
            destination_id: destination.id,
            riddle: riddle(&destination.name, country),
            start_date,
            end_date,
        });
    }

    Ok(hunts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::CountryRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> CountryCatalog {
        let records: Vec<CountryRecord> = serde_json::from_str(
            r#"[{"name": "New Zealand", "alpha2Code": "NZ", "numericCode": "554"}]"#,
        )
        .unwrap();
        CountryCatalog::from_records(records)
    }

    fn destination(id: i64, name: &str) -> Destination {
        Destination {
            id,
            owner_id: 1,
            name: name.to_string(),
            kind: "Town".to_string(),
            district: "Somewhere".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country_id: 554,
            is_public: true,
        }
    }

    #[test]
    fn test_mask_keeps_prefix_and_capitals() {
        assert_eq!(mask_name("Milford Sound"), "Mil____ S____");
        assert_eq!(mask_name("Ob"), "Ob");
        assert_eq!(mask_name("Lake Tekapo"), "Lak_ T_____");
    }

    #[test]
    fn test_riddle_names_the_country() {
        assert_eq!(
            riddle("Milford Sound", "New Zealand"),
            "What is Mil____ S____? Which is in New Zealand"
        );
    }

    #[test]
    fn test_hunts_reference_destinations_and_users() {
        let mut rng = StdRng::seed_from_u64(3);
        let destinations = vec![destination(65, "Milford Sound"), destination(66, "Hobbiton")];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let hunts =
            build_treasure_hunts(40, 10, &destinations, &catalog(), today, &mut rng).unwrap();

        assert_eq!(hunts.len(), 40);
        for hunt in &hunts {
            assert!([65, 66].contains(&hunt.destination_id));
            assert!((1..=10).contains(&hunt.owner_id));
            assert!(hunt.riddle.ends_with("Which is in New Zealand"));
        }
    }

    #[test]
    fn test_hunt_windows_are_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let destinations = vec![destination(65, "Milford Sound")];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let hunts =
            build_treasure_hunts(200, 10, &destinations, &catalog(), today, &mut rng).unwrap();

        for hunt in &hunts {
            let lead = (hunt.start_date - today).num_days();
            let span = (hunt.end_date - hunt.start_date).num_days();
            assert!((0..=100).contains(&lead));
            assert!((5..=40).contains(&span));
        }
    }

    #[test]
    fn test_hunts_without_destinations_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert!(matches!(
            build_treasure_hunts(1, 10, &[], &catalog(), today, &mut rng),
            Err(GenerateError::NoDestinations)
        ));
    }
}
