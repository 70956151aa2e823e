//! Tag bookkeeping: merge destination-derived and trip-derived tag names with
//! the tag set already present in the target schema, assigning dense
//! sequential ids to whatever this run mints.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use wayfarer_types::{Destination, DestinationTag, Tag, TripLeg, TripTag};

use super::{country_name, GenerateError};
use crate::fetch::CountryCatalog;

/// Name -> id map seeded with the pre-existing tags. Names are compared
/// exactly, on the raw text; SQL escaping happens at emission time and never
/// influences tag identity.
#[derive(Debug)]
pub struct TagRegistry {
    ids: HashMap<String, i64>,
    next_id: i64,
    minted: Vec<Tag>,
}

impl TagRegistry {
    pub fn new(existing: &BTreeMap<String, i64>) -> Self {
        Self {
            ids: existing
                .iter()
                .map(|(name, &id)| (name.clone(), id))
                .collect(),
            next_id: existing.len() as i64 + 1,
            minted: Vec::new(),
        }
    }

    /// Return the id for a known name, or assign the next id to a new one.
    pub fn resolve(&mut self, name: &str) -> i64 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(name.to_string(), id);
        self.minted.push(Tag {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Tags minted by this run, in id order. Pre-existing tags are excluded:
    /// they are already in the database and must not be re-inserted.
    pub fn new_tags(&self) -> &[Tag] {
        &self.minted
    }

    pub fn into_new_tags(self) -> Vec<Tag> {
        self.minted
    }
}

/// Tag names derived from one destination: the full destination name, each of
/// its words, the country name, and each of its words.
fn destination_tag_names(destination: &Destination, country: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    names.insert(destination.name.clone());
    names.extend(destination.name.split_whitespace().map(String::from));
    names.insert(country.to_string());
    names.extend(country.split_whitespace().map(String::from));
    names
}

pub fn tag_destinations(
    registry: &mut TagRegistry,
    destinations: &[Destination],
    catalog: &CountryCatalog,
) -> Result<Vec<DestinationTag>, GenerateError> {
    let mut associations = Vec::new();

    for destination in destinations {
        let country = country_name(catalog, destination)?;
        for name in destination_tag_names(destination, country) {
            associations.push(DestinationTag {
                tag_id: registry.resolve(&name),
                destination_id: destination.id,
            });
        }
    }

    Ok(associations)
}

/// Trip tags carry only the full destination and country names of the trip's
/// legs; words are not split out the way they are for destinations.
pub fn tag_trips(
    registry: &mut TagRegistry,
    legs: &[TripLeg],
    destinations: &[Destination],
    catalog: &CountryCatalog,
) -> Result<Vec<TripTag>, GenerateError> {
    let by_id: HashMap<i64, &Destination> =
        destinations.iter().map(|d| (d.id, d)).collect();

    let mut names_per_trip: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
    for leg in legs {
        // legs are built from the same destination list, so the lookup holds
        let Some(destination) = by_id.get(&leg.destination_id) else {
            continue;
        };
        let country = country_name(catalog, destination)?;
        let names = names_per_trip.entry(leg.trip_id).or_default();
        names.insert(destination.name.clone());
        names.insert(country.to_string());
    }

    let mut associations = Vec::new();
    for (trip_id, names) in names_per_trip {
        for name in names {
            associations.push(TripTag {
                tag_id: registry.resolve(&name),
                trip_id,
            });
        }
    }

    Ok(associations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::CountryRecord;
    use proptest::prelude::*;

    fn existing() -> BTreeMap<String, i64> {
        BTreeMap::from([
            ("Russia".to_string(), 1),
            ("sports".to_string(), 2),
            ("#Wayfarer".to_string(), 3),
        ])
    }

    fn catalog() -> CountryCatalog {
        let records: Vec<CountryRecord> = serde_json::from_str(
            r#"[
                {"name": "New Zealand", "alpha2Code": "NZ", "numericCode": "554"},
                {"name": "Russia", "alpha2Code": "RU", "numericCode": "643"}
            ]"#,
        )
        .unwrap();
        CountryCatalog::from_records(records)
    }

    fn destination(id: i64, name: &str, country_id: i64) -> Destination {
        Destination {
            id,
            owner_id: 1,
            name: name.to_string(),
            kind: "Town".to_string(),
            district: "Somewhere".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country_id,
            is_public: true,
        }
    }

    #[test]
    fn test_fresh_ids_start_after_existing_set() {
        let mut registry = TagRegistry::new(&existing());
        assert_eq!(registry.resolve("Hobbiton"), 4);
        assert_eq!(registry.resolve("Milford"), 5);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut registry = TagRegistry::new(&existing());
        let first = registry.resolve("Hobbiton");
        assert_eq!(registry.resolve("Hobbiton"), first);
        assert_eq!(registry.new_tags().len(), 1);
    }

    #[test]
    fn test_existing_names_reuse_their_ids_and_are_not_minted() {
        let mut registry = TagRegistry::new(&existing());
        assert_eq!(registry.resolve("Russia"), 1);
        assert_eq!(registry.resolve("sports"), 2);
        assert!(registry.new_tags().is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = TagRegistry::new(&existing());
        let lower = registry.resolve("hobbiton");
        let upper = registry.resolve("Hobbiton");
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_destination_tags_include_name_and_country_words() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![destination(65, "Milford Sound", 554)];

        let associations =
            tag_destinations(&mut registry, &destinations, &catalog()).unwrap();

        let names: BTreeSet<_> = registry
            .new_tags()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        let expected: BTreeSet<String> =
            ["Milford Sound", "Milford", "Sound", "New Zealand", "New", "Zealand"]
                .into_iter()
                .map(String::from)
                .collect();
        assert_eq!(names, expected);
        assert_eq!(associations.len(), 6);
        assert!(associations.iter().all(|a| a.destination_id == 65));
    }

    #[test]
    fn test_single_word_names_do_not_double_tag() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![destination(65, "Hobbiton", 554)];

        let associations =
            tag_destinations(&mut registry, &destinations, &catalog()).unwrap();

        // Hobbiton + New Zealand + New + Zealand; the full name equals its
        // only word and must appear once
        assert_eq!(associations.len(), 4);
        let ids: BTreeSet<_> = associations.iter().map(|a| a.tag_id).collect();
        assert_eq!(ids.len(), associations.len());
    }

    #[test]
    fn test_shared_names_resolve_to_one_id_across_destinations() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![
            destination(65, "Milford Sound", 554),
            destination(66, "Milford Village", 554),
        ];

        let associations =
            tag_destinations(&mut registry, &destinations, &catalog()).unwrap();

        let milford = registry.resolve("Milford");
        let tagged: Vec<_> = associations
            .iter()
            .filter(|a| a.tag_id == milford)
            .map(|a| a.destination_id)
            .collect();
        assert_eq!(tagged, vec![65, 66]);
    }

    #[test]
    fn test_existing_country_tag_is_reused_not_reinserted() {
        let mut registry = TagRegistry::new(&existing());
        let destinations = vec![destination(65, "Red Square", 643)];

        let associations =
            tag_destinations(&mut registry, &destinations, &catalog()).unwrap();

        // "Russia" resolves to the pre-existing id 1
        assert!(associations.iter().any(|a| a.tag_id == 1));
        assert!(registry.new_tags().iter().all(|t| t.name != "Russia"));
    }

    #[test]
    fn test_trip_tags_use_full_names_only() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![destination(65, "Milford Sound", 554)];
        let legs = vec![TripLeg {
            trip_id: 2,
            position: 1,
            destination_id: 65,
        }];

        let trip_tags =
            tag_trips(&mut registry, &legs, &destinations, &catalog()).unwrap();

        let names: BTreeSet<_> = registry
            .new_tags()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        let expected: BTreeSet<String> = ["Milford Sound", "New Zealand"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, expected);
        assert_eq!(trip_tags.len(), 2);
        assert!(trip_tags.iter().all(|t| t.trip_id == 2));
    }

    #[test]
    fn test_trip_and_destination_tags_share_ids() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![destination(65, "Milford Sound", 554)];
        let legs = vec![TripLeg {
            trip_id: 2,
            position: 1,
            destination_id: 65,
        }];

        tag_destinations(&mut registry, &destinations, &catalog()).unwrap();
        let minted_before = registry.new_tags().len();
        let trip_tags =
            tag_trips(&mut registry, &legs, &destinations, &catalog()).unwrap();

        // the trip pass mints nothing new: both its names already exist
        assert_eq!(registry.new_tags().len(), minted_before);
        let full_name = registry.resolve("Milford Sound");
        assert!(trip_tags.iter().any(|t| t.tag_id == full_name));
    }

    #[test]
    fn test_multi_leg_trip_tags_are_deduplicated() {
        let mut registry = TagRegistry::new(&BTreeMap::new());
        let destinations = vec![
            destination(65, "Milford Sound", 554),
            destination(66, "Hobbiton", 554),
        ];
        let legs = vec![
            TripLeg {
                trip_id: 2,
                position: 1,
                destination_id: 65,
            },
            TripLeg {
                trip_id: 2,
                position: 2,
                destination_id: 66,
            },
        ];

        let trip_tags =
            tag_trips(&mut registry, &legs, &destinations, &catalog()).unwrap();

        // "New Zealand" is shared by both legs but tagged once
        assert_eq!(trip_tags.len(), 3);
        let ids: BTreeSet<_> = trip_tags.iter().map(|t| t.tag_id).collect();
        assert_eq!(ids.len(), trip_tags.len());
    }

    proptest! {
        #[test]
        fn prop_minted_ids_are_dense_and_stable(names in prop::collection::vec("[A-Za-z #]{1,12}", 0..40)) {
            let seed = existing();
            let mut registry = TagRegistry::new(&seed);

            let first_pass: Vec<i64> = names.iter().map(|n| registry.resolve(n)).collect();
            let second_pass: Vec<i64> = names.iter().map(|n| registry.resolve(n)).collect();
            prop_assert_eq!(first_pass, second_pass);

            for (i, tag) in registry.new_tags().iter().enumerate() {
                prop_assert_eq!(tag.id, seed.len() as i64 + i as i64 + 1);
                prop_assert!(!seed.contains_key(&tag.name));
            }
        }
    }
}
