//! Run summary printed at the end of a seed run.

use wayfarer_types::PhotoManifest;

use crate::generate::SeedBatch;
use crate::verify::VerifyReport;

/// Statistics collected during generation
#[derive(Debug, Default)]
pub struct SeedStats {
    pub countries: usize,
    pub users: usize,
    pub destinations: usize,
    pub trips: usize,
    pub trip_legs: usize,
    pub treasure_hunts: usize,
    pub tags_minted: usize,
    pub tag_links: usize,
    pub photo_assignments: usize,
}

impl SeedStats {
    pub fn collect(batch: &SeedBatch, manifest: &PhotoManifest) -> Self {
        Self {
            countries: batch.countries.len(),
            users: batch.users.len(),
            destinations: batch.destinations.len(),
            trips: batch.trips.len(),
            trip_legs: batch.trip_legs.len(),
            treasure_hunts: batch.treasure_hunts.len(),
            tags_minted: batch.tags.len(),
            tag_links: batch.destination_tags.len() + batch.trip_tags.len(),
            photo_assignments: manifest.assignment_count(),
        }
    }

    /// Display the summary in a formatted way
    pub fn display(&self, verified: Option<&VerifyReport>) {
        println!();
        println!("Seed Summary");
        println!("============");
        println!();
        println!("Countries: {}", self.countries);
        println!("Users and profiles: {}", self.users);
        println!("Destinations: {}", self.destinations);
        println!("Trips: {} ({} legs)", self.trips, self.trip_legs);
        println!("Treasure hunts: {}", self.treasure_hunts);
        println!(
            "Tags minted: {} ({} associations)",
            self.tags_minted, self.tag_links
        );
        println!("Photo assignments: {}", self.photo_assignments);

        if let Some(report) = verified {
            println!();
            println!("Verified against the application schema:");
            for (table, count) in &report.row_counts {
                println!("  {table}: {count} rows");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_types::{Country, PhotoManifest};

    #[test]
    fn test_collect_counts_batch_and_manifest() {
        let batch = SeedBatch {
            countries: vec![Country {
                alpha2: "NZ".to_string(),
                numeric_code: 554,
                name: "New Zealand".to_string(),
            }],
            users: vec![],
            profiles: vec![],
            citizenships: vec![],
            traveller_types: vec![],
            destinations: vec![],
            trips: vec![],
            trip_legs: vec![],
            treasure_hunts: vec![],
            tags: vec![],
            destination_tags: vec![],
            trip_tags: vec![],
        };
        let mut manifest = PhotoManifest::new();
        manifest.assign("https://example.com/1.jpg", 4);
        manifest.assign("https://example.com/1.jpg", 5);

        let stats = SeedStats::collect(&batch, &manifest);
        assert_eq!(stats.countries, 1);
        assert_eq!(stats.photo_assignments, 2);
    }
}
