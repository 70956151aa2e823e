//! Loader for the static destinations CSV.
//!
//! Each row becomes one Destination row in the generated script. Row order is
//! significant: row `i` is assigned id `existing + i + 1`, and later stages
//! (trip legs, treasure hunts, tags) reference destinations by those ids.

use std::fs::File;
use std::io;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use wayfarer_types::Destination;

use crate::fetch::CountryCatalog;

#[derive(Error, Debug)]
pub enum DestinationError {
    #[error("failed to open destinations file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed destinations CSV at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} references unknown country code {code:?}")]
    UnknownCountry { row: usize, code: String },
}

/// One CSV row: owner, name, type, district, latitude, longitude, alpha-2
/// country code. The file carries no header.
#[derive(Debug, Deserialize)]
struct DestinationRow {
    owner_id: i64,
    name: String,
    kind: String,
    district: String,
    latitude: f64,
    longitude: f64,
    country_code: String,
}

/// Countries the API does not list get folded into a listed neighbour.
fn remap_country_code(code: &str) -> &str {
    match code {
        // Kosovo has no ISO numeric code of its own
        "XK" => "RS",
        other => other,
    }
}

pub fn load_destinations_file(
    path: &Path,
    catalog: &CountryCatalog,
    existing: i64,
    rng: &mut impl Rng,
) -> Result<Vec<Destination>, DestinationError> {
    let file = File::open(path).map_err(|source| DestinationError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_destinations(file, catalog, existing, rng)
}

pub fn load_destinations<R: io::Read>(
    reader: R,
    catalog: &CountryCatalog,
    existing: i64,
    rng: &mut impl Rng,
) -> Result<Vec<Destination>, DestinationError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut destinations = Vec::new();
    for (index, record) in csv_reader.deserialize::<DestinationRow>().enumerate() {
        let row_number = index + 1;
        let row = record.map_err(|source| DestinationError::Csv {
            row: row_number,
            source,
        })?;

        let code = remap_country_code(&row.country_code);
        let country = catalog
            .get(code)
            .ok_or_else(|| DestinationError::UnknownCountry {
                row: row_number,
                code: row.country_code.clone(),
            })?;

        destinations.push(Destination {
            id: existing + index as i64 + 1,
            owner_id: row.owner_id,
            name: row.name,
            kind: row.kind,
            district: row.district,
            latitude: row.latitude,
            longitude: row.longitude,
            country_id: country.numeric_code,
            is_public: rng.gen_bool(0.5),
        });
    }

    Ok(destinations)
}
