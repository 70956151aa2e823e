use std::collections::BTreeMap;
use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,alpha2Code,numericCode";
const DEFAULT_PERSONAS_URL: &str = "https://randomuser.me/api/";

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub countries_url: String,
    pub personas_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Rows already present in the target schema before the generated script runs.
/// Generated ids start after these offsets so the script can be applied on top
/// of the application's base evolutions.
#[derive(Debug, Clone, Deserialize)]
pub struct Existing {
    pub users: i64,
    pub trips: i64,
    pub destinations: i64,
    pub traveller_types: i64,
    /// Tags seeded by the base evolutions, name -> id.
    #[serde(default = "default_existing_tags")]
    pub tags: BTreeMap<String, i64>,
}

fn default_existing_tags() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("Russia".to_string(), 1),
        ("sports".to_string(), 2),
        ("#Wayfarer".to_string(), 3),
    ])
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub existing: Existing,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from seeder.toml (optional)
        let config_file_name = "seeder.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in wayfarer-seed directory (for development)
        let dev_path = PathBuf::from("wayfarer-seed").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        // 2. Defaults, overridable by file and environment
        builder = builder
            .set_default("api.countries_url", DEFAULT_COUNTRIES_URL)?
            .set_default("api.personas_url", DEFAULT_PERSONAS_URL)?
            .set_default("api.user_agent", "WayfarerSeeder/0.1")?
            .set_default("api.timeout_secs", 30)?
            .set_default("existing.users", 3)?
            .set_default("existing.trips", 1)?
            .set_default("existing.destinations", 64)?
            .set_default("existing.traveller_types", 7)?;

        // 3. Environment variables take highest priority
        if let Ok(url) = std::env::var("WAYFARER_COUNTRIES_URL") {
            builder = builder.set_override("api.countries_url", url)?;
        }
        if let Ok(url) = std::env::var("WAYFARER_PERSONAS_URL") {
            builder = builder.set_override("api.personas_url", url)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
