//! Clients for the two public reference APIs: the country listing used to
//! populate the CountryDefinition table, and the synthetic-persona service
//! used to invent user accounts and profiles.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use wayfarer_types::{Country, Gender};

use crate::config::Api;

/// The persona service rejects batches above this size.
pub const PERSONA_BATCH_CAP: u32 = 5000;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("persona batches are capped at {PERSONA_BATCH_CAP} results, requested {requested}")]
    BatchTooLarge { requested: u32 },
}

/// Country record as returned by the countries API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    pub alpha2_code: String,
    /// The API serializes the ISO numeric code as a string and omits it for
    /// some territories.
    pub numeric_code: Option<String>,
}

/// Synthetic persona as returned by the persona API.
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub gender: Gender,
    pub name: PersonaName,
    pub email: String,
    pub login: PersonaLogin,
    pub dob: DatedField,
    pub registered: DatedField,
    pub picture: PersonaPicture,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaLogin {
    pub password: String,
    pub sha1: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatedField {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaPicture {
    pub large: String,
}

#[derive(Debug, Deserialize)]
struct PersonaBatch {
    results: Vec<Persona>,
}

/// The fetched country list plus an alpha-2 lookup index.
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    countries: Vec<Country>,
    by_alpha2: HashMap<String, usize>,
    by_code: HashMap<i64, usize>,
}

impl CountryCatalog {
    /// Build the catalog from raw API records.
    ///
    /// Records without a parsable numeric code are dropped, and a numeric
    /// code seen twice keeps its first record.
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        let mut countries = Vec::with_capacity(records.len());
        let mut by_alpha2 = HashMap::new();
        let mut by_code = HashMap::new();
        let mut seen_codes = HashSet::new();

        for record in records {
            let Some(code) = record
                .numeric_code
                .as_deref()
                .and_then(|c| c.parse::<i64>().ok())
            else {
                tracing::debug!("skipping country without numeric code: {}", record.name);
                continue;
            };
            if !seen_codes.insert(code) {
                continue;
            }
            let index = countries.len();
            countries.push(Country {
                alpha2: record.alpha2_code.clone(),
                numeric_code: code,
                name: record.name,
            });
            by_alpha2.entry(record.alpha2_code).or_insert(index);
            by_code.insert(code, index);
        }

        Self {
            countries,
            by_alpha2,
            by_code,
        }
    }

    pub fn get(&self, alpha2: &str) -> Option<&Country> {
        self.by_alpha2.get(alpha2).map(|&i| &self.countries[i])
    }

    pub fn get_by_code(&self, code: i64) -> Option<&Country> {
        self.by_code.get(&code).map(|&i| &self.countries[i])
    }

    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// HTTP client for both reference APIs.
pub struct ReferenceClient {
    http: reqwest::Client,
    countries_url: String,
    personas_url: String,
}

impl ReferenceClient {
    pub fn new(api: &Api) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(api.user_agent.clone())
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http,
            countries_url: api.countries_url.clone(),
            personas_url: api.personas_url.clone(),
        })
    }

    pub async fn fetch_countries(&self) -> Result<CountryCatalog, FetchError> {
        tracing::info!("fetching country list from {}", self.countries_url);
        let records: Vec<CountryRecord> = self.get_json(&self.countries_url).await?;
        let catalog = CountryCatalog::from_records(records);
        tracing::info!("loaded {} countries", catalog.len());
        Ok(catalog)
    }

    /// Fetch `count` synthetic personas in a single batch.
    pub async fn fetch_personas(&self, count: u32) -> Result<Vec<Persona>, FetchError> {
        if count > PERSONA_BATCH_CAP {
            return Err(FetchError::BatchTooLarge { requested: count });
        }
        let url = format!("{}?results={}", self.personas_url, count);
        tracing::info!("fetching {} personas from {}", count, self.personas_url);
        let batch: PersonaBatch = self.get_json(&url).await?;
        Ok(batch.results)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}
