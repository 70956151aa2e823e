//! Account and profile rows from fetched personas, plus the per-user
//! attribute tables (citizenships, traveller types).

use std::collections::HashSet;

use rand::Rng;
use sha2::{Digest, Sha256};
use wayfarer_types::{Citizenship, GeneratedProfile, GeneratedUser, TravellerTypeAssignment};

use crate::fetch::{CountryCatalog, Persona};

pub struct UserBatch {
    pub users: Vec<GeneratedUser>,
    pub profiles: Vec<GeneratedProfile>,
}

/// Uppercase the first character, lowercase the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Map personas to User + Profile rows.
///
/// Emails double as usernames and must be unique; a collision gets a random
/// 32-bit suffix. User ids continue the table's sequence after the existing
/// rows, so row `i` becomes user `existing_users + i + 1`.
pub fn build_users(personas: &[Persona], existing_users: i64, rng: &mut impl Rng) -> UserBatch {
    let mut users = Vec::with_capacity(personas.len());
    let mut profiles = Vec::with_capacity(personas.len());
    let mut seen_emails = HashSet::new();

    for (i, persona) in personas.iter().enumerate() {
        let user_id = existing_users + i as i64 + 1;

        let mut email = persona.email.clone();
        if seen_emails.contains(&email) {
            email.push_str(&rng.gen::<u32>().to_string());
        }
        seen_emails.insert(email.clone());

        let password_hash = format!("{:x}", Sha256::digest(persona.login.password.as_bytes()));

        users.push(GeneratedUser {
            id: user_id,
            email,
            password_hash,
            salt: persona.login.sha1.clone(),
            created: persona.registered.date,
        });

        profiles.push(GeneratedProfile {
            user_id,
            first_name: capitalize(&persona.name.first),
            last_name: capitalize(&persona.name.last),
            date_of_birth: persona.dob.date.date_naive(),
            gender: persona.gender,
            created: persona.registered.date,
        });
    }

    UserBatch { users, profiles }
}

/// One random country per generated user. The caller writes the same pair
/// into both the Nationality and the Passport tables.
pub fn assign_citizenships(
    users: &[GeneratedUser],
    catalog: &CountryCatalog,
    rng: &mut impl Rng,
) -> Vec<Citizenship> {
    let countries = catalog.all();
    users
        .iter()
        .map(|user| Citizenship {
            user_id: user.id,
            country_id: countries[rng.gen_range(0..countries.len())].numeric_code,
        })
        .collect()
}

/// 1..=3 traveller type samples per user. Duplicate samples within a user are
/// dropped rather than re-rolled, so some users end up with fewer.
pub fn assign_traveller_types(
    users: &[GeneratedUser],
    num_definitions: i64,
    rng: &mut impl Rng,
) -> Vec<TravellerTypeAssignment> {
    let mut assignments = Vec::new();

    for user in users {
        let mut used = HashSet::new();
        for _ in 0..rng.gen_range(1..=3) {
            let traveller_type_id = rng.gen_range(1..=num_definitions);
            if used.insert(traveller_type_id) {
                assignments.push(TravellerTypeAssignment {
                    user_id: user.id,
                    traveller_type_id,
                });
            }
        }
    }

    assignments
}
