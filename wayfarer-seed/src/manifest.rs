//! The photo manifest side-file: which portrait URL belongs to which
//! generated user. Written next to the SQL script and consumed later by
//! `wayfarer-upload` against a running application instance.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use wayfarer_types::{GeneratedUser, PhotoManifest};

use crate::fetch::Persona;

/// Pair the first `sample` personas' portrait URLs with the user ids they
/// became. Personas and users are parallel lists; `build_users` preserves
/// order.
pub fn build_manifest(
    personas: &[Persona],
    users: &[GeneratedUser],
    sample: usize,
) -> PhotoManifest {
    let mut manifest = PhotoManifest::new();
    for (persona, user) in personas.iter().zip(users).take(sample) {
        manifest.assign(persona.picture.large.clone(), user.id);
    }
    manifest
}

pub fn write_manifest(manifest: &PhotoManifest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}
