use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The JSON side-file handed from the generator to the photo uploader.
///
/// Maps a photo URL to the ids of the users that should receive it as their
/// profile picture. A `BTreeMap` keeps the serialized file stable across runs
/// with the same seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoManifest {
    #[serde(flatten)]
    pub photos: BTreeMap<String, Vec<i64>>,
}

impl PhotoManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a photo URL to a user. The same URL may serve several users.
    pub fn assign(&mut self, url: impl Into<String>, user_id: i64) {
        self.photos.entry(url.into()).or_default().push(user_id);
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Total number of (photo, user) assignments.
    pub fn assignment_count(&self) -> usize {
        self.photos.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<i64>)> {
        self.photos.iter()
    }
}
