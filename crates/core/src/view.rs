//! Projections of cached records served by the presentation layer.

use serde::Serialize;

use crate::{Error, Record};

/// Entry of the JSON listing: name, current location and avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub name: String,
    pub location: String,
    pub image: String,
}

impl TryFrom<&Record> for CharacterSummary {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            name: record.name()?.to_string(),
            location: record.location_name()?.to_string(),
            image: record.image()?.to_string(),
        })
    }
}

/// Everything the dashboard's detail view shows for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterDetail {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub origin: String,
    pub location: String,
    pub image: String,
    /// Episode count, not the episode URLs.
    pub episodes: usize,
    pub url: String,
}

impl TryFrom<&Record> for CharacterDetail {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id()?,
            name: record.name()?.to_string(),
            status: record.status()?.to_string(),
            species: record.species()?.to_string(),
            gender: record.gender()?.to_string(),
            origin: record.origin_name()?.to_string(),
            location: record.location_name()?.to_string(),
            image: record.image()?.to_string(),
            episodes: record.episode_count()?,
            url: record.url()?.to_string(),
        })
    }
}

/// Body of `GET /characters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<'a> {
    pub count: usize,
    pub characters: &'a [CharacterSummary],
}
