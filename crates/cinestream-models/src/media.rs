use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Movies and TV shows are numbered independently by the catalog,
/// so the media type is part of every item's identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Human-readable label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "TV Series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(ModelError::InvalidMediaType(s.to_string())),
        }
    }
}

/// Identity pair of a catalog item: numeric id plus media type.
///
/// Displays as `movie-550` / `tv-1399` and parses from the same form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub id: u64,
    pub media_type: MediaType,
}

impl ItemKey {
    pub fn new(id: u64, media_type: MediaType) -> Self {
        Self { id, media_type }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(id, MediaType::Movie)
    }

    pub fn tv(id: u64) -> Self {
        Self::new(id, MediaType::Tv)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.media_type, self.id)
    }
}

impl FromStr for ItemKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (media_type, id) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ModelError::InvalidKey(s.to_string()))?;
        let media_type = media_type
            .parse::<MediaType>()
            .map_err(|_| ModelError::InvalidKey(s.to_string()))?;
        let id = id
            .parse::<u64>()
            .map_err(|_| ModelError::InvalidKey(s.to_string()))?;
        Ok(Self { id, media_type })
    }
}
