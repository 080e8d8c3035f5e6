use cinestream_models::{CatalogItem, MediaType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One page of catalog results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

impl Page<CatalogItem> {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            _ => Err(format!("Invalid time window: {}. Use 'day' or 'week'", s)),
        }
    }
}

/// Curated catalog lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCategory {
    Popular,
    TopRated,
    /// Movies only
    Upcoming,
    /// Movies only
    NowPlaying,
}

impl ListCategory {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ListCategory::Popular => "popular",
            ListCategory::TopRated => "top_rated",
            ListCategory::Upcoming => "upcoming",
            ListCategory::NowPlaying => "now_playing",
        }
    }

    pub fn supports(&self, media_type: MediaType) -> bool {
        match self {
            ListCategory::Popular | ListCategory::TopRated => true,
            ListCategory::Upcoming | ListCategory::NowPlaying => media_type == MediaType::Movie,
        }
    }
}

/// Which results of a multi search to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl SearchFilter {
    pub fn matches(&self, media_type: MediaType) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Movie => media_type == MediaType::Movie,
            SearchFilter::Tv => media_type == MediaType::Tv,
        }
    }
}

impl From<Option<MediaType>> for SearchFilter {
    fn from(media_type: Option<MediaType>) -> Self {
        match media_type {
            None => SearchFilter::All,
            Some(MediaType::Movie) => SearchFilter::Movie,
            Some(MediaType::Tv) => SearchFilter::Tv,
        }
    }
}
