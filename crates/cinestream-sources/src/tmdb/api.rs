use cinestream_models::{CatalogItem, CatalogRecord, MediaType, ModelError};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Genre, Page, SearchFilter};

/// Paginated response shape shared by list, trending, discover and search endpoints
#[derive(Debug, Deserialize)]
pub struct RawPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Tag a record coming from an endpoint whose media type is fixed
pub fn typed_record(value: Value, media_type: MediaType) -> Result<CatalogItem, ModelError> {
    if !value.is_object() {
        return Err(ModelError::NotAnObject);
    }
    let record: CatalogRecord = serde_json::from_value(value).map_err(|_| ModelError::MissingId)?;
    Ok(CatalogItem::with_media_type(media_type, record))
}

/// Convert a page from a movie-only or TV-only endpoint
pub fn typed_page(raw: RawPage, media_type: MediaType) -> Page<CatalogItem> {
    let mut skipped = 0;
    let results = raw
        .results
        .into_iter()
        .filter_map(|value| match typed_record(value, media_type) {
            Ok(item) => Some(item),
            Err(e) => {
                skipped += 1;
                warn!("Skipping malformed {} record: {}", media_type, e);
                None
            }
        })
        .collect();

    if skipped > 0 {
        debug!("typed_page: skipped {} malformed {} records", skipped, media_type);
    }

    Page {
        page: raw.page,
        results,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}

/// Convert a multi-search page: classify each record, drop people and
/// anything the filter excludes
pub fn search_page(raw: RawPage, filter: SearchFilter) -> Page<CatalogItem> {
    let mut people = 0;
    let results = raw
        .results
        .into_iter()
        .filter_map(|value| match CatalogItem::from_value(value) {
            Ok(item) => Some(item),
            Err(ModelError::UnsupportedMediaType(_)) => {
                people += 1;
                None
            }
            Err(e) => {
                warn!("Skipping malformed search result: {}", e);
                None
            }
        })
        .filter(|item| filter.matches(item.media_type()))
        .collect::<Vec<_>>();

    debug!(
        "search_page: page={}, kept={}, dropped_non_titles={}",
        raw.page,
        results.len(),
        people
    );

    Page {
        page: raw.page,
        results,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}
