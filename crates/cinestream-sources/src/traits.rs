use async_trait::async_trait;
use cinestream_models::{CatalogItem, MediaType};

use crate::error::SourceError;
use crate::types::{Genre, ListCategory, Page, SearchFilter, TimeWindow};

/// Read-only access to a movie/TV metadata catalog.
///
/// Every record leaves the source already tagged as a movie or TV show.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn trending(
        &self,
        media_type: MediaType,
        window: TimeWindow,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError>;

    async fn list(
        &self,
        media_type: MediaType,
        category: ListCategory,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError>;

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError>;

    /// Movies and TV shows matching `query`; people are never returned
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError>;

    /// The plain record for one title, as list endpoints return it
    async fn record(&self, media_type: MediaType, id: u64) -> Result<CatalogItem, SourceError>;

    /// Full details including videos, credits, recommendations and similar titles
    async fn details(&self, media_type: MediaType, id: u64) -> Result<CatalogItem, SourceError>;

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, SourceError>;
}
