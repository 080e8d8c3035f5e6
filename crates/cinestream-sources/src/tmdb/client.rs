use async_trait::async_trait;
use cinestream_config::TmdbConfig;
use cinestream_models::{CatalogItem, MediaType};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::SourceError;
use crate::tmdb::api::{self, GenreList, RawPage};
use crate::traits::CatalogSource;
use crate::types::{Genre, ListCategory, Page, SearchFilter, TimeWindow};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DETAILS_APPEND: &str = "videos,credits,recommendations,similar";

pub fn create_tmdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("cinestream/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(20))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(create_tmdb_client()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: "en-US".to_string(),
        }
    }

    pub fn from_config(config: &TmdbConfig) -> Result<Self, SourceError> {
        let api_key = config.resolve_api_key().ok_or(SourceError::MissingApiKey)?;
        Ok(Self::new(api_key)
            .with_base_url(config.base_url.clone())
            .with_language(config.language.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", path, query);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| SourceError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        response.json::<T>().await.map_err(|e| SourceError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_page(&self, path: &str, query: &[(&str, String)]) -> Result<RawPage, SourceError> {
        self.get_json::<RawPage>(path, query).await
    }

    async fn get_record(
        &self,
        media_type: MediaType,
        id: u64,
        query: &[(&str, String)],
    ) -> Result<CatalogItem, SourceError> {
        let path = format!("/{}/{}", media_type, id);
        let value: Value = self.get_json(&path, query).await?;
        api::typed_record(value, media_type).map_err(|e| SourceError::Decode {
            endpoint: path,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn trending(
        &self,
        media_type: MediaType,
        window: TimeWindow,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError> {
        let path = format!("/trending/{}/{}", media_type, window);
        let raw = self.get_page(&path, &[("page", page.to_string())]).await?;
        Ok(api::typed_page(raw, media_type))
    }

    async fn list(
        &self,
        media_type: MediaType,
        category: ListCategory,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError> {
        if !category.supports(media_type) {
            return Err(SourceError::Unsupported {
                category: category.path_segment(),
                media_type,
            });
        }
        let path = format!("/{}/{}", media_type, category.path_segment());
        let raw = self.get_page(&path, &[("page", page.to_string())]).await?;
        Ok(api::typed_page(raw, media_type))
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError> {
        let path = format!("/discover/{}", media_type);
        let query = [
            ("with_genres", genre_id.to_string()),
            ("page", page.to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        let raw = self.get_page(&path, &query).await?;
        Ok(api::typed_page(raw, media_type))
    }

    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        page: u32,
    ) -> Result<Page<CatalogItem>, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Page::empty(page));
        }
        let raw = self
            .get_page(
                "/search/multi",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(api::search_page(raw, filter))
    }

    async fn record(&self, media_type: MediaType, id: u64) -> Result<CatalogItem, SourceError> {
        self.get_record(media_type, id, &[]).await
    }

    async fn details(&self, media_type: MediaType, id: u64) -> Result<CatalogItem, SourceError> {
        self.get_record(
            media_type,
            id,
            &[("append_to_response", DETAILS_APPEND.to_string())],
        )
        .await
    }

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, SourceError> {
        let path = format!("/genre/{}/list", media_type);
        let list: GenreList = self.get_json(&path, &[]).await?;
        Ok(list.genres)
    }
}
