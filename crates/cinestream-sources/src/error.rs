use cinestream_models::MediaType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("TMDB API key is not configured (set TMDB_API_KEY or run `cinestream config set-api-key`)")]
    MissingApiKey,
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("'{category}' lists are not available for {media_type}")]
    Unsupported {
        category: &'static str,
        media_type: MediaType,
    },
}
