use thiserror::Error;

/// Reasons a catalog record cannot be turned into a typed item
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("catalog record is not a JSON object")]
    NotAnObject,
    #[error("catalog record has no numeric id")]
    MissingId,
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("invalid media type '{0}' (expected 'movie' or 'tv')")]
    InvalidMediaType(String),
    #[error("invalid item key '{0}' (expected '<movie|tv>-<id>')")]
    InvalidKey(String),
}
