use cinestream_models::ModelError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced to callers of the saved-list store.
///
/// Persistence problems never show up here; they are logged and the
/// in-memory list stays authoritative for the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid catalog item: {0}")]
    InvalidItem(#[from] ModelError),
}
