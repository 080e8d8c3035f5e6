pub mod config;
pub mod paths;

pub use config::{Config, StorageConfig, TmdbConfig, DEFAULT_LIST_KEY, TMDB_API_KEY_ENV};
pub use paths::{PathManager, base_path_override};
