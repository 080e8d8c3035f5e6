pub mod error;
pub mod tmdb;
pub mod traits;
pub mod types;

pub use error::SourceError;
pub use tmdb::{
    image_url, image_url_with_base, trailer_key, trailer_url, videos_of, ImageKind, ImageSize,
    TmdbClient, Video, Videos,
};
pub use traits::CatalogSource;
pub use types::{Genre, ListCategory, Page, SearchFilter, TimeWindow};
