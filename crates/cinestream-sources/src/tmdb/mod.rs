pub mod api;
pub mod client;
pub mod images;
pub mod videos;

pub use client::TmdbClient;
pub use images::{image_url, image_url_with_base, ImageKind, ImageSize, IMAGE_BASE_URL};
pub use videos::{trailer_key, trailer_url, videos_of, Video, Videos};
