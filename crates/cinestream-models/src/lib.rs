pub mod catalog;
pub mod error;
pub mod media;
pub mod saved_item;

pub use catalog::{CatalogFields, CatalogItem, CatalogRecord};
pub use error::ModelError;
pub use media::{ItemKey, MediaType};
pub use saved_item::SavedItem;
