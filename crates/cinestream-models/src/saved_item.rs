use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{CatalogFields, CatalogItem, CatalogRecord};
use crate::media::{ItemKey, MediaType};

/// An entry of My List.
///
/// Persisted flat: `id` and `media_type` sit at the top level next to the
/// descriptive fields of the catalog record it was saved from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItem {
    pub id: u64,
    pub media_type: MediaType,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl SavedItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id, self.media_type)
    }

    pub fn matches(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }
}

impl CatalogFields for SavedItem {
    fn fields(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl From<CatalogItem> for SavedItem {
    fn from(item: CatalogItem) -> Self {
        let media_type = item.media_type();
        let CatalogRecord { id, fields: mut payload } = item.into_record();
        // Identity is carried by the typed fields only
        payload.remove("id");
        payload.remove("media_type");
        Self {
            id,
            media_type,
            payload,
        }
    }
}

impl From<SavedItem> for CatalogItem {
    fn from(item: SavedItem) -> Self {
        CatalogItem::with_media_type(
            item.media_type,
            CatalogRecord {
                id: item.id,
                fields: item.payload,
            },
        )
    }
}
