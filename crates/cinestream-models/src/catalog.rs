use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::media::{ItemKey, MediaType};

/// Read access to the well-known descriptive fields of a catalog record.
///
/// Movies carry `title`/`release_date`, TV shows carry `name`/`first_air_date`;
/// the accessors fall back from one to the other so callers don't have to care.
/// Empty strings are treated as missing, the way the catalog reports unknown dates.
pub trait CatalogFields {
    fn fields(&self) -> &Map<String, Value>;

    fn text(&self, name: &str) -> Option<&str> {
        self.fields()
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn title(&self) -> Option<&str> {
        self.text("title").or_else(|| self.text("name"))
    }

    fn release_date(&self) -> Option<&str> {
        self.text("release_date")
            .or_else(|| self.text("first_air_date"))
    }

    fn release_year(&self) -> Option<i32> {
        let date = self.release_date()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    fn overview(&self) -> Option<&str> {
        self.text("overview")
    }

    fn poster_path(&self) -> Option<&str> {
        self.text("poster_path")
    }

    fn backdrop_path(&self) -> Option<&str> {
        self.text("backdrop_path")
    }

    /// Average vote on the catalog's 0-10 scale
    fn vote_average(&self) -> Option<f64> {
        self.fields().get("vote_average").and_then(Value::as_f64)
    }

    /// Vote average as a rounded percentage; `None` when unrated
    fn score_percent(&self) -> Option<u32> {
        self.vote_average()
            .filter(|v| *v > 0.0)
            .map(|v| (v * 10.0).round() as u32)
    }
}

/// A catalog record as received from the metadata API.
///
/// Only `id` is typed; every other field is kept verbatim so it can be
/// displayed later without a re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CatalogRecord {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The raw `media_type` discriminator, if the endpoint sent one
    pub fn declared_media_type(&self) -> Option<&str> {
        self.fields.get("media_type").and_then(Value::as_str)
    }
}

impl CatalogFields for CatalogRecord {
    fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// A catalog record tagged with its media type.
///
/// Records are tagged once, where they enter the system; everything downstream
/// matches on the variant instead of sniffing fields again.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum CatalogItem {
    Movie(CatalogRecord),
    Tv(CatalogRecord),
}

impl CatalogItem {
    /// Tag a record whose type is known from the endpoint it came from
    pub fn with_media_type(media_type: MediaType, mut record: CatalogRecord) -> Self {
        record.fields.remove("media_type");
        match media_type {
            MediaType::Movie => CatalogItem::Movie(record),
            MediaType::Tv => CatalogItem::Tv(record),
        }
    }

    /// Tag a record of unknown type.
    ///
    /// An explicit `media_type` wins; `"person"` and other non-title types are
    /// rejected. Without one, a `first_air_date` marks a TV show and anything
    /// else is a movie.
    pub fn classify(mut record: CatalogRecord) -> Result<Self, ModelError> {
        let media_type = match record.fields.remove("media_type") {
            Some(Value::String(declared)) => declared
                .parse::<MediaType>()
                .map_err(|_| ModelError::UnsupportedMediaType(declared.clone()))?,
            Some(Value::Null) | None => {
                if record.text("first_air_date").is_some() {
                    MediaType::Tv
                } else {
                    MediaType::Movie
                }
            }
            Some(other) => return Err(ModelError::UnsupportedMediaType(other.to_string())),
        };
        Ok(Self::with_media_type(media_type, record))
    }

    /// Tag an arbitrary JSON value, failing fast on anything without a usable identity
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut fields) = value else {
            return Err(ModelError::NotAnObject);
        };
        let id = fields
            .remove("id")
            .and_then(|id| id.as_u64())
            .ok_or(ModelError::MissingId)?;
        Self::classify(CatalogRecord { id, fields })
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            CatalogItem::Movie(_) => MediaType::Movie,
            CatalogItem::Tv(_) => MediaType::Tv,
        }
    }

    pub fn record(&self) -> &CatalogRecord {
        match self {
            CatalogItem::Movie(record) | CatalogItem::Tv(record) => record,
        }
    }

    pub fn into_record(self) -> CatalogRecord {
        match self {
            CatalogItem::Movie(record) | CatalogItem::Tv(record) => record,
        }
    }

    pub fn id(&self) -> u64 {
        self.record().id
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id(), self.media_type())
    }
}

impl CatalogFields for CatalogItem {
    fn fields(&self) -> &Map<String, Value> {
        &self.record().fields
    }
}

impl TryFrom<CatalogRecord> for CatalogItem {
    type Error = ModelError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        Self::classify(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_media_type_wins() {
        let item = CatalogItem::from_value(json!({
            "id": 1399,
            "media_type": "tv",
            "name": "Game of Thrones"
        }))
        .unwrap();
        assert_eq!(item.key(), ItemKey::tv(1399));
        // The discriminator lives in the tag, not in the fields
        assert!(item.record().declared_media_type().is_none());
    }

    #[test]
    fn test_first_air_date_means_tv() {
        let item = CatalogItem::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17"
        }))
        .unwrap();
        assert_eq!(item.media_type(), MediaType::Tv);
    }

    #[test]
    fn test_defaults_to_movie() {
        let item = CatalogItem::from_value(json!({
            "id": 550,
            "title": "Fight Club",
            "release_date": "1999-10-15"
        }))
        .unwrap();
        assert_eq!(item.media_type(), MediaType::Movie);

        let blank_air_date = CatalogItem::from_value(json!({"id": 1, "first_air_date": ""})).unwrap();
        assert_eq!(blank_air_date.media_type(), MediaType::Movie);

        let null_type = CatalogItem::from_value(json!({"id": 2, "media_type": null})).unwrap();
        assert_eq!(null_type.media_type(), MediaType::Movie);
    }

    #[test]
    fn test_rejects_people_and_missing_ids() {
        assert_eq!(
            CatalogItem::from_value(json!({"id": 287, "media_type": "person", "name": "Brad Pitt"})),
            Err(ModelError::UnsupportedMediaType("person".to_string()))
        );
        assert_eq!(
            CatalogItem::from_value(json!({"title": "No id"})),
            Err(ModelError::MissingId)
        );
        assert_eq!(
            CatalogItem::from_value(json!({"id": "550"})),
            Err(ModelError::MissingId)
        );
        assert_eq!(
            CatalogItem::from_value(json!([1, 2, 3])),
            Err(ModelError::NotAnObject)
        );
    }

    #[test]
    fn test_field_accessors() {
        let movie = CatalogRecord::new(550)
            .with_field("title", "Fight Club")
            .with_field("release_date", "1999-10-15")
            .with_field("vote_average", 8.4)
            .with_field("poster_path", "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
            .with_field("backdrop_path", "");
        assert_eq!(movie.title(), Some("Fight Club"));
        assert_eq!(movie.release_year(), Some(1999));
        assert_eq!(movie.score_percent(), Some(84));
        assert_eq!(movie.poster_path(), Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"));
        assert_eq!(movie.backdrop_path(), None);

        let show = CatalogRecord::new(1399)
            .with_field("name", "Game of Thrones")
            .with_field("first_air_date", "2011-04-17")
            .with_field("vote_average", 0);
        assert_eq!(show.title(), Some("Game of Thrones"));
        assert_eq!(show.release_year(), Some(2011));
        assert_eq!(show.score_percent(), None);
    }

    #[test]
    fn test_serializes_with_media_type_tag() {
        let item = CatalogItem::with_media_type(
            MediaType::Tv,
            CatalogRecord::new(1399).with_field("name", "Game of Thrones"),
        );
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"media_type": "tv", "id": 1399, "name": "Game of Thrones"})
        );
    }
}
