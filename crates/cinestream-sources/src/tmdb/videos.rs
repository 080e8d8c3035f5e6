use cinestream_models::CatalogFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// The `videos` block appended to a details response, if present
pub fn videos_of<T: CatalogFields + ?Sized>(record: &T) -> Option<Videos> {
    let value = record.fields().get("videos")?.clone();
    serde_json::from_value(value).ok()
}

/// YouTube key of the best trailer: an official "Trailer" first, any YouTube video otherwise
pub fn trailer_key(videos: &Videos) -> Option<&str> {
    let youtube = |v: &&Video| v.site == "YouTube";
    videos
        .results
        .iter()
        .filter(youtube)
        .find(|v| v.kind == "Trailer")
        .or_else(|| videos.results.iter().find(youtube))
        .map(|v| v.key.as_str())
}

pub fn trailer_url(videos: &Videos) -> Option<String> {
    trailer_key(videos).map(|key| format!("https://www.youtube.com/embed/{}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinestream_models::CatalogRecord;
    use serde_json::json;

    fn videos(results: serde_json::Value) -> Videos {
        serde_json::from_value(json!({ "results": results })).unwrap()
    }

    #[test]
    fn test_prefers_youtube_trailer() {
        let v = videos(json!([
            {"key": "teaser", "site": "YouTube", "type": "Teaser"},
            {"key": "vimeo", "site": "Vimeo", "type": "Trailer"},
            {"key": "trailer", "site": "YouTube", "type": "Trailer"}
        ]));
        assert_eq!(trailer_key(&v), Some("trailer"));
        assert_eq!(trailer_url(&v).as_deref(), Some("https://www.youtube.com/embed/trailer"));
    }

    #[test]
    fn test_falls_back_to_any_youtube_video() {
        let v = videos(json!([
            {"key": "vimeo", "site": "Vimeo", "type": "Trailer"},
            {"key": "clip", "site": "YouTube", "type": "Clip"}
        ]));
        assert_eq!(trailer_key(&v), Some("clip"));
    }

    #[test]
    fn test_no_youtube_video() {
        assert_eq!(trailer_key(&Videos::default()), None);
        let v = videos(json!([{"key": "vimeo", "site": "Vimeo", "type": "Trailer"}]));
        assert_eq!(trailer_url(&v), None);
    }

    #[test]
    fn test_videos_of_record() {
        let record = CatalogRecord::new(550).with_field(
            "videos",
            json!({"results": [{"key": "abc", "site": "YouTube", "type": "Trailer"}]}),
        );
        let v = videos_of(&record).unwrap();
        assert_eq!(trailer_key(&v), Some("abc"));
        assert!(videos_of(&CatalogRecord::new(1)).is_none());
    }
}
