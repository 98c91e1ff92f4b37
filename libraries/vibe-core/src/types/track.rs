/// Music track domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::play_state::PlayStats;
use super::timestamp::{lenient_timestamp, null_as_default};

/// Music track as listed in the catalog document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: ItemId,

    /// Track title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Artist name
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: Option<String>,

    /// Genre
    #[serde(default)]
    pub genre: Option<String>,

    /// Audio resource locator (path or URL)
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio_file: String,

    /// Cover art locator
    #[serde(default)]
    pub cover_file: Option<String>,

    /// When the track was added to the catalog
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub added_date: Option<DateTime<Utc>>,

    /// Duration hint in seconds, when the catalog provides one
    #[serde(default, rename = "duration")]
    pub duration_secs: Option<f64>,

    /// Play statistics (owned by the progress store)
    #[serde(flatten)]
    pub stats: PlayStats,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_file: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            genre: None,
            audio_file: audio_file.into(),
            cover_file: None,
            added_date: None,
            duration_secs: None,
            stats: PlayStats::default(),
        }
    }

    /// Whether `needle` (already lowercased) occurs in any searchable field
    pub(crate) fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.title, needle)
            || contains_lower(&self.artist, needle)
            || self.album.as_deref().is_some_and(|a| contains_lower(a, needle))
            || self.genre.as_deref().is_some_and(|g| contains_lower(g, needle))
    }
}

pub(crate) fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_record_with_missing_optionals() {
        let json = r#"{
            "id": "m1",
            "title": "Blue Hour",
            "artist": "Nadia",
            "audioFile": "audio/blue-hour.mp3",
            "addedDate": "2024-02-01",
            "playCount": 4
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id.as_str(), "m1");
        assert_eq!(track.stats.play_count, 4);
        assert!(track.album.is_none());
        assert!(track.cover_file.is_none());
        assert!(track.added_date.is_some());
    }

    #[test]
    fn matches_secondary_and_tertiary_fields() {
        let mut track = Track::new("m1", "Blue Hour", "Nadia", "a.mp3");
        track.genre = Some("Lo-Fi".to_string());

        assert!(track.matches("blue"));
        assert!(track.matches("nadia"));
        assert!(track.matches("lo-fi"));
        assert!(!track.matches("jazz"));
    }
}
