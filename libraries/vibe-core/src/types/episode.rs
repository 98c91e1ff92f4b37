/// Podcast episode domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::play_state::{EpisodeProgress, PlayStats};
use super::timestamp::{lenient_timestamp, null_as_default};
use super::track::contains_lower;

/// Podcast episode as listed in the catalog document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Unique episode identifier
    pub id: ItemId,

    /// Episode title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Show the episode belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub show: String,

    /// Episode description
    #[serde(default)]
    pub description: Option<String>,

    /// Audio resource locator (path or URL)
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio_file: String,

    /// Cover art locator
    #[serde(default)]
    pub cover_file: Option<String>,

    /// When the episode was added to the catalog
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub added_date: Option<DateTime<Utc>>,

    /// Duration hint in seconds, when the catalog provides one
    #[serde(default, rename = "duration")]
    pub duration_secs: Option<f64>,

    /// Play statistics (owned by the progress store)
    #[serde(flatten)]
    pub stats: PlayStats,

    /// Resume position and completion (owned by the progress store)
    #[serde(flatten)]
    pub progress: EpisodeProgress,
}

impl Episode {
    /// Create a new episode with minimal metadata
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        show: impl Into<String>,
        audio_file: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            show: show.into(),
            description: None,
            audio_file: audio_file.into(),
            cover_file: None,
            added_date: None,
            duration_secs: None,
            stats: PlayStats::default(),
            progress: EpisodeProgress::default(),
        }
    }

    /// Whether `needle` (already lowercased) occurs in any searchable field
    pub(crate) fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.title, needle)
            || contains_lower(&self.show, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_lower(d, needle))
    }
}
