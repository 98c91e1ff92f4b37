/// Media kind and the unified media item
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::episode::Episode;
use super::ids::ItemId;
use super::track::Track;

/// Kind of media, also used as the active-player selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Music tracks
    #[default]
    Music,
    /// Podcast episodes
    Podcast,
}

impl MediaKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Podcast => "podcast",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "music" => Some(Self::Music),
            "podcast" => Some(Self::Podcast),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A playable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaItem {
    /// A music track
    Track(Track),
    /// A podcast episode
    Episode(Episode),
}

impl MediaItem {
    /// Stable identifier
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Track(t) => &t.id,
            Self::Episode(e) => &e.id,
        }
    }

    /// Display title
    pub fn title(&self) -> &str {
        match self {
            Self::Track(t) => &t.title,
            Self::Episode(e) => &e.title,
        }
    }

    /// Secondary display line: artist for tracks, show for episodes
    pub fn subtitle(&self) -> &str {
        match self {
            Self::Track(t) => &t.artist,
            Self::Episode(e) => &e.show,
        }
    }

    /// Audio resource locator
    pub fn audio_file(&self) -> &str {
        match self {
            Self::Track(t) => &t.audio_file,
            Self::Episode(e) => &e.audio_file,
        }
    }

    /// Cover art locator
    pub fn cover_file(&self) -> Option<&str> {
        match self {
            Self::Track(t) => t.cover_file.as_deref(),
            Self::Episode(e) => e.cover_file.as_deref(),
        }
    }

    /// Media kind of this item
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Track(_) => MediaKind::Music,
            Self::Episode(_) => MediaKind::Podcast,
        }
    }

    /// Saved resume position, only for episodes with a position past zero
    pub fn saved_position(&self) -> Option<Duration> {
        match self {
            Self::Track(_) => None,
            Self::Episode(e) => {
                let secs = e.progress.position_secs;
                if secs > 0.0 {
                    Duration::try_from_secs_f64(secs).ok()
                } else {
                    None
                }
            }
        }
    }
}

impl From<Track> for MediaItem {
    fn from(track: Track) -> Self {
        Self::Track(track)
    }
}

impl From<Episode> for MediaItem {
    fn from(episode: Episode) -> Self {
        Self::Episode(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_round_trips_through_str() {
        for kind in [MediaKind::Music, MediaKind::Podcast] {
            assert_eq!(MediaKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::from_str("video"), None);
    }

    #[test]
    fn saved_position_only_for_started_episodes() {
        let track = MediaItem::from(Track::new("m1", "Song", "Artist", "a.mp3"));
        assert!(track.saved_position().is_none());

        let mut episode = Episode::new("p1", "Pilot", "Show", "p.mp3");
        assert!(MediaItem::from(episode.clone()).saved_position().is_none());

        episode.progress.position_secs = 120.0;
        assert_eq!(
            MediaItem::from(episode).saved_position(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn subtitle_uses_grouping_field() {
        let track = MediaItem::from(Track::new("m1", "Song", "Artist", "a.mp3"));
        let episode = MediaItem::from(Episode::new("p1", "Pilot", "Show", "p.mp3"));
        assert_eq!(track.subtitle(), "Artist");
        assert_eq!(episode.subtitle(), "Show");
        assert_eq!(track.kind(), MediaKind::Music);
        assert_eq!(episode.kind(), MediaKind::Podcast);
    }
}
