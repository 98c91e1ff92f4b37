//! Persisted projection of the catalog's play state

use serde::{Deserialize, Serialize};
use vibe_core::{Catalog, EpisodeProgress, ItemId, PlayStats};

/// Blob written under a user's key: `{"music": [...], "podcasts": [...]}`
///
/// Only ids and play state are kept. Older blobs that hold the full catalog
/// entries decode as well, since unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayStateSnapshot {
    /// Per-track statistics
    #[serde(default)]
    pub music: Vec<TrackState>,

    /// Per-episode statistics and progress
    #[serde(default)]
    pub podcasts: Vec<EpisodeState>,
}

/// Persisted state of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackState {
    /// Track id
    pub id: ItemId,

    /// Play statistics
    #[serde(flatten)]
    pub stats: PlayStats,
}

/// Persisted state of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    /// Episode id
    pub id: ItemId,

    /// Play statistics
    #[serde(flatten)]
    pub stats: PlayStats,

    /// Resume position and completion
    #[serde(flatten)]
    pub progress: EpisodeProgress,
}

impl PlayStateSnapshot {
    /// Project the play state of every catalog entry
    pub fn capture(catalog: &Catalog) -> Self {
        Self {
            music: catalog
                .tracks()
                .iter()
                .map(|t| TrackState {
                    id: t.id.clone(),
                    stats: t.stats.clone(),
                })
                .collect(),
            podcasts: catalog
                .episodes()
                .iter()
                .map(|e| EpisodeState {
                    id: e.id.clone(),
                    stats: e.stats.clone(),
                    progress: e.progress.clone(),
                })
                .collect(),
        }
    }

    /// Overlay persisted state onto `catalog`
    ///
    /// Saved values win for ids present in both; catalog entries without a
    /// saved record keep their values, and saved ids missing from the
    /// catalog are dropped. Returns how many entries were updated.
    pub fn merge_into(self, catalog: &mut Catalog) -> usize {
        let mut merged = 0;

        for saved in self.music {
            if let Some(track) = catalog.track_mut(&saved.id) {
                track.stats = saved.stats;
                merged += 1;
            }
        }

        for saved in self.podcasts {
            if let Some(episode) = catalog.episode_mut(&saved.id) {
                episode.stats = saved.stats;
                episode.progress = saved.progress;
                episode.progress.normalize();
                merged += 1;
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::{Episode, Track};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Track::new("m1", "One", "A", "1.mp3"),
                Track::new("m2", "Two", "B", "2.mp3"),
            ],
            vec![Episode::new("p1", "Pilot", "Show", "p1.mp3")],
        )
    }

    #[test]
    fn serializes_with_original_field_names() {
        let mut catalog = catalog();
        catalog.episode_mut(&ItemId::new("p1")).unwrap().progress.position_secs = 42.0;

        let json = serde_json::to_value(PlayStateSnapshot::capture(&catalog)).unwrap();
        assert_eq!(json["music"][0]["id"], "m1");
        assert_eq!(json["music"][0]["playCount"], 0);
        assert_eq!(json["podcasts"][0]["progress"], 42.0);
        assert_eq!(json["podcasts"][0]["percentComplete"], 0.0);
        assert_eq!(json["podcasts"][0]["completed"], false);
    }

    #[test]
    fn merge_prefers_saved_and_drops_unknown_ids() {
        let raw = r#"{
            "music": [
                {"id": "m2", "playCount": 7, "lastPlayed": "2024-03-01T10:00:00Z"},
                {"id": "gone", "playCount": 99}
            ],
            "podcasts": [
                {"id": "p1", "playCount": 1, "progress": 120, "percentComplete": 20}
            ]
        }"#;
        let snapshot: PlayStateSnapshot = serde_json::from_str(raw).unwrap();

        let mut catalog = catalog();
        assert_eq!(snapshot.merge_into(&mut catalog), 2);

        assert_eq!(catalog.track(&ItemId::new("m1")).unwrap().stats.play_count, 0);
        assert_eq!(catalog.track(&ItemId::new("m2")).unwrap().stats.play_count, 7);
        let episode = catalog.episode(&ItemId::new("p1")).unwrap();
        assert_eq!(episode.progress.position_secs, 120.0);
        assert!(!episode.progress.completed);
        assert!(catalog.track(&ItemId::new("gone")).is_none());
    }

    #[test]
    fn full_catalog_blob_still_decodes() {
        let raw = r#"{
            "music": [{"id": "m1", "title": "One", "artist": "A", "playCount": 3}],
            "podcasts": []
        }"#;
        let snapshot: PlayStateSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.music[0].stats.play_count, 3);
    }
}
