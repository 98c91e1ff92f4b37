//! Catalog provider
//!
//! Loads the read-only catalog document (`{"music": [...], "podcasts": [...]}`)
//! and answers the derived views the UI renders: popular, new, by artist or
//! show, search, and in-progress episodes. Views are pure functions over the
//! loaded lists and return clones in a deterministic order.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, VibeError};
use crate::types::{null_as_default, Episode, ItemId, MediaItem, MediaKind, Track};

/// Read-only provider of the raw catalog document
pub trait CatalogSource {
    /// Read the whole document
    fn read(&self) -> Result<String>;

    /// Human-readable origin, used in log lines
    fn describe(&self) -> String;
}

/// Catalog document on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| VibeError::load(format!("{}: {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog document held in memory
#[derive(Debug, Clone)]
pub struct StaticSource(String);

impl StaticSource {
    /// Create a source serving `document`
    pub fn new(document: impl Into<String>) -> Self {
        Self(document.into())
    }
}

impl CatalogSource for StaticSource {
    fn read(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "<in-memory>".to_string()
    }
}

/// Loaded catalog of tracks and episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Music tracks, in document order
    #[serde(default, rename = "music", deserialize_with = "null_as_default")]
    tracks: Vec<Track>,

    /// Podcast episodes, in document order
    #[serde(default, rename = "podcasts", deserialize_with = "null_as_default")]
    episodes: Vec<Episode>,
}

impl Catalog {
    /// Build a catalog from already-parsed lists
    pub fn new(tracks: Vec<Track>, episodes: Vec<Episode>) -> Self {
        let mut catalog = Self { tracks, episodes };
        catalog.normalize();
        catalog
    }

    /// Load the catalog, degrading to an empty one when the source fails
    ///
    /// An empty catalog is a valid state; callers never see the error.
    pub fn load_all(source: &dyn CatalogSource) -> Self {
        match Self::try_load(source) {
            Ok(catalog) => {
                info!(
                    source = %source.describe(),
                    tracks = catalog.tracks.len(),
                    episodes = catalog.episodes.len(),
                    "Catalog loaded"
                );
                catalog
            }
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "Catalog unavailable, using empty library");
                Self::default()
            }
        }
    }

    /// Load the catalog, surfacing read and parse failures as `VibeError::Load`
    pub fn try_load(source: &dyn CatalogSource) -> Result<Self> {
        let document = source.read()?;
        Self::from_json(&document)
    }

    /// Parse a catalog document
    pub fn from_json(document: &str) -> Result<Self> {
        let mut catalog: Self = serde_json::from_str(document)
            .map_err(|e| VibeError::load(format!("malformed catalog: {e}")))?;
        catalog.normalize();
        Ok(catalog)
    }

    fn normalize(&mut self) {
        for episode in &mut self.episodes {
            episode.progress.normalize();
        }
        debug!(
            tracks = self.tracks.len(),
            episodes = self.episodes.len(),
            "Catalog normalized"
        );
    }

    /// Whether both lists are empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.episodes.is_empty()
    }

    // ===== Lookup =====

    /// All tracks in document order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// All episodes in document order
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Track by id
    pub fn track(&self, id: &ItemId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Episode by id
    pub fn episode(&self, id: &ItemId) -> Option<&Episode> {
        self.episodes.iter().find(|e| &e.id == id)
    }

    /// Mutable track by id (play-state writes only)
    pub fn track_mut(&mut self, id: &ItemId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| &t.id == id)
    }

    /// Mutable episode by id (play-state writes only)
    pub fn episode_mut(&mut self, id: &ItemId) -> Option<&mut Episode> {
        self.episodes.iter_mut().find(|e| &e.id == id)
    }

    /// Mutable access to every track (play-state merges only)
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Mutable access to every episode (play-state merges only)
    pub fn episodes_mut(&mut self) -> &mut [Episode] {
        &mut self.episodes
    }

    /// Item of the given kind by id
    pub fn item(&self, id: &ItemId, kind: MediaKind) -> Option<MediaItem> {
        match kind {
            MediaKind::Music => self.track(id).cloned().map(MediaItem::from),
            MediaKind::Podcast => self.episode(id).cloned().map(MediaItem::from),
        }
    }

    /// Every item of a kind, in document order, ready to use as a play queue
    pub fn queue_for(&self, kind: MediaKind) -> Vec<MediaItem> {
        match kind {
            MediaKind::Music => self.tracks.iter().cloned().map(MediaItem::from).collect(),
            MediaKind::Podcast => self.episodes.iter().cloned().map(MediaItem::from).collect(),
        }
    }

    /// Index of `id` within `queue_for(kind)`
    pub fn position_in(&self, kind: MediaKind, id: &ItemId) -> Option<usize> {
        match kind {
            MediaKind::Music => self.tracks.iter().position(|t| &t.id == id),
            MediaKind::Podcast => self.episodes.iter().position(|e| &e.id == id),
        }
    }

    // ===== Track views =====

    /// Top `limit` tracks by play count; ties keep document order
    pub fn popular_tracks(&self, limit: usize) -> Vec<Track> {
        let mut tracks = self.tracks.clone();
        tracks.sort_by(|a, b| b.stats.play_count.cmp(&a.stats.play_count));
        tracks.truncate(limit);
        tracks
    }

    /// Newest `limit` tracks by added date; undated tracks sort last
    pub fn new_tracks(&self, limit: usize) -> Vec<Track> {
        let mut tracks = self.tracks.clone();
        tracks.sort_by(|a, b| b.added_date.cmp(&a.added_date));
        tracks.truncate(limit);
        tracks
    }

    /// Random sample of up to `limit` distinct tracks
    pub fn recommended_tracks<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Track> {
        self.tracks.choose_multiple(rng, limit).cloned().collect()
    }

    /// Tracks whose artist equals `artist`
    pub fn tracks_by_artist(&self, artist: &str) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.artist == artist)
            .cloned()
            .collect()
    }

    /// Tracks whose album equals `album`
    pub fn tracks_by_album(&self, album: &str) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.album.as_deref() == Some(album))
            .cloned()
            .collect()
    }

    /// Tracks whose genre equals `genre`
    pub fn tracks_by_genre(&self, genre: &str) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.genre.as_deref() == Some(genre))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title, artist, album, and genre
    pub fn search_tracks(&self, query: &str) -> Vec<Track> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .filter(|t| t.matches(&needle))
            .cloned()
            .collect()
    }

    // ===== Episode views =====

    /// Episodes of `show`
    pub fn episodes_by_show(&self, show: &str) -> Vec<Episode> {
        self.episodes
            .iter()
            .filter(|e| e.show == show)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title, show, and description
    pub fn search_episodes(&self, query: &str) -> Vec<Episode> {
        let needle = query.to_lowercase();
        self.episodes
            .iter()
            .filter(|e| e.matches(&needle))
            .cloned()
            .collect()
    }

    /// Started but unfinished episodes, most recently listened first
    pub fn in_progress_episodes(&self) -> Vec<Episode> {
        let mut episodes: Vec<Episode> = self
            .episodes
            .iter()
            .filter(|e| e.progress.is_in_progress())
            .cloned()
            .collect();
        episodes.sort_by(|a, b| b.progress.last_listened.cmp(&a.progress.last_listened));
        episodes
    }

    /// Newest `limit` episodes that are not completed
    pub fn new_episodes(&self, limit: usize) -> Vec<Episode> {
        let mut episodes: Vec<Episode> = self
            .episodes
            .iter()
            .filter(|e| !e.progress.completed)
            .cloned()
            .collect();
        episodes.sort_by(|a, b| b.added_date.cmp(&a.added_date));
        episodes.truncate(limit);
        episodes
    }

    /// Most recently listened `limit` episodes
    pub fn recently_listened(&self, limit: usize) -> Vec<Episode> {
        let mut episodes: Vec<Episode> = self
            .episodes
            .iter()
            .filter(|e| e.progress.last_listened.is_some())
            .cloned()
            .collect();
        episodes.sort_by(|a, b| b.progress.last_listened.cmp(&a.progress.last_listened));
        episodes.truncate(limit);
        episodes
    }

    /// Distinct show names in first-seen order
    pub fn all_shows(&self) -> Vec<String> {
        let mut shows: Vec<String> = Vec::new();
        for episode in &self.episodes {
            if !shows.contains(&episode.show) {
                shows.push(episode.show.clone());
            }
        }
        shows
    }
}
