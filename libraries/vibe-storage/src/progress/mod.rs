//! Per-user play state store
//!
//! [`ProgressStore`] owns the loaded [`Catalog`] and is the only writer of
//! play counts and episode progress. Every mutation rewrites the user's full
//! snapshot through a [`StateBackend`] under `"{key_prefix}_{user}"`.
//!
//! # Example
//!
//! ```rust
//! use vibe_core::{Catalog, Episode, ItemId, MediaKind, StaticIdentity};
//! use vibe_storage::{MemoryBackend, ProgressStore};
//!
//! let catalog = Catalog::new(vec![], vec![Episode::new("p1", "Pilot", "Show", "p1.mp3")]);
//! let backend = MemoryBackend::new();
//! let mut store = ProgressStore::new(catalog, Box::new(backend.clone()))
//!     .with_identity(Box::new(StaticIdentity::user("alice")));
//!
//! let id = ItemId::new("p1");
//! store.record_play(&id, MediaKind::Podcast);
//! store.record_progress(&id, 120.0, 20.0);
//!
//! assert_eq!(store.storage_key(), "vibestream_library_state_alice");
//! assert_eq!(backend.keys(), vec!["vibestream_library_state_alice".to_string()]);
//! ```

mod snapshot;

pub use snapshot::{EpisodeState, PlayStateSnapshot, TrackState};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vibe_core::{
    Catalog, Clock, ItemId, MediaKind, ProgressTracker, StaticIdentity, StorageSettings,
    SystemClock, UserIdentity,
};

use crate::backend::StateBackend;
use crate::error::Result;

/// Catalog plus its persisted per-user play state
pub struct ProgressStore {
    catalog: Catalog,
    // Play state as loaded, before any user's saved state
    baseline: Catalog,
    backend: Box<dyn StateBackend>,
    identity: Box<dyn UserIdentity>,
    clock: Arc<dyn Clock>,
    settings: StorageSettings,
}

impl ProgressStore {
    /// Create a store over `catalog` persisting through `backend`
    ///
    /// Starts anonymous, on the system clock, with default storage settings.
    pub fn new(catalog: Catalog, backend: Box<dyn StateBackend>) -> Self {
        Self {
            baseline: catalog.clone(),
            catalog,
            backend,
            identity: Box::new(StaticIdentity::anonymous()),
            clock: Arc::new(SystemClock),
            settings: StorageSettings::default(),
        }
    }

    /// Use `identity` to pick the storage key
    #[must_use]
    pub fn with_identity(mut self, identity: Box<dyn UserIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Stamp play state with `clock`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override key prefix and default user
    #[must_use]
    pub fn with_settings(mut self, settings: StorageSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Swap the identity, e.g. after sign-in
    ///
    /// Play state goes back to the catalog as loaded. Does not reload; call
    /// [`Self::restore`] afterwards to pick up the new user's state.
    pub fn set_identity(&mut self, identity: Box<dyn UserIdentity>) {
        self.identity = identity;
        self.catalog = self.baseline.clone();
        debug!(key = %self.storage_key(), "Identity changed, play state reset");
    }

    /// Loaded catalog with current play state
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Key the current user's state lives under
    pub fn storage_key(&self) -> String {
        let user = self
            .identity
            .current_user_id()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.settings.default_user.clone());
        format!("{}_{}", self.settings.key_prefix, user)
    }

    /// Count one play of `id` and persist
    ///
    /// Returns `false` (and changes nothing) when `id` is not in the catalog.
    pub fn record_play(&mut self, id: &ItemId, kind: MediaKind) -> bool {
        let now = self.clock.now();
        let stats = match kind {
            MediaKind::Music => self.catalog.track_mut(id).map(|t| &mut t.stats),
            MediaKind::Podcast => self.catalog.episode_mut(id).map(|e| &mut e.stats),
        };

        let Some(stats) = stats else {
            debug!(id = %id, kind = %kind, "Ignoring play of unknown item");
            return false;
        };

        stats.record_play(now);
        debug!(id = %id, kind = %kind, play_count = stats.play_count, "Recorded play");
        self.persist_logged();
        true
    }

    /// Store a progress sample for episode `id` and persist
    ///
    /// Percent is clamped to `[0, 100]` and position to `>= 0`. Reaching 100
    /// marks the episode completed; a later lower sample reopens it.
    /// Returns `false` when `id` is not a known episode.
    pub fn record_progress(&mut self, id: &ItemId, position_secs: f64, percent: f64) -> bool {
        let now = self.clock.now();
        let Some(episode) = self.catalog.episode_mut(id) else {
            debug!(id = %id, "Ignoring progress for unknown episode");
            return false;
        };

        let was_completed = episode.progress.completed;
        episode.progress.apply(position_secs, percent, now);
        if episode.progress.completed && !was_completed {
            info!(id = %id, "Episode completed");
        }

        self.persist_logged();
        true
    }

    /// Write the full snapshot under the current user's key
    pub fn persist(&self) -> Result<()> {
        let key = self.storage_key();
        let blob = serde_json::to_string(&PlayStateSnapshot::capture(&self.catalog))?;
        self.backend.set(&key, &blob)
    }

    /// Replace play state with the current user's saved state
    ///
    /// Saved entries are merged over the catalog as loaded, so items the user
    /// never saved keep their as-loaded state. Returns the number of entries
    /// merged. A missing blob resets to the as-loaded state and is `Ok(0)`; a
    /// malformed one is an error and leaves the catalog untouched.
    pub fn try_restore(&mut self) -> Result<usize> {
        let key = self.storage_key();
        let Some(blob) = self.backend.get(&key)? else {
            debug!(key = %key, "No saved play state");
            self.catalog = self.baseline.clone();
            return Ok(0);
        };

        let snapshot: PlayStateSnapshot = serde_json::from_str(&blob)?;
        let mut restored = self.baseline.clone();
        let merged = snapshot.merge_into(&mut restored);
        self.catalog = restored;
        info!(key = %key, merged, "Restored play state");
        Ok(merged)
    }

    /// Like [`Self::try_restore`], but logs failures and reports zero entries
    pub fn restore(&mut self) -> usize {
        match self.try_restore() {
            Ok(merged) => merged,
            Err(e) => {
                warn!(key = %self.storage_key(), error = %e, "Failed to restore play state");
                0
            }
        }
    }

    /// Remove the current user's saved blob
    ///
    /// In-memory play state is kept; returns whether a blob existed.
    pub fn clear(&mut self) -> Result<bool> {
        let key = self.storage_key();
        let removed = self.backend.remove(&key)?;
        info!(key = %key, removed, "Cleared saved play state");
        Ok(removed)
    }

    fn persist_logged(&self) {
        if let Err(e) = self.persist() {
            warn!(key = %self.storage_key(), error = %e, "Failed to persist play state");
        }
    }
}

impl ProgressTracker for ProgressStore {
    fn record_play(&mut self, id: &ItemId, kind: MediaKind) {
        ProgressStore::record_play(self, id, kind);
    }

    fn record_progress(&mut self, id: &ItemId, position_secs: f64, percent_complete: f64) {
        ProgressStore::record_progress(self, id, position_secs, percent_complete);
    }

    fn saved_position(&self, id: &ItemId) -> Option<Duration> {
        self.catalog
            .episode(id)
            .map(|e| e.progress.position_secs)
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key", &self.storage_key())
            .field("tracks", &self.catalog.tracks().len())
            .field("episodes", &self.catalog.episodes().len())
            .finish_non_exhaustive()
    }
}
