/// Collaborator traits shared across VibeStream crates
use crate::types::{ItemId, MediaKind};
use std::time::Duration;

/// Write-side of the progress store, as seen by the playback engines
///
/// Engines never persist anything themselves; every play-count bump and
/// progress checkpoint goes through this trait. Implementations must not fail
/// playback: persistence problems are handled (and logged) on their side.
pub trait ProgressTracker {
    /// Count one play of `id` and stamp it with the current time
    fn record_play(&mut self, id: &ItemId, kind: MediaKind);

    /// Store a resume position and completion percentage for episode `id`
    fn record_progress(&mut self, id: &ItemId, position_secs: f64, percent_complete: f64);

    /// Latest saved resume position for episode `id`, if past zero
    fn saved_position(&self, id: &ItemId) -> Option<Duration>;
}

/// Source of the signed-in user's identity
///
/// Authentication itself lives outside this workspace; the progress store
/// only needs a stable key to partition persisted state.
pub trait UserIdentity {
    /// Identifier of the current user, or `None` for an anonymous session
    fn current_user_id(&self) -> Option<String>;
}

/// Identity with a fixed (possibly absent) user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    /// Identity for a signed-in user
    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// Identity for an anonymous session
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl UserIdentity for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}
