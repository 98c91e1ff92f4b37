//! Playback Events
//!
//! Event-based communication for UI synchronization. Engines queue events as
//! they happen; the owner drains them after each call.

use serde::{Deserialize, Serialize};
use vibe_core::{ItemId, MediaKind};

use crate::types::{EngineState, RepeatMode};

/// Events emitted by a playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Engine state changed
    StateChanged {
        /// The new state
        state: EngineState,
    },

    /// A different item became current
    ItemChanged {
        /// ID of the new (current) item
        item_id: ItemId,
        /// ID of the previous item (if any)
        previous_item_id: Option<ItemId>,
    },

    /// Output reported the resource's duration
    MetadataReady {
        /// Total duration in seconds
        duration_secs: f64,
    },

    /// Position update
    TimeUpdate {
        /// Current position in seconds
        position_secs: f64,
        /// Total duration in seconds, once known
        duration_secs: Option<f64>,
    },

    /// Item reached its end and nothing followed it
    Ended {
        /// ID of the finished item
        item_id: ItemId,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// Playback rate changed
    SpeedChanged {
        /// New rate multiplier
        speed: f32,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}

/// Event drained from the coordinator, tagged with the engine it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorEvent {
    /// Kind of the emitting engine
    pub kind: MediaKind,
    /// The engine event
    pub event: PlaybackEvent,
}

impl PlaybackEvent {
    /// Tag this event with the kind of engine that emitted it
    pub fn tagged(self, kind: MediaKind) -> CoordinatorEvent {
        CoordinatorEvent { kind, event: self }
    }

    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
