//! Core types for playback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Engine state
///
/// `Idle → Loading → Playing ⇄ Paused`, back to `Idle` on stop, on a failed
/// load, or when an item ends with nothing to advance to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    /// Nothing playing
    #[default]
    Idle,

    /// Waiting for the output to report the resource ready
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-item
    Paused,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Repeat mode (music only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the last item ends
    #[default]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current item
    One,
}

impl RepeatMode {
    /// Next mode in the `off → all → one → off` cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

/// Seconds as a `Duration`, with negative or non-finite input mapped to zero
pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
