//! Platform-agnostic audio output trait
//!
//! Abstracts the element that actually renders audio (a browser media
//! element, a native sink, a remote renderer). Opening is asynchronous: the
//! output reports readiness, progress, end and failure later as
//! [`OutputEvent`]s tagged with the [`SubscriptionId`] passed to `open`.

mod simulated;

pub use simulated::SimulatedOutput;

use std::time::Duration;

use crate::error::Result;
use crate::subscription::SubscriptionId;

/// Events an output reports for an opened resource
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Resource is ready; its duration is now known
    MetadataReady {
        /// Total duration
        duration: Duration,
    },

    /// Playback position moved
    TimeUpdate {
        /// Current position
        position: Duration,
    },

    /// Playback reached the end of the resource
    Ended,

    /// Resource failed after opening
    Error(String),
}

/// Audio output driven by a playback engine
///
/// Implementors own at most one opened resource at a time. Every event about
/// that resource must carry the subscription id given to [`Self::open`].
pub trait AudioOutput {
    /// Start opening `locator`
    ///
    /// Returns an error only when the resource is rejected up front; late
    /// failures arrive as [`OutputEvent::Error`].
    fn open(&mut self, locator: &str, subscription: SubscriptionId) -> Result<()>;

    /// Release the opened resource; no further events for it
    fn close(&mut self);

    /// Start or resume rendering
    fn play(&mut self) -> Result<()>;

    /// Pause rendering
    fn pause(&mut self);

    /// Jump to `position` (already clamped by the engine)
    fn seek(&mut self, position: Duration);

    /// Current position
    fn position(&self) -> Duration;

    /// Total duration, once the resource is ready
    fn duration(&self) -> Option<Duration>;

    /// Apply a linear volume in `[0, 1]`
    fn set_volume(&mut self, volume: f32);

    /// Apply a playback rate multiplier (> 0)
    fn set_rate(&mut self, rate: f32);
}
