//! VibeStream - Playback
//!
//! Platform-agnostic playback for music tracks and podcast episodes.
//!
//! This crate provides:
//! - Playback engine per media kind (queue, cursor, transport)
//! - Repeat modes (Off, All, One) and random shuffle for music
//! - Skip, speed presets and resume from saved position for podcasts
//! - Periodic progress checkpoints driven by an injected clock
//! - Coordinator exposing one control surface over both engines
//!
//! # Architecture
//!
//! `vibe-playback` renders no audio itself. Engines drive an [`AudioOutput`]
//! and receive its readiness, progress and end notifications back as
//! [`OutputEvent`]s tagged with a [`SubscriptionId`]. Play counts and
//! progress are written through [`vibe_core::ProgressTracker`], so the crate
//! does not depend on `vibe-storage`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vibe_core::{ItemId, ManualClock, MediaKind, PlaybackSettings, ProgressTracker, Track};
//! use vibe_playback::{EngineState, PlaybackEngine, SimulatedOutput};
//!
//! struct NoTracking;
//!
//! impl ProgressTracker for NoTracking {
//!     fn record_play(&mut self, _: &ItemId, _: MediaKind) {}
//!     fn record_progress(&mut self, _: &ItemId, _: f64, _: f64) {}
//!     fn saved_position(&self, _: &ItemId) -> Option<Duration> {
//!         None
//!     }
//! }
//!
//! let mut tracker = NoTracking;
//! let mut engine = PlaybackEngine::new(
//!     MediaKind::Music,
//!     SimulatedOutput::new(),
//!     PlaybackSettings::default(),
//!     Arc::new(ManualClock::at_epoch()),
//! );
//!
//! let track = Track::new("m1", "Song", "Artist", "m1.mp3");
//! engine.load(track.into(), None, 0, &mut tracker)?;
//!
//! // The output reports ready later; feed its events back in
//! engine.output_mut().finish_loading(Duration::from_secs(180));
//! for (sub, event) in engine.output_mut().take_events() {
//!     engine.handle_output_event(sub, event, &mut tracker)?;
//! }
//! assert_eq!(engine.state(), EngineState::Playing);
//! # Ok::<(), vibe_playback::PlaybackError>(())
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod engine;
mod error;
pub mod events;
pub mod output;
mod queue;
pub mod schedule;
mod shuffle;
pub mod subscription;
pub mod types;
mod volume;

// Public exports
pub use coordinator::PlaybackCoordinator;
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{CoordinatorEvent, PlaybackEvent};
pub use output::{AudioOutput, OutputEvent, SimulatedOutput};
pub use subscription::SubscriptionId;
pub use types::{EngineState, RepeatMode};
