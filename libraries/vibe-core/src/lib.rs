//! VibeStream Core
//!
//! Shared data model, catalog provider, configuration and error handling for
//! the VibeStream playback core.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Episode`, `MediaItem`, `PlayStats`, `EpisodeProgress`
//! - **Catalog**: read-only catalog document and its derived views
//! - **Collaborator Traits**: `ProgressTracker`, `UserIdentity`, `Clock`
//! - **Error Handling**: Unified `VibeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vibe_core::{Catalog, StaticSource};
//!
//! let source = StaticSource::new(
//!     r#"{"music": [{"id": "m1", "title": "Song", "artist": "Band", "audioFile": "a.mp3"}]}"#,
//! );
//! let catalog = Catalog::load_all(&source);
//!
//! assert_eq!(catalog.tracks().len(), 1);
//! assert!(catalog.episodes().is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogSource, FileSource, StaticSource};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CatalogSettings, PlaybackSettings, StorageSettings, VibeConfig};
pub use error::{Result, VibeError};
pub use traits::{ProgressTracker, StaticIdentity, UserIdentity};

pub use types::{
    parse_timestamp, Episode, EpisodeProgress, ItemId, MediaItem, MediaKind, PlayStats, Track,
};
