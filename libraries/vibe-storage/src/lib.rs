//! VibeStream Storage
//!
//! Per-user persistence of play counts and podcast progress.
//!
//! # Architecture
//!
//! - **Progress Store**: owns the catalog and is the sole writer of play state
//! - **Backends**: string blob stores keyed per user (in-memory, one file per key)
//! - **Snapshot**: the persisted projection, rewritten in full on every change
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibe_core::{Catalog, FileSource, StaticIdentity, SystemClock, VibeConfig};
//! use vibe_storage::{FileBackend, ProgressStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VibeConfig::load()?;
//! let catalog = Catalog::load_all(&FileSource::new(&config.catalog.path));
//!
//! let mut store = ProgressStore::new(catalog, Box::new(FileBackend::new(&config.storage.state_dir)))
//!     .with_identity(Box::new(StaticIdentity::user("alice")))
//!     .with_clock(Arc::new(SystemClock))
//!     .with_settings(config.storage.clone());
//! store.restore();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;

pub mod backend;
pub mod progress;

pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use error::{Result, StorageError};
pub use progress::{PlayStateSnapshot, ProgressStore};

// Identity lives in core so engines and the store share one trait
pub use vibe_core::{StaticIdentity, UserIdentity};
