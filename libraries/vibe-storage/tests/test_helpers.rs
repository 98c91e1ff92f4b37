//! Test helpers and fixtures for storage integration tests

#![allow(dead_code)]

use std::sync::{Arc, Once};

use vibe_core::{Catalog, Episode, ManualClock, StaticIdentity, Track};
use vibe_storage::{MemoryBackend, ProgressStore, StateBackend};

static INIT: Once = Once::new();

/// Install a test log subscriber once per binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Small catalog with two tracks and two episodes of one show
pub fn sample_catalog() -> Catalog {
    let mut long = Episode::new("p1", "Pilot", "Deep Dive", "audio/p1.mp3");
    long.duration_secs = Some(600.0);
    let mut short = Episode::new("p2", "Follow-up", "Deep Dive", "audio/p2.mp3");
    short.duration_secs = Some(300.0);

    Catalog::new(
        vec![
            Track::new("m1", "Opening", "Band", "audio/m1.mp3"),
            Track::new("m2", "Closing", "Band", "audio/m2.mp3"),
        ],
        vec![long, short],
    )
}

/// Store over [`sample_catalog`] for `user`, on a manual clock
pub fn store_for(
    backend: impl StateBackend + 'static,
    user: Option<&str>,
    clock: Arc<ManualClock>,
) -> ProgressStore {
    init_tracing();

    let identity = match user {
        Some(id) => StaticIdentity::user(id),
        None => StaticIdentity::anonymous(),
    };
    ProgressStore::new(sample_catalog(), Box::new(backend))
        .with_identity(Box::new(identity))
        .with_clock(clock)
}

/// Memory-backed store for `user`
pub fn memory_store(backend: &MemoryBackend, user: Option<&str>) -> ProgressStore {
    store_for(backend.clone(), user, Arc::new(ManualClock::at_epoch()))
}
