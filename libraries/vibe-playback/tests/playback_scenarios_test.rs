//! End-to-end playback scenarios against a real progress store
//!
//! Engines run over the simulated output with a manual clock, writing play
//! counts and checkpoints into a memory-backed `ProgressStore`.


use std::sync::Arc;
use std::time::Duration;

use test_helpers::*;
use vibe_core::{ItemId, ManualClock, MediaKind, ProgressTracker};
use vibe_playback::{EngineState, PlaybackError, PlaybackEvent};
use vibe_storage::MemoryBackend;

fn id(raw: &str) -> ItemId {
    ItemId::new(raw)
}

#[test]
fn test_music_queue_plays_through_then_stops() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();
    let mut store = store(&backend, clock.clone());
    let mut engine = engine(MediaKind::Music, clock.clone());

    let queue = store.catalog().queue_for(MediaKind::Music);
    engine
        .load(queue[0].clone(), Some(queue), 0, &mut store)
        .unwrap();
    for _ in 0..3 {
        ready(&mut engine, &mut store, 10);
        play_for(&mut engine, &mut store, &clock, 10);
    }

    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.cursor(), Some(2));
    for track in store.catalog().tracks() {
        assert_eq!(track.stats.play_count, 1, "{} should be counted once", track.id);
    }

    let ended: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlaybackEvent::Ended { .. }))
        .collect();
    assert_eq!(ended, vec![PlaybackEvent::Ended { item_id: id("m3") }]);
}

#[test]
fn test_episode_resumes_and_completes() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();
    let mut store = store(&backend, clock.clone());
    store.record_progress(&id("p1"), 120.0, 20.0);
    let mut engine = engine(MediaKind::Podcast, clock.clone());

    let item = store.catalog().item(&id("p1"), MediaKind::Podcast).unwrap();
    engine.load(item, None, 0, &mut store).unwrap();
    ready(&mut engine, &mut store, 600);
    assert_eq!(engine.current_time(), 120.0);

    play_for(&mut engine, &mut store, &clock, 480);

    let episode = store.catalog().episode(&id("p1")).unwrap();
    assert_eq!(episode.progress.percent_complete, 100.0);
    assert_eq!(episode.progress.position_secs, 0.0);
    assert!(episode.progress.completed);
    assert!(episode.progress.completed_at.is_some());
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn test_checkpoints_survive_restart() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();

    {
        let mut store = store(&backend, clock.clone());
        let mut engine = engine(MediaKind::Podcast, clock.clone());
        let item = store.catalog().item(&id("p1"), MediaKind::Podcast).unwrap();
        engine.load(item, None, 0, &mut store).unwrap();
        ready(&mut engine, &mut store, 600);

        play_for(&mut engine, &mut store, &clock, 12);
        assert_eq!(
            store.catalog().episode(&id("p1")).unwrap().progress.position_secs,
            10.0
        );
        engine.pause(&mut store);
    }

    let mut store = store(&backend, clock.clone());
    store.restore();
    assert_eq!(store.saved_position(&id("p1")), Some(Duration::from_secs(12)));
    assert_eq!(
        store.catalog().episode(&id("p1")).unwrap().progress.percent_complete,
        2.0
    );

    let mut engine = engine(MediaKind::Podcast, clock);
    let item = store.catalog().item(&id("p1"), MediaKind::Podcast).unwrap();
    engine.load(item, None, 0, &mut store).unwrap();
    ready(&mut engine, &mut store, 600);
    assert_eq!(engine.current_time(), 12.0);
}

#[test]
fn test_switching_episodes_keeps_outgoing_position() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();
    let mut store = store(&backend, clock.clone());
    let mut engine = engine(MediaKind::Podcast, clock.clone());

    let queue = store.catalog().queue_for(MediaKind::Podcast);
    engine
        .load(queue[0].clone(), Some(queue), 0, &mut store)
        .unwrap();
    ready(&mut engine, &mut store, 600);
    play_for(&mut engine, &mut store, &clock, 12);

    engine.next(&mut store).unwrap();
    assert_eq!(engine.state(), EngineState::Loading);
    assert_eq!(
        store.catalog().episode(&id("p1")).unwrap().progress.position_secs,
        12.0
    );

    // The old timer is gone and the new item is not playing yet
    clock.advance(Duration::from_secs(30));
    engine.tick(&mut store);
    let next = store.catalog().episode(&id("p2")).unwrap();
    assert!(next.progress.last_listened.is_none());
    assert_eq!(next.stats.play_count, 1);
}

#[test]
fn test_failed_open_leaves_store_untouched() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();
    let mut store = store(&backend, clock.clone());
    let mut engine = engine(MediaKind::Music, clock);
    engine.output_mut().reject("audio/m1.mp3");

    let item = store.catalog().item(&id("m1"), MediaKind::Music).unwrap();
    let result = engine.load(item, None, 0, &mut store);

    assert!(matches!(result, Err(PlaybackError::Open { .. })));
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(store.catalog().track(&id("m1")).unwrap().stats.play_count, 0);
    assert!(backend.is_empty());
}

#[test]
fn test_previous_near_start_moves_back() {
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = MemoryBackend::new();
    let mut store = store(&backend, clock.clone());
    let mut engine = engine(MediaKind::Music, clock.clone());

    let queue = store.catalog().queue_for(MediaKind::Music);
    engine
        .load(queue[1].clone(), Some(queue), 1, &mut store)
        .unwrap();
    ready(&mut engine, &mut store, 60);
    play_for(&mut engine, &mut store, &clock, 2);

    let item = engine.previous(&mut store).unwrap().unwrap();
    assert_eq!(item.id(), &id("m1"));
    assert_eq!(engine.cursor(), Some(0));
}
