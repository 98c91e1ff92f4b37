//! Property-based tests for queue navigation and clamping


use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use test_helpers::*;
use vibe_core::{ItemId, ManualClock, MediaKind, ProgressTracker};

#[derive(Default)]
struct NullTracker;

impl ProgressTracker for NullTracker {
    fn record_play(&mut self, _id: &ItemId, _kind: MediaKind) {}

    fn record_progress(&mut self, _id: &ItemId, _position_secs: f64, _percent: f64) {}

    fn saved_position(&self, _id: &ItemId) -> Option<Duration> {
        None
    }
}

fn loaded(len: usize, start: usize) -> vibe_playback::PlaybackEngine<vibe_playback::SimulatedOutput> {
    let mut engine = engine(MediaKind::Music, Arc::new(ManualClock::at_epoch()));
    let queue = tracks(len);
    engine
        .load(queue[start].clone(), Some(queue), start, &mut NullTracker)
        .unwrap();
    ready(&mut engine, &mut NullTracker, 180);
    engine
}

proptest! {
    #[test]
    fn next_cycles_through_queue(len in 1usize..12, start_seed in 0usize..100, steps in 0usize..30) {
        let start = start_seed % len;
        let mut engine = loaded(len, start);

        for _ in 0..steps {
            engine.next(&mut NullTracker).unwrap();
        }
        prop_assert_eq!(engine.cursor(), Some((start + steps) % len));
    }

    #[test]
    fn previous_wraps_backwards(len in 1usize..12, start_seed in 0usize..100, steps in 0usize..30) {
        let start = start_seed % len;
        let mut engine = loaded(len, start);

        for _ in 0..steps {
            engine.previous(&mut NullTracker).unwrap();
        }
        prop_assert_eq!(engine.cursor(), Some((start + steps * (len - 1)) % len));
    }

    #[test]
    fn previous_past_threshold_restarts(len in 1usize..8, position in 4u64..180) {
        let mut engine = loaded(len, len - 1);
        engine.output_mut().advance(Duration::from_secs(position));

        engine.previous(&mut NullTracker).unwrap();
        prop_assert_eq!(engine.cursor(), Some(len - 1));
        prop_assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn volume_always_in_range(level in proptest::num::f32::ANY) {
        let mut engine = engine(MediaKind::Music, Arc::new(ManualClock::at_epoch()));
        engine.set_volume(level);
        prop_assert!((0.0..=1.0).contains(&engine.volume()));
    }

    #[test]
    fn seek_stays_within_duration(target in proptest::num::f64::ANY) {
        let mut engine = loaded(1, 0);
        engine.seek(target).unwrap();
        let time = engine.current_time();
        prop_assert!((0.0..=180.0).contains(&time));
    }
}
