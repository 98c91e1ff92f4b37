//! Playback engine - one playback session per media kind
//!
//! Owns a queue, a cursor and one [`AudioOutput`]. Music engines add shuffle
//! and repeat; podcast engines add skip, speed, resume from the saved
//! position and periodic progress checkpoints.
//!
//! Play-state writes go through the [`ProgressTracker`] passed into each call
//! that can produce one; the engine never persists anything itself.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vibe_core::{Clock, ItemId, MediaItem, MediaKind, PlaybackSettings, ProgressTracker};

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    output::{AudioOutput, OutputEvent},
    queue::Queue,
    schedule::{Scheduler, TaskId},
    shuffle::Shuffler,
    subscription::{SubscriptionId, Subscriptions},
    types::{EngineState, RepeatMode},
    volume::Volume,
};

#[derive(Debug, Clone, Copy)]
enum Step {
    Next,
    Previous,
}

/// Playback session for one media kind
pub struct PlaybackEngine<O: AudioOutput> {
    kind: MediaKind,
    output: O,
    settings: PlaybackSettings,
    clock: Arc<dyn Clock>,

    state: EngineState,
    current: Option<MediaItem>,
    queue: Queue,

    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,
    speed: f32,
    shuffler: Shuffler,

    subscriptions: Subscriptions,
    scheduler: Scheduler,
    checkpoint_task: Option<TaskId>,

    // Applied when the output reports ready
    pending_seek: Option<Duration>,
    pause_when_ready: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    /// Create an engine for `kind` driving `output`
    pub fn new(
        kind: MediaKind,
        output: O,
        settings: PlaybackSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            output,
            volume: Volume::new(settings.initial_volume),
            speed: settings.default_speed,
            settings,
            clock,
            state: EngineState::Idle,
            current: None,
            queue: Queue::new(),
            shuffle: false,
            repeat: RepeatMode::Off,
            shuffler: Shuffler::new(),
            subscriptions: Subscriptions::new(kind),
            scheduler: Scheduler::new(),
            checkpoint_task: None,
            pending_seek: None,
            pause_when_ready: false,
            pending_events: Vec::new(),
        }
    }

    /// Use a deterministic shuffle sequence
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffler = Shuffler::seeded(seed);
        self
    }

    // ===== Transport =====

    /// Make `item` current and start opening it
    ///
    /// With `queue`, the queue is replaced and the cursor set to
    /// `start_index`; without, queue and cursor are left alone. The engine
    /// sits in `Loading` until the output reports ready. Episodes resume from
    /// the tracker's saved position, falling back to the item's own.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an item of the other kind, `IndexOutOfBounds`
    /// for a bad `start_index`, `Open` if the output rejects the resource (the
    /// engine is then `Idle` and an `Error` event is queued).
    pub fn load(
        &mut self,
        item: MediaItem,
        queue: Option<Vec<MediaItem>>,
        start_index: usize,
        tracker: &mut dyn ProgressTracker,
    ) -> Result<()> {
        if item.kind() != self.kind {
            return Err(PlaybackError::invalid(format!(
                "cannot load a {} item into the {} engine",
                item.kind(),
                self.kind
            )));
        }

        if let Some(items) = queue {
            if items.iter().any(|i| i.kind() != self.kind) {
                return Err(PlaybackError::invalid(format!(
                    "queue for the {} engine holds items of another kind",
                    self.kind
                )));
            }
            self.queue.replace(items, start_index)?;
        }

        self.open_item(item, tracker)
    }

    /// Start or resume playback
    ///
    /// No-op when nothing is loaded or already playing. An item that ended
    /// starts over from the beginning.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            EngineState::Paused => self.start_output(),
            EngineState::Loading => {
                self.pause_when_ready = false;
                Ok(())
            }
            EngineState::Idle => {
                if self.current.is_none() || self.subscriptions.live().is_none() {
                    return Ok(());
                }
                self.output.seek(Duration::ZERO);
                self.start_output()
            }
            EngineState::Playing => Ok(()),
        }
    }

    /// Pause playback
    ///
    /// Episodes checkpoint their position immediately. Pausing while loading
    /// makes the item land in `Paused` once ready.
    pub fn pause(&mut self, tracker: &mut dyn ProgressTracker) {
        match self.state {
            EngineState::Playing => {
                self.output.pause();
                self.cancel_checkpoints();
                self.set_state(EngineState::Paused);
                self.checkpoint(tracker);
            }
            EngineState::Loading => self.pause_when_ready = true,
            EngineState::Idle | EngineState::Paused => {}
        }
    }

    /// Pause if playing, otherwise play
    pub fn toggle_play(&mut self, tracker: &mut dyn ProgressTracker) -> Result<()> {
        if self.is_playing() {
            self.pause(tracker);
            Ok(())
        } else {
            self.play()
        }
    }

    /// Stop playback and release the resource
    ///
    /// Clears the current item but keeps the queue.
    pub fn stop(&mut self, tracker: &mut dyn ProgressTracker) {
        if self.state == EngineState::Playing {
            self.checkpoint(tracker);
        }
        self.release();
        self.pending_seek = None;
        self.pause_when_ready = false;
        self.current = None;
        self.set_state(EngineState::Idle);
    }

    /// Seek to `seconds`, clamped to `[0, duration]`
    ///
    /// While loading, the target replaces any resume position.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.current.is_none() {
            return Err(PlaybackError::NoItemLoaded);
        }

        let target = self.clamp_position(seconds);
        if self.state == EngineState::Loading {
            self.pending_seek = Some(target);
            return Ok(());
        }

        self.output.seek(target);
        self.emit_time_update(target);
        Ok(())
    }

    /// Seek to a fraction of the duration (0.0-1.0)
    pub fn seek_to_percent(&mut self, percent: f64) -> Result<()> {
        let duration = self
            .duration()
            .ok_or_else(|| PlaybackError::invalid("duration not known yet"))?;
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 1.0)
        };
        self.seek(duration * percent)
    }

    /// Advance the cursor and load the item there
    ///
    /// Shuffled music picks a uniformly random index; everything else moves
    /// one step, wrapping at the end. Returns `Ok(None)` for an empty queue.
    pub fn next(&mut self, tracker: &mut dyn ProgressTracker) -> Result<Option<MediaItem>> {
        self.step(Step::Next, tracker)
    }

    /// Restart the current item, or move the cursor back
    ///
    /// Past the restart threshold (3 s by default) the current item seeks
    /// to 0 and the cursor stays put. Otherwise moves like [`Self::next`] in
    /// the other direction.
    ///
    /// A restart leaves the state alone: an item that ended naturally stays
    /// `Idle` at position 0 until [`Self::play`] is called.
    pub fn previous(&mut self, tracker: &mut dyn ProgressTracker) -> Result<Option<MediaItem>> {
        if self.queue.is_empty() {
            return Ok(None);
        }

        if self.current.is_some() && self.current_time() > self.settings.restart_threshold_secs {
            debug!(kind = %self.kind, "Restarting current item");
            self.output.seek(Duration::ZERO);
            self.emit_time_update(Duration::ZERO);
            return Ok(self.current.clone());
        }

        self.step(Step::Previous, tracker)
    }

    // ===== Volume =====

    /// Set volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    // ===== Music modes =====

    /// Flip shuffle; returns the new setting
    pub fn toggle_shuffle(&mut self) -> Result<bool> {
        self.require_kind(MediaKind::Music, "shuffle")?;
        self.shuffle = !self.shuffle;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
        Ok(self.shuffle)
    }

    /// Cycle repeat `off → all → one → off`; returns the new mode
    pub fn toggle_repeat(&mut self) -> Result<RepeatMode> {
        self.require_kind(MediaKind::Music, "repeat")?;
        self.repeat = self.repeat.cycle();
        self.pending_events
            .push(PlaybackEvent::RepeatChanged { mode: self.repeat });
        Ok(self.repeat)
    }

    // ===== Podcast controls =====

    /// Jump forward by `seconds` (configured skip distance when `None`)
    pub fn skip_forward(&mut self, seconds: Option<f64>) -> Result<()> {
        self.require_kind(MediaKind::Podcast, "skip")?;
        let step = seconds.unwrap_or(self.settings.skip_secs);
        self.seek(self.current_time() + step)
    }

    /// Jump back by `seconds` (configured skip distance when `None`)
    pub fn skip_backward(&mut self, seconds: Option<f64>) -> Result<()> {
        self.require_kind(MediaKind::Podcast, "skip")?;
        let step = seconds.unwrap_or(self.settings.skip_secs);
        self.seek(self.current_time() - step)
    }

    /// Set the playback rate multiplier
    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        self.require_kind(MediaKind::Podcast, "speed")?;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(PlaybackError::invalid(format!("invalid speed {speed}")));
        }

        self.speed = speed;
        self.output.set_rate(speed);
        self.pending_events.push(PlaybackEvent::SpeedChanged { speed });
        Ok(())
    }

    /// Move to the next configured speed preset; returns the new speed
    ///
    /// From a speed that is not a preset, moves to the first faster preset
    /// (or wraps to the first one).
    pub fn cycle_speed(&mut self) -> Result<f32> {
        self.require_kind(MediaKind::Podcast, "speed")?;
        let presets = &self.settings.speed_presets;
        let Some(&first) = presets.first() else {
            return Ok(self.speed);
        };

        let next = match presets.iter().position(|p| (p - self.speed).abs() < 1e-3) {
            Some(i) => presets[(i + 1) % presets.len()],
            None => presets
                .iter()
                .copied()
                .find(|p| *p > self.speed)
                .unwrap_or(first),
        };

        self.set_speed(next)?;
        Ok(next)
    }

    // ===== Output events and timers =====

    /// Process an event reported by the output
    ///
    /// Events for any subscription other than the live one are dropped.
    /// Returns an error only when an automatic advance fails to open the
    /// next item.
    pub fn handle_output_event(
        &mut self,
        subscription: SubscriptionId,
        event: OutputEvent,
        tracker: &mut dyn ProgressTracker,
    ) -> Result<()> {
        if !self.subscriptions.is_live(subscription) {
            debug!(kind = %self.kind, %subscription, ?event, "Dropping event from stale subscription");
            return Ok(());
        }

        match event {
            OutputEvent::MetadataReady { duration } => self.on_ready(duration),
            OutputEvent::TimeUpdate { position } => {
                self.emit_time_update(position);
                Ok(())
            }
            OutputEvent::Ended => self.on_ended(tracker),
            OutputEvent::Error(message) => {
                self.fail(message);
                Ok(())
            }
        }
    }

    /// Run scheduled work that is due by the clock
    pub fn tick(&mut self, tracker: &mut dyn ProgressTracker) {
        for (task, owner) in self.scheduler.due(self.clock.now()) {
            let current = self.checkpoint_task == Some(task)
                && self.subscriptions.is_live(owner)
                && self.state == EngineState::Playing;
            if !current {
                debug!(kind = %self.kind, %owner, "Ignoring stale checkpoint");
                continue;
            }
            self.checkpoint(tracker);
        }
    }

    // ===== Getters =====

    /// Media kind this engine plays
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether playing, or about to once loading finishes
    pub fn is_playing(&self) -> bool {
        match self.state {
            EngineState::Playing => true,
            EngineState::Loading => !self.pause_when_ready,
            EngineState::Idle | EngineState::Paused => false,
        }
    }

    /// Current item
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.current.as_ref()
    }

    /// Queue items in order
    pub fn queue(&self) -> &[MediaItem] {
        self.queue.items()
    }

    /// Queue cursor
    pub fn cursor(&self) -> Option<usize> {
        self.queue.cursor()
    }

    /// Playback position in seconds (0 when nothing is loaded)
    pub fn current_time(&self) -> f64 {
        if self.current.is_none() {
            return 0.0;
        }
        self.output.position().as_secs_f64()
    }

    /// Duration in seconds, once the output knows it
    pub fn duration(&self) -> Option<f64> {
        self.current.as_ref()?;
        self.output.duration().map(|d| d.as_secs_f64())
    }

    /// Position as a percentage of the duration (0 when unknown)
    pub fn progress_percent(&self) -> f64 {
        match self.duration() {
            Some(duration) if duration > 0.0 => self.current_time() / duration * 100.0,
            _ => 0.0,
        }
    }

    /// Volume level (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Whether shuffle is on
    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Playback rate multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Subscription the current resource reports under
    pub fn live_subscription(&self) -> Option<SubscriptionId> {
        self.subscriptions.live()
    }

    /// Whether a progress checkpoint is scheduled
    pub fn has_checkpoint_scheduled(&self) -> bool {
        self.checkpoint_task
            .is_some_and(|task| self.scheduler.is_scheduled(task))
    }

    /// Output being driven
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Output being driven, mutably
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn step(&mut self, step: Step, tracker: &mut dyn ProgressTracker) -> Result<Option<MediaItem>> {
        let index = if self.kind == MediaKind::Music && self.shuffle {
            self.shuffler.pick(self.queue.len())
        } else {
            match step {
                Step::Next => self.queue.next_index(),
                Step::Previous => self.queue.previous_index(),
            }
        };
        let Some(index) = index else {
            return Ok(None);
        };

        self.queue.set_cursor(index)?;
        let item = self
            .queue
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        debug!(kind = %self.kind, ?step, index, "Moving cursor");

        self.open_item(item.clone(), tracker)?;
        Ok(Some(item))
    }

    fn open_item(&mut self, item: MediaItem, tracker: &mut dyn ProgressTracker) -> Result<()> {
        // The outgoing episode keeps its place
        if self.state == EngineState::Playing {
            self.checkpoint(tracker);
        }
        self.release();

        let previous = self.current.take().map(|c| c.id().clone());
        let item_id = item.id().clone();
        let subscription = self.subscriptions.subscribe();

        self.pause_when_ready = false;
        self.pending_seek = match self.kind {
            MediaKind::Podcast => tracker
                .saved_position(&item_id)
                .or_else(|| item.saved_position()),
            MediaKind::Music => None,
        };

        if let Err(e) = self.output.open(item.audio_file(), subscription) {
            warn!(kind = %self.kind, id = %item_id, error = %e, "Failed to open item");
            self.subscriptions.unsubscribe();
            self.pending_seek = None;
            self.emit_error(e.to_string());
            self.set_state(EngineState::Idle);
            return Err(e);
        }

        self.output.set_volume(self.volume.effective());
        self.output.set_rate(match self.kind {
            MediaKind::Podcast => self.speed,
            MediaKind::Music => 1.0,
        });

        info!(kind = %self.kind, id = %item_id, %subscription, "Loading item");
        self.current = Some(item);
        self.set_state(EngineState::Loading);
        self.emit_item_changed(item_id.clone(), previous);
        tracker.record_play(&item_id, self.kind);
        Ok(())
    }

    fn on_ready(&mut self, duration: Duration) -> Result<()> {
        self.pending_events.push(PlaybackEvent::MetadataReady {
            duration_secs: duration.as_secs_f64(),
        });
        if self.state != EngineState::Loading {
            return Ok(());
        }

        if let Some(position) = self.pending_seek.take() {
            let position = position.min(duration);
            debug!(kind = %self.kind, position_secs = position.as_secs_f64(), "Resuming");
            self.output.seek(position);
        }

        if self.pause_when_ready {
            self.pause_when_ready = false;
            self.set_state(EngineState::Paused);
            return Ok(());
        }
        self.start_output()
    }

    fn on_ended(&mut self, tracker: &mut dyn ProgressTracker) -> Result<()> {
        self.cancel_checkpoints();
        let Some(item_id) = self.current.as_ref().map(|i| i.id().clone()) else {
            return Ok(());
        };

        let advance = match self.kind {
            MediaKind::Music => {
                if self.repeat == RepeatMode::One {
                    debug!(id = %item_id, "Repeating item");
                    self.output.seek(Duration::ZERO);
                    return self.start_output();
                }
                self.repeat == RepeatMode::All || self.queue.has_next()
            }
            MediaKind::Podcast => {
                tracker.record_progress(&item_id, 0.0, 100.0);
                self.queue.has_next()
            }
        };

        // The ended item is no longer playing; nothing left to checkpoint
        self.set_state(EngineState::Idle);

        if advance && self.next(tracker)?.is_some() {
            return Ok(());
        }

        info!(kind = %self.kind, id = %item_id, "Playback ended");
        self.pending_events.push(PlaybackEvent::Ended { item_id });
        Ok(())
    }

    fn start_output(&mut self) -> Result<()> {
        if let Err(e) = self.output.play() {
            let message = e.to_string();
            self.fail(message.clone());
            return Err(PlaybackError::Stream(message));
        }
        self.set_state(EngineState::Playing);
        self.start_checkpoints();
        Ok(())
    }

    fn fail(&mut self, message: String) {
        warn!(kind = %self.kind, error = %message, "Playback failed");
        self.release();
        self.pending_seek = None;
        self.pause_when_ready = false;
        self.current = None;
        self.emit_error(message);
        self.set_state(EngineState::Idle);
    }

    fn release(&mut self) {
        self.cancel_checkpoints();
        if self.subscriptions.unsubscribe().is_some() {
            self.output.close();
        }
    }

    fn start_checkpoints(&mut self) {
        if self.kind != MediaKind::Podcast {
            return;
        }
        self.cancel_checkpoints();
        let Some(owner) = self.subscriptions.live() else {
            return;
        };

        let every = Duration::from_secs(self.settings.checkpoint_interval_secs.max(1));
        self.checkpoint_task = Some(self.scheduler.schedule_every(self.clock.now(), every, owner));
    }

    fn cancel_checkpoints(&mut self) {
        if let Some(task) = self.checkpoint_task.take() {
            self.scheduler.cancel(task);
        }
    }

    fn checkpoint(&self, tracker: &mut dyn ProgressTracker) {
        if self.kind != MediaKind::Podcast {
            return;
        }
        let Some(item) = &self.current else {
            return;
        };
        let Some(duration) = self.output.duration().filter(|d| !d.is_zero()) else {
            return;
        };

        let position = self.output.position().as_secs_f64();
        let percent = position / duration.as_secs_f64() * 100.0;
        debug!(id = %item.id(), position, percent, "Checkpoint");
        tracker.record_progress(item.id(), position, percent);
    }

    fn clamp_position(&self, seconds: f64) -> Duration {
        let target = if seconds.is_nan() || seconds <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        };
        match self.output.duration() {
            Some(duration) => target.min(duration),
            None => target,
        }
    }

    fn require_kind(&self, kind: MediaKind, operation: &str) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(PlaybackError::invalid(format!(
                "{operation} is not available for {}",
                self.kind
            )))
        }
    }

    fn apply_volume(&mut self) {
        self.output.set_volume(self.volume.effective());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    // ===== Events =====

    fn set_state(&mut self, state: EngineState) {
        if self.state == state {
            return;
        }
        debug!(kind = %self.kind, from = %self.state, to = %state, "State change");
        self.state = state;
        self.pending_events.push(PlaybackEvent::StateChanged { state });
    }

    fn emit_item_changed(&mut self, item_id: ItemId, previous_item_id: Option<ItemId>) {
        self.pending_events.push(PlaybackEvent::ItemChanged {
            item_id,
            previous_item_id,
        });
    }

    fn emit_time_update(&mut self, position: Duration) {
        self.pending_events.push(PlaybackEvent::TimeUpdate {
            position_secs: position.as_secs_f64(),
            duration_secs: self.output.duration().map(|d| d.as_secs_f64()),
        });
    }

    fn emit_error(&mut self, message: String) {
        self.pending_events.push(PlaybackEvent::Error { message });
    }
}
