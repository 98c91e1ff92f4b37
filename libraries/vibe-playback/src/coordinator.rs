//! Playback coordinator
//!
//! One control surface over the music and podcast engines. Transport calls
//! go to whichever engine the active selector names; the other engine keeps
//! its state (and keeps playing, if it was). Mode controls that only make
//! sense for one kind always go to that kind's engine.

use std::sync::Arc;

use tracing::debug;
use vibe_core::{Clock, MediaItem, MediaKind, PlaybackSettings, ProgressTracker};

use crate::{
    engine::PlaybackEngine,
    error::Result,
    events::CoordinatorEvent,
    output::{AudioOutput, OutputEvent},
    subscription::SubscriptionId,
    types::{EngineState, RepeatMode},
};

/// Unified controller over both playback engines
pub struct PlaybackCoordinator<O: AudioOutput, T: ProgressTracker> {
    music: PlaybackEngine<O>,
    podcast: PlaybackEngine<O>,
    tracker: T,
    active: MediaKind,
}

impl<O: AudioOutput, T: ProgressTracker> PlaybackCoordinator<O, T> {
    /// Create a coordinator; music starts out active
    pub fn new(
        music_output: O,
        podcast_output: O,
        tracker: T,
        settings: &PlaybackSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            music: PlaybackEngine::new(
                MediaKind::Music,
                music_output,
                settings.clone(),
                clock.clone(),
            ),
            podcast: PlaybackEngine::new(MediaKind::Podcast, podcast_output, settings.clone(), clock),
            tracker,
            active: MediaKind::Music,
        }
    }

    /// Currently active kind
    pub fn active(&self) -> MediaKind {
        self.active
    }

    /// Switch the active kind; the other engine is left as it is
    pub fn set_active(&mut self, kind: MediaKind) {
        if self.active != kind {
            debug!(from = %self.active, to = %kind, "Switching active player");
            self.active = kind;
        }
    }

    /// Load `item` on its kind's engine and make that kind active
    pub fn play_item(
        &mut self,
        item: MediaItem,
        queue: Option<Vec<MediaItem>>,
        start_index: usize,
    ) -> Result<()> {
        let kind = item.kind();
        self.set_active(kind);
        let (engine, tracker) = self.split(kind);
        engine.load(item, queue, start_index, tracker)
    }

    // ===== Transport (active engine) =====

    /// Start or resume the active engine
    pub fn play(&mut self) -> Result<()> {
        self.active_engine_mut().play()
    }

    /// Pause the active engine
    pub fn pause(&mut self) {
        let (engine, tracker) = self.split(self.active);
        engine.pause(tracker);
    }

    /// Toggle play/pause on the active engine
    pub fn toggle_play(&mut self) -> Result<()> {
        let (engine, tracker) = self.split(self.active);
        engine.toggle_play(tracker)
    }

    /// Stop the active engine
    pub fn stop(&mut self) {
        let (engine, tracker) = self.split(self.active);
        engine.stop(tracker);
    }

    /// Seek the active engine to `seconds`
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        self.active_engine_mut().seek(seconds)
    }

    /// Seek the active engine to a fraction of the duration (0.0-1.0)
    pub fn seek_to_percent(&mut self, percent: f64) -> Result<()> {
        self.active_engine_mut().seek_to_percent(percent)
    }

    /// Next item on the active engine
    pub fn next(&mut self) -> Result<Option<MediaItem>> {
        let (engine, tracker) = self.split(self.active);
        engine.next(tracker)
    }

    /// Previous item (or restart) on the active engine
    pub fn previous(&mut self) -> Result<Option<MediaItem>> {
        let (engine, tracker) = self.split(self.active);
        engine.previous(tracker)
    }

    /// Set the active engine's volume
    pub fn set_volume(&mut self, level: f32) {
        self.active_engine_mut().set_volume(level);
    }

    /// Toggle mute on the active engine
    pub fn toggle_mute(&mut self) {
        self.active_engine_mut().toggle_mute();
    }

    // ===== Kind-specific controls =====

    /// Flip music shuffle
    pub fn toggle_shuffle(&mut self) -> Result<bool> {
        self.music.toggle_shuffle()
    }

    /// Cycle music repeat mode
    pub fn toggle_repeat(&mut self) -> Result<RepeatMode> {
        self.music.toggle_repeat()
    }

    /// Skip the podcast forward
    pub fn skip_forward(&mut self, seconds: Option<f64>) -> Result<()> {
        self.podcast.skip_forward(seconds)
    }

    /// Skip the podcast backward
    pub fn skip_backward(&mut self, seconds: Option<f64>) -> Result<()> {
        self.podcast.skip_backward(seconds)
    }

    /// Set the podcast playback rate
    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        self.podcast.set_speed(speed)
    }

    /// Move the podcast to its next speed preset
    pub fn cycle_speed(&mut self) -> Result<f32> {
        self.podcast.cycle_speed()
    }

    // ===== Events and timers =====

    /// Route an output event to the engine owning `subscription`
    pub fn handle_output_event(
        &mut self,
        subscription: SubscriptionId,
        event: OutputEvent,
    ) -> Result<()> {
        let (engine, tracker) = self.split(subscription.kind());
        engine.handle_output_event(subscription, event, tracker)
    }

    /// Run due checkpoints on both engines
    pub fn tick(&mut self) {
        self.music.tick(&mut self.tracker);
        self.podcast.tick(&mut self.tracker);
    }

    /// Drain both engines' events, music first
    pub fn drain_events(&mut self) -> Vec<CoordinatorEvent> {
        let music = self.music.drain_events().into_iter().map(|e| e.tagged(MediaKind::Music));
        let podcast = self
            .podcast
            .drain_events()
            .into_iter()
            .map(|e| e.tagged(MediaKind::Podcast));
        music.chain(podcast).collect()
    }

    // ===== Getters (active engine) =====

    /// Active engine's current item
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.active_engine().current_item()
    }

    /// Active engine's position in seconds
    pub fn current_time(&self) -> f64 {
        self.active_engine().current_time()
    }

    /// Active engine's duration in seconds
    pub fn duration(&self) -> Option<f64> {
        self.active_engine().duration()
    }

    /// Active engine's state
    pub fn state(&self) -> EngineState {
        self.active_engine().state()
    }

    /// Whether the active engine is playing
    pub fn is_playing(&self) -> bool {
        self.active_engine().is_playing()
    }

    /// Active engine's progress percentage
    pub fn progress_percent(&self) -> f64 {
        self.active_engine().progress_percent()
    }

    /// Active engine's volume
    pub fn volume(&self) -> f32 {
        self.active_engine().volume()
    }

    // ===== Accessors =====

    /// Engine for `kind`
    pub fn engine(&self, kind: MediaKind) -> &PlaybackEngine<O> {
        match kind {
            MediaKind::Music => &self.music,
            MediaKind::Podcast => &self.podcast,
        }
    }

    /// Engine for `kind`, mutably
    pub fn engine_mut(&mut self, kind: MediaKind) -> &mut PlaybackEngine<O> {
        match kind {
            MediaKind::Music => &mut self.music,
            MediaKind::Podcast => &mut self.podcast,
        }
    }

    /// Output of the engine for `kind`
    pub fn output_mut(&mut self, kind: MediaKind) -> &mut O {
        self.engine_mut(kind).output_mut()
    }

    /// Progress tracker
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Progress tracker, mutably
    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    fn active_engine(&self) -> &PlaybackEngine<O> {
        self.engine(self.active)
    }

    fn active_engine_mut(&mut self) -> &mut PlaybackEngine<O> {
        self.engine_mut(self.active)
    }

    fn split(&mut self, kind: MediaKind) -> (&mut PlaybackEngine<O>, &mut T) {
        let engine = match kind {
            MediaKind::Music => &mut self.music,
            MediaKind::Podcast => &mut self.podcast,
        };
        (engine, &mut self.tracker)
    }
}
