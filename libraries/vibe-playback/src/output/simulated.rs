use std::collections::HashSet;
use std::time::Duration;

use super::{AudioOutput, OutputEvent};
use crate::error::{PlaybackError, Result};
use crate::subscription::SubscriptionId;
use crate::types::secs_to_duration;

/// Headless output that renders nothing and moves only when told to
///
/// The host decides when a resource becomes ready, how much time passes and
/// when a failure happens, then drains the resulting events with
/// [`Self::take_events`] and feeds them back to the engine. Events queued for
/// a resource stay queued after it is closed, which is how a late event from
/// an abandoned load looks in practice.
#[derive(Debug, Clone)]
pub struct SimulatedOutput {
    locator: Option<String>,
    subscription: Option<SubscriptionId>,
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
    volume: f32,
    rate: f32,
    rejected: HashSet<String>,
    opened: usize,
    pending: Vec<(SubscriptionId, OutputEvent)>,
}

impl SimulatedOutput {
    /// Create an output with nothing opened
    pub fn new() -> Self {
        Self {
            locator: None,
            subscription: None,
            position: Duration::ZERO,
            duration: None,
            playing: false,
            volume: 1.0,
            rate: 1.0,
            rejected: HashSet::new(),
            opened: 0,
            pending: Vec::new(),
        }
    }

    /// Make every future `open` of `locator` fail
    pub fn reject(&mut self, locator: impl Into<String>) {
        self.rejected.insert(locator.into());
    }

    /// Report the opened resource ready with `duration`
    pub fn finish_loading(&mut self, duration: Duration) {
        if let Some(sub) = self.subscription {
            self.duration = Some(duration);
            self.position = self.position.min(duration);
            self.pending.push((sub, OutputEvent::MetadataReady { duration }));
        }
    }

    /// Let `elapsed` of wall-clock time pass
    ///
    /// Position moves by `elapsed * rate` while playing. Reaching the end
    /// stops playback and queues [`OutputEvent::Ended`].
    pub fn advance(&mut self, elapsed: Duration) {
        let (Some(sub), Some(duration)) = (self.subscription, self.duration) else {
            return;
        };
        if !self.playing {
            return;
        }

        let moved = secs_to_duration(elapsed.as_secs_f64() * f64::from(self.rate));
        self.position = self.position.saturating_add(moved).min(duration);
        self.pending.push((
            sub,
            OutputEvent::TimeUpdate {
                position: self.position,
            },
        ));

        if self.position >= duration {
            self.playing = false;
            self.pending.push((sub, OutputEvent::Ended));
        }
    }

    /// Report a mid-stream failure of the opened resource
    pub fn fail(&mut self, message: impl Into<String>) {
        if let Some(sub) = self.subscription {
            self.playing = false;
            self.pending.push((sub, OutputEvent::Error(message.into())));
        }
    }

    /// Drain queued events in the order they happened
    pub fn take_events(&mut self) -> Vec<(SubscriptionId, OutputEvent)> {
        std::mem::take(&mut self.pending)
    }

    /// Locator of the opened resource
    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    /// Subscription the opened resource reports under
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Whether audio is rendering
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last applied volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Last applied rate
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Number of successful opens so far
    pub fn open_count(&self) -> usize {
        self.opened
    }
}

impl Default for SimulatedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for SimulatedOutput {
    fn open(&mut self, locator: &str, subscription: SubscriptionId) -> Result<()> {
        if self.rejected.contains(locator) {
            return Err(PlaybackError::Open {
                locator: locator.to_string(),
                reason: "resource unavailable".to_string(),
            });
        }

        self.locator = Some(locator.to_string());
        self.subscription = Some(subscription);
        self.position = Duration::ZERO;
        self.duration = None;
        self.playing = false;
        self.opened += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.locator = None;
        self.subscription = None;
        self.position = Duration::ZERO;
        self.duration = None;
        self.playing = false;
    }

    fn play(&mut self) -> Result<()> {
        if self.subscription.is_none() {
            return Err(PlaybackError::NoItemLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        self.position = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Subscriptions;
    use vibe_core::MediaKind;

    fn opened() -> (SimulatedOutput, SubscriptionId) {
        let sub = Subscriptions::new(MediaKind::Music).subscribe();
        let mut output = SimulatedOutput::new();
        output.open("a.mp3", sub).unwrap();
        (output, sub)
    }

    #[test]
    fn advance_reaches_end_and_stops() {
        let (mut output, sub) = opened();
        output.finish_loading(Duration::from_secs(10));
        output.play().unwrap();
        output.take_events();

        output.advance(Duration::from_secs(15));
        let events = output.take_events();

        assert_eq!(output.position(), Duration::from_secs(10));
        assert!(!output.is_playing());
        assert_eq!(events.last(), Some(&(sub, OutputEvent::Ended)));
    }

    #[test]
    fn rate_scales_elapsed_time() {
        let (mut output, _) = opened();
        output.finish_loading(Duration::from_secs(100));
        output.set_rate(2.0);
        output.play().unwrap();

        output.advance(Duration::from_secs(5));
        assert_eq!(output.position(), Duration::from_secs(10));
    }

    #[test]
    fn rejected_locator_fails_open() {
        let sub = Subscriptions::new(MediaKind::Music).subscribe();
        let mut output = SimulatedOutput::new();
        output.reject("broken.mp3");

        assert!(matches!(
            output.open("broken.mp3", sub),
            Err(PlaybackError::Open { .. })
        ));
        assert_eq!(output.open_count(), 0);
    }

    #[test]
    fn events_survive_close() {
        let (mut output, sub) = opened();
        output.finish_loading(Duration::from_secs(1));
        output.close();

        assert_eq!(
            output.take_events(),
            vec![(
                sub,
                OutputEvent::MetadataReady {
                    duration: Duration::from_secs(1)
                }
            )]
        );
    }
}
