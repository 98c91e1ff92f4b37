/// Mutable per-item play state
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp::{lenient_seconds, lenient_timestamp, null_as_default};

/// Play statistics shared by tracks and episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStats {
    /// Number of times playback was started
    #[serde(default, deserialize_with = "null_as_default")]
    pub play_count: u32,

    /// When playback was last started
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_played: Option<DateTime<Utc>>,
}

impl PlayStats {
    /// Count one more play at `now`
    pub fn record_play(&mut self, now: DateTime<Utc>) {
        self.play_count = self.play_count.saturating_add(1);
        self.last_played = Some(now);
    }
}

/// Resume position and completion for a podcast episode
///
/// `completed` always equals `percent_complete >= 100`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeProgress {
    /// Resume position in seconds
    #[serde(
        default,
        rename = "progress",
        alias = "position",
        deserialize_with = "lenient_seconds"
    )]
    pub position_secs: f64,

    /// Percentage listened (0-100)
    #[serde(default, deserialize_with = "lenient_percent")]
    pub percent_complete: f64,

    /// When progress was last recorded
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_listened: Option<DateTime<Utc>>,

    /// Whether the episode has been listened to the end
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,

    /// When the episode was completed
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl EpisodeProgress {
    /// Clamp a raw percentage into `[0, 100]`; NaN becomes zero
    pub fn clamp_percent(percent: f64) -> f64 {
        if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        }
    }

    /// Record a progress sample taken at `now`
    ///
    /// Last write wins: a lower percentage after completion reopens the episode.
    pub fn apply(&mut self, position_secs: f64, percent_complete: f64, now: DateTime<Utc>) {
        self.position_secs = if position_secs.is_finite() {
            position_secs.max(0.0)
        } else {
            0.0
        };
        self.percent_complete = Self::clamp_percent(percent_complete);
        self.last_listened = Some(now);

        if self.percent_complete >= 100.0 {
            self.completed = true;
            self.completed_at = Some(now);
        } else {
            self.completed = false;
            self.completed_at = None;
        }
    }

    /// Re-derive `completed` from `percent_complete`
    ///
    /// Catalog documents may carry a `completed` flag that disagrees with the
    /// percentage; the percentage is authoritative.
    pub fn normalize(&mut self) {
        self.percent_complete = Self::clamp_percent(self.percent_complete);
        self.completed = self.percent_complete >= 100.0;
        if !self.completed {
            self.completed_at = None;
        }
    }

    /// Whether the episode is started but not finished
    pub fn is_in_progress(&self) -> bool {
        self.percent_complete > 0.0 && self.percent_complete < 100.0
    }
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(EpisodeProgress::clamp_percent(
        raw.and_then(|v| v.as_f64()).unwrap_or(0.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn record_play_increments_every_call() {
        let mut stats = PlayStats::default();
        stats.record_play(now());
        stats.record_play(now());
        assert_eq!(stats.play_count, 2);
        assert_eq!(stats.last_played, Some(now()));
    }

    #[test]
    fn apply_exactly_100_completes() {
        let mut progress = EpisodeProgress::default();
        progress.apply(600.0, 100.0, now());
        assert!(progress.completed);
        assert_eq!(progress.completed_at, Some(now()));
    }

    #[test]
    fn apply_above_100_is_clamped() {
        let mut progress = EpisodeProgress::default();
        progress.apply(700.0, 140.0, now());
        assert_eq!(progress.percent_complete, 100.0);
        assert!(progress.completed);
    }

    #[test]
    fn regression_reopens_episode() {
        let mut progress = EpisodeProgress::default();
        progress.apply(600.0, 100.0, now());
        progress.apply(30.0, 5.0, now());
        assert!(!progress.completed);
        assert!(progress.completed_at.is_none());
        assert_eq!(progress.position_secs, 30.0);
    }

    #[test]
    fn negative_and_nan_inputs_fail_closed() {
        let mut progress = EpisodeProgress::default();
        progress.apply(-12.0, f64::NAN, now());
        assert_eq!(progress.position_secs, 0.0);
        assert_eq!(progress.percent_complete, 0.0);
        assert!(!progress.completed);
    }

    #[test]
    fn deserializes_original_field_names() {
        let json = r#"{"progress": 120.5, "percentComplete": 20, "completed": true}"#;
        let mut progress: EpisodeProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.position_secs, 120.5);
        progress.normalize();
        assert!(!progress.completed);
    }

    #[test]
    fn nulls_default_to_zero() {
        let json = r#"{"playCount": null, "lastPlayed": "not a date"}"#;
        let stats: PlayStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.play_count, 0);
        assert!(stats.last_played.is_none());
    }
}
