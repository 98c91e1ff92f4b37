/// Runtime configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, VibeError};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "VIBE_CONFIG_PATH";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VibeConfig {
    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Playback engine tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Volume applied to a fresh engine (0.0-1.0)
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Seconds between podcast progress checkpoints while playing
    #[serde(default = "default_checkpoint_interval_secs")]
    pub checkpoint_interval_secs: u64,

    /// `previous` restarts the current item when further in than this
    #[serde(default = "default_restart_threshold_secs")]
    pub restart_threshold_secs: f64,

    /// Default skip distance for podcast skip forward/backward
    #[serde(default = "default_skip_secs")]
    pub skip_secs: f64,

    /// Podcast playback rate for a fresh engine
    #[serde(default = "default_speed")]
    pub default_speed: f32,

    /// Rates visited by `cycle_speed`, in order
    #[serde(default = "default_speed_presets")]
    pub speed_presets: Vec<f32>,
}

/// Persisted play-state settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Prefix of the per-user state key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// User slot for sessions without a signed-in user
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Directory used by the file-backed state store
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

/// Catalog document settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Path of the catalog document
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl VibeConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `$VIBE_CONFIG_PATH` or `./vibestream.toml` when present, then
    /// overlays `VIBE__SECTION__FIELD` environment variables.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("vibestream.toml"));

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("VIBE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !(0.0..=1.0).contains(&playback.initial_volume) {
            return Err(VibeError::Config(format!(
                "playback.initial_volume must be within 0.0-1.0, got {}",
                playback.initial_volume
            )));
        }

        if playback.checkpoint_interval_secs == 0 {
            return Err(VibeError::Config(
                "playback.checkpoint_interval_secs must be >= 1".to_string(),
            ));
        }

        if !(playback.default_speed.is_finite() && playback.default_speed > 0.0) {
            return Err(VibeError::Config(
                "playback.default_speed must be a positive number".to_string(),
            ));
        }

        if playback
            .speed_presets
            .iter()
            .any(|s| !(s.is_finite() && *s > 0.0))
        {
            return Err(VibeError::Config(
                "playback.speed_presets must all be positive".to_string(),
            ));
        }

        if self.storage.default_user.is_empty() {
            return Err(VibeError::Config(
                "storage.default_user must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: default_initial_volume(),
            checkpoint_interval_secs: default_checkpoint_interval_secs(),
            restart_threshold_secs: default_restart_threshold_secs(),
            skip_secs: default_skip_secs(),
            default_speed: default_speed(),
            speed_presets: default_speed_presets(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            default_user: default_user(),
            state_dir: default_state_dir(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

// Default values
fn default_initial_volume() -> f32 {
    0.8
}

fn default_checkpoint_interval_secs() -> u64 {
    5
}

fn default_restart_threshold_secs() -> f64 {
    3.0
}

fn default_skip_secs() -> f64 {
    30.0
}

fn default_speed() -> f32 {
    1.0
}

fn default_speed_presets() -> Vec<f32> {
    vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]
}

fn default_key_prefix() -> String {
    "vibestream_library_state".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./data/state")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("library.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_behavior() {
        let config = VibeConfig::default();
        assert_eq!(config.playback.checkpoint_interval_secs, 5);
        assert_eq!(config.playback.restart_threshold_secs, 3.0);
        assert_eq!(config.playback.skip_secs, 30.0);
        assert_eq!(config.storage.default_user, "default");
        assert!((config.playback.initial_volume - 0.8).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let raw = r#"
            [playback]
            skip_secs = 15.0
        "#;
        let config: VibeConfig = ::config::Config::builder()
            .add_source(::config::File::from_str(raw, ::config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.playback.skip_secs, 15.0);
        assert_eq!(config.playback.checkpoint_interval_secs, 5);
        assert_eq!(config.catalog.path, PathBuf::from("library.json"));
    }

    #[test]
    fn rejects_zero_checkpoint_interval() {
        let mut config = VibeConfig::default();
        config.playback.checkpoint_interval_secs = 0;
        assert!(matches!(config.validate(), Err(VibeError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let mut config = VibeConfig::default();
        config.playback.initial_volume = 1.5;
        assert!(config.validate().is_err());
    }
}
