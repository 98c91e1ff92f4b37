//! Output volume with mute
//!
//! Level is a linear `0.0..=1.0` factor handed straight to the output, the
//! same scale the player UI uses.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
            muted: false,
        }
    }

    /// Set volume level, clamped to `[0, 1]`; NaN becomes 0
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp(level);
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level to apply to the output: 0 when muted
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
