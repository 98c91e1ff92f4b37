//! Error types for playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No item is currently loaded
    #[error("No item loaded")]
    NoItemLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Audio resource could not be opened
    #[error("Failed to open {locator}: {reason}")]
    Open {
        /// Resource locator
        locator: String,
        /// Reason reported by the output
        reason: String,
    },

    /// Audio resource failed after opening
    #[error("Stream error: {0}")]
    Stream(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl PlaybackError {
    /// Create an invalid operation error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}

impl From<PlaybackError> for vibe_core::VibeError {
    fn from(err: PlaybackError) -> Self {
        vibe_core::VibeError::playback(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
