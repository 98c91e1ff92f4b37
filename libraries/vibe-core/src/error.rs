/// Core error types for VibeStream
use thiserror::Error;

/// Result type alias using `VibeError`
pub type Result<T> = std::result::Result<T, VibeError>;

/// Core error type for VibeStream
#[derive(Error, Debug)]
pub enum VibeError {
    /// Catalog or persisted-state source unreachable or malformed
    #[error("Load error: {0}")]
    Load(String),

    /// Audio resource could not be opened or failed mid-stream
    #[error("Playback error: {0}")]
    Playback(String),

    /// Invalid user-supplied input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be built or deserialized
    #[error("Config error: {0}")]
    Config(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl VibeError {
    /// Create a load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<config::ConfigError> for VibeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
