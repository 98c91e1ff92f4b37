/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend could not read or write a key
    #[error("Backend error: {0}")]
    Backend(String),

    /// Persisted blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<StorageError> for vibe_core::VibeError {
    fn from(err: StorageError) -> Self {
        vibe_core::VibeError::load(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_surface_as_load_errors() {
        let err: vibe_core::VibeError = StorageError::backend("disk full").into();
        assert!(matches!(err, vibe_core::VibeError::Load(msg) if msg.contains("disk full")));
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            StorageError::from(json_err),
            StorageError::Serialization(_)
        ));
    }
}
