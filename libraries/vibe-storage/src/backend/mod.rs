//! Key/value blob stores for persisted play state
//!
//! The progress store writes one JSON blob per user key. Backends only move
//! strings around; encoding and merging live in [`crate::progress`].

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;

/// String blob store keyed by name
pub trait StateBackend: Send {
    /// Read the blob stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob under `key`
    ///
    /// Returns `Ok(true)` if a blob was removed, `Ok(false)` if none existed
    fn remove(&self, key: &str) -> Result<bool>;
}
