//! Token storage media.
//!
//! The token store only needs a flat string key/value surface; anything
//! offering [`TokenStorage`] can back it. Two implementations ship with
//! the crate: an in-memory one for tests and ephemeral sessions, and a
//! JSON-file one that survives process restarts.

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileTokenStorage;
pub use memory::MemoryTokenStorage;

/// Error that can occur in a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no usable storage location: {0}")]
    NoLocation(String),
}

/// Flat key/value persistence for bearer credentials.
///
/// Absent keys are `Ok(None)`, never an error. Implementations are used
/// concurrently from in-flight requests without external locking; last
/// writer wins.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
