//! Key-value persistence for the session record.
//!
//! The store only ever needs get/set of a string blob under a named slot,
//! the same contract a browser's local storage gives. Backends are swapped
//! in at construction, so tests run on `MemoryStorage`.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a slot. Absence is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
