//! Storage abstraction for persistence.
//!
//! Backends store the codec's JSON text under a string key; they never look
//! inside it.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStorage, DEFAULT_FILE_NAME};

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
///
/// On native platforms implementations must be `Send + Sync`.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a document, replacing any previous one under `id`.
    fn save(&self, id: &str, json: &str) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, id: &str) -> StorageResult<String>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all document IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// Trait for document storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, id: &str, json: &str) -> StorageResult<()>;
    fn load(&self, id: &str) -> StorageResult<String>;
    fn delete(&self, id: &str) -> StorageResult<()>;
    fn list(&self) -> StorageResult<Vec<String>>;
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
