//! Storage backend abstraction for the InvestPro platform core.
//!
//! This crate defines the [`StorageBackend`] trait — a string-keyed
//! key-value interface that knows nothing about investors, plans, or
//! payments. The registry and session layers in `investpro-core` sit on
//! top of a backend and JSON-encode everything they persist.
//!
//! Two implementations are provided:
//!
//! - [`MemoryBackend`] — in-memory, empty on first run, gone at process
//!   exit; the default for tests and demos
//! - [`RedbBackend`] — persistent pure-Rust store that survives restarts,
//!   the way the browser profile used to (feature `redb-backend`)

mod error;
mod memory;
#[cfg(feature = "redb-backend")]
mod redb_backend;

pub use error::StorageError;
pub use memory::MemoryBackend;
#[cfg(feature = "redb-backend")]
pub use redb_backend::RedbBackend;

/// A pluggable key-value storage backend.
///
/// Keys are UTF-8 strings using `/` as a separator (e.g.
/// `investors/INV001`, `session/code`). Values are opaque byte arrays —
/// the layers above encode them as JSON.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a key-value pair, overwriting any existing value.
    ///
    /// Uniqueness rules (an investor code may be registered once) live in
    /// the registry layer, not here.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Idempotent — deleting a non-existent key is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys that start with the given prefix.
    ///
    /// Returns keys only, not values. Used for directory-style listing of
    /// issued codes and investor records.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Check whether a key exists in storage.
    ///
    /// The default implementation calls [`get`](StorageBackend::get) and
    /// checks for `Some`. Backends may override this with a more efficient
    /// check.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}
