//! Origin-scoped key-value persistence used by the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store only needs `get`/`set`/`remove` on string slots. Putting
//! that behind [`KeyValueStore`] keeps `web-sys` glue out of the store and lets
//! SSR builds and tests run against [`MemoryStorage`].

#[cfg(feature = "hydrate")]
mod browser;
mod memory;

#[cfg(feature = "hydrate")]
pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

/// Error returned by [`KeyValueStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage medium is reachable (no `window`, storage disabled).
    #[error("storage unavailable")]
    Unavailable,
    /// The medium refused a write because it is full.
    #[error("storage quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },
    /// Any other failure reported by the backing medium.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key-value slots that survive a page reload.
pub trait KeyValueStore {
    /// Read the slot for `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the write is refused.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot for `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
