//! Durable local storage.
//!
//! The browser storefront kept its token and cart in `localStorage`. This
//! module provides the same contract: a small string key/value store that is
//! read once at startup and rewritten synchronously on every change.
//!
//! - [`FileStore`] keeps one file per key under the data directory
//! - [`MemoryStore`] keeps values in process memory for tests

mod fs;
mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage keys used by the client.
pub mod keys {
    /// Key holding the opaque bearer token as a plain string.
    pub const TOKEN: &str = "token";

    /// Key holding the cart as a JSON array snapshot.
    pub const CART: &str = "cart";
}

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized for storage.
    #[error("could not serialize {key}: {source}")]
    Serialize {
        /// Key being written.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A simulated failure injected by a test store.
    #[error("write rejected for {0}")]
    Rejected(String),
}

/// A synchronous string key/value store.
///
/// Implementations take `&self` for every operation; the client mutates
/// storage from a single task, so interior mutability is enough.
pub trait DurableStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
