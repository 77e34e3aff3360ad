//! Storage trait definitions.

use crate::error::Result;

/// Persistent key-value slots, the local equivalent of a browser's
/// origin-scoped storage.
///
/// Values are whole documents: a write replaces everything stored under the key.
pub trait SlotStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage is unavailable or rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn remove_item(&self, key: &str) -> Result<()>;
}
