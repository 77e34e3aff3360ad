//! In-memory storage backend for testing.

use crate::error::{Error, Result};
use crate::storage::traits::SlotStorage;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory slot storage for testing.
///
/// An optional quota caps the total bytes held across all keys, which lets
/// tests exercise rejected writes.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Create a new in-memory backend without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes once `quota` bytes would be held.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotStorage for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().unwrap();
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().unwrap();

        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(Error::QuotaExceeded { needed, quota });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.write().unwrap();
        slots.remove(key);
        Ok(())
    }
}
