//! In-process `HashMap` storage backend.

use super::{KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;

/// Ephemeral key-value store, optionally capped at a byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once keys plus values would
    /// exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently held across keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());
            let required_bytes = self.used_bytes() - replaced + key.len() + value.len();
            if required_bytes > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
