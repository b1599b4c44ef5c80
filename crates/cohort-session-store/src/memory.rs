//! In-memory implementation of the StorageArea trait.
//!
//! This is the reference backing store for tests and native embedding hosts.
//! It has the same semantics a browser tab-scoped area exposes, but keeps
//! everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::StorageArea;

/// In-memory storage area.
///
/// All data is lost when the area is dropped. Thread-safe via RwLock.
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty storage area.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the area holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct synchronous read, for assertions in tests.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Direct synchronous write, for seeding tamper scenarios in tests.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageArea for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_write_roundtrip() {
        let storage = MemoryStorage::new();

        storage.write("userSession", "{\"email\":\"a@b.org\"}").await.unwrap();
        let value = storage.read("userSession").await.unwrap();

        assert_eq!(value.as_deref(), Some("{\"email\":\"a@b.org\"}"));
    }

    #[tokio::test]
    async fn absent_key_reads_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_replaces_previous_value() {
        let storage = MemoryStorage::new();

        storage.write("k", "first").await.unwrap();
        storage.write("k", "second").await.unwrap();

        assert_eq!(storage.read("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let storage = MemoryStorage::new();

        storage.write("k", "v").await.unwrap();
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();

        assert!(storage.is_empty());
    }
}
