//! StorageArea trait: the abstract interface over the tab-scoped
//! persistence area.
//!
//! This trait allows the session manager to be host-agnostic. A browser
//! embedding binds it to the tab's storage region; tests and native hosts
//! use [`crate::MemoryStorage`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// The StorageArea trait: async string key/value persistence.
///
/// All methods are async so a host bridge that crosses a process or JS
/// boundary can suspend; the in-memory implementation resolves immediately.
///
/// # Design Notes
///
/// - **Last write wins**: `write` replaces any previous value for the key.
/// - **Absent is not an error**: `read` of a missing key returns `Ok(None)`,
///   and `remove` of a missing key succeeds.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read the value stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// A shared handle to an area is itself an area. This is how a process
/// rebuilding its state (a reload) reattaches to the same storage.
#[async_trait]
impl<S: StorageArea + ?Sized> StorageArea for Arc<S> {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
