//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait that abstracts over durable
//! local storage. Session and settings state are persisted one key at a time;
//! no transaction or lock spans multiple keys.

use crate::domain::error::Result;
use async_trait::async_trait;

/// Durable string key-value storage.
///
/// Implementations must tolerate concurrent calls from independent tasks. Each
/// call is atomic for its own key only.
///
/// # Implementations
///
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map
/// - [`JsonFileStore`](crate::storage::JsonFileStore): single JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use marketdir::storage::{JsonFileStore, KeyValueStore};
///
/// # async fn demo() -> marketdir::Result<()> {
/// let store = JsonFileStore::open("/tmp/marketdir.json").await?;
/// store.set("theme", "\"dark\"").await?;
/// assert_eq!(store.get("theme").await?.as_deref(), Some("\"dark\""));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn remove(&self, key: &str) -> Result<()>;
}
