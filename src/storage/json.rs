//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: a handful of small keys written on user interaction

use crate::domain::error::{MarketdirError, Result};
use crate::storage::backend::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// JSON storage container format.
///
/// This is the top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Stored values keyed by storage key.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The entire dataset is kept in memory and the whole file is rewritten on
/// every modification. The async mutex is held for the duration of a write so
/// concurrent writers never race on the temporary file.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "accessToken": "eyJhbGciOi...",
///     "theme": "\"dark\"",
///     "isOnline": "true"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on open.
    data: Mutex<StorageData>,
}

impl JsonFileStore {
    /// Creates or opens a JSON storage file.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the file
    /// is created on the first write. Parent directories are created
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub async fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON storage");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tracing::debug!(parent = ?parent, "creating parent directory");
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = if tokio::fs::try_exists(&file_path).await? {
            tracing::debug!("loading existing data");
            Self::load_from_file(&file_path).await?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "storage opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads storage data from a JSON file.
    async fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = tokio::fs::read_to_string(path).await?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| MarketdirError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "unexpected storage format version");
        }

        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path
    /// so the file is never left half-written.
    async fn save_to_file(&self, data: &StorageData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| MarketdirError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.file_path).await?;

        tracing::trace!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.entries.get(key).cloned())
    }

    #[tracing::instrument(level = "debug", name = "json_set", skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        let previous = data.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save_to_file(&data).await {
            match previous {
                Some(previous) => data.entries.insert(key.to_string(), previous),
                None => data.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", name = "json_remove", skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        let Some(previous) = data.entries.remove(key) else {
            tracing::trace!("key absent, skipping save");
            return Ok(());
        };
        if let Err(e) = self.save_to_file(&data).await {
            data.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
