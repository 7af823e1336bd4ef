//! Persistence worker message types.
//!
//! This module defines the request and response protocol between state
//! owners (the settings store) and the [`PersistWorker`](super::PersistWorker)
//! that applies their writes to durable storage.

use crate::storage::StorageKey;
use tokio::sync::oneshot;

/// Requests sent to the persistence worker.
///
/// Messages are applied strictly in the order they were queued, so two writes
/// to the same key complete in call order and the last one wins.
#[derive(Debug)]
pub enum PersistMessage {
    /// Store `value` under `key`.
    Set {
        /// Key to write.
        key: StorageKey,
        /// Already-encoded value.
        value: String,
    },

    /// Acknowledge once every message queued before this one has been applied.
    Flush {
        /// Signalled after the preceding writes have settled.
        done: oneshot::Sender<()>,
    },
}

impl PersistMessage {
    /// Create a `Set` message.
    pub fn set(key: StorageKey, value: impl Into<String>) -> Self {
        Self::Set {
            key,
            value: value.into(),
        }
    }
}

/// Outcome of applying a single [`PersistMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistResponse {
    /// The value was written.
    Written {
        /// Key that was written.
        key: StorageKey,
    },

    /// The write failed and was dropped.
    Failed {
        /// Key whose write failed.
        key: StorageKey,
        /// Human-readable error message.
        message: String,
    },

    /// A flush barrier was reached.
    Flushed,
}
