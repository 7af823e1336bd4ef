//! Persistence worker implementation.
//!
//! State owners never await storage writes. They publish a [`PersistMessage`]
//! through a [`PersistHandle`] and carry on; the [`PersistWorker`] drains the
//! queue on its own task and applies each write in order. A failed write is
//! logged and dropped, never retried.

use crate::domain::error::MarketdirError;
use crate::storage::{KeyValueStore, StorageKey};
use crate::worker::{PersistMessage, PersistResponse};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Cheap, clonable sender side of the persistence queue.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistMessage>,
}

impl PersistHandle {
    /// Queues a raw string write of `key`.
    pub fn publish(&self, key: StorageKey, value: impl Into<String>) {
        self.send(PersistMessage::set(key, value));
    }

    /// Serializes `value` as JSON and queues a write of `key`.
    ///
    /// Serialization failures are logged and the write is dropped.
    pub fn publish_json<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.publish(key, json),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to encode value, write dropped");
            }
        }
    }

    /// Waits until every write queued before this call has been applied.
    ///
    /// Returns immediately if the worker has stopped.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(PersistMessage::Flush { done }).is_err() {
            tracing::debug!("persistence worker stopped, nothing to flush");
            return;
        }
        let _ = wait.await;
    }

    fn send(&self, message: PersistMessage) {
        if let Err(e) = self.tx.send(message) {
            tracing::warn!(dropped = ?e.0, "persistence worker stopped, write dropped");
        }
    }
}

/// Applies queued writes to a [`KeyValueStore`].
pub struct PersistWorker {
    store: Arc<dyn KeyValueStore>,
    rx: mpsc::UnboundedReceiver<PersistMessage>,
}

impl PersistWorker {
    /// Creates a worker over `store` and the handle that feeds it.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> (Self, PersistHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { store, rx }, PersistHandle { tx })
    }

    /// Applies a single message and reports the outcome.
    pub async fn handle_message(&self, message: PersistMessage) -> PersistResponse {
        match message {
            PersistMessage::Set { key, value } => {
                match self.store.set(key.as_str(), &value).await {
                    Ok(()) => {
                        tracing::trace!(key = %key, "value persisted");
                        PersistResponse::Written { key }
                    }
                    Err(e) => Self::failed(key, &e),
                }
            }
            PersistMessage::Flush { done } => {
                let _ = done.send(());
                PersistResponse::Flushed
            }
        }
    }

    /// Applies every message already queued without waiting for new ones.
    ///
    /// Returns the outcomes in queue order.
    pub async fn drain(&mut self) -> Vec<PersistResponse> {
        let mut responses = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            responses.push(self.handle_message(message).await);
        }
        responses
    }

    /// Runs until every [`PersistHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("persistence worker started");
        while let Some(message) = self.rx.recv().await {
            self.handle_message(message).await;
        }
        tracing::debug!("persistence worker stopped");
    }

    fn failed(key: StorageKey, error: &MarketdirError) -> PersistResponse {
        let error = MarketdirError::PersistenceWrite {
            key: key.to_string(),
            message: error.to_string(),
        };
        tracing::warn!(key = %key, error = %error, "write dropped");
        PersistResponse::Failed {
            key,
            message: error.to_string(),
        }
    }
}

impl std::fmt::Debug for PersistWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistWorker").finish_non_exhaustive()
    }
}
