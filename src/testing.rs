//! Test doubles shared by the unit tests.

use crate::domain::error::{MarketdirError, Result};
use crate::domain::Notification;
use crate::remote::NotificationSource;
use crate::session::{AuthorizeRequest, ClearSessionRequest, Credentials, IdentityProvider};
use crate::storage::{KeyValueStore, MemoryStore};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Builds an unsigned compact JWT carrying `claims`.
pub(crate) fn id_token(claims: &str) -> String {
    format!("eyJhbGciOiJub25lIn0.{}.", URL_SAFE_NO_PAD.encode(claims))
}

/// [`MemoryStore`] wrapper that fails reads or writes of chosen keys.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

impl FlakyStore {
    pub(crate) fn failing_writes_for(keys: &[&str]) -> Self {
        Self {
            failing_writes: keys.iter().map(|k| (*k).to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_reads_for(keys: &[&str]) -> Self {
        Self {
            failing_reads: keys.iter().map(|k| (*k).to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn seeded<'a>(self, entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            inner: MemoryStore::with_entries(entries),
            ..self
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.failing_reads.contains(key) {
            return Err(MarketdirError::Storage(format!("read of {key} refused")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(MarketdirError::Storage(format!("write of {key} refused")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(MarketdirError::Storage(format!("removal of {key} refused")));
        }
        self.inner.remove(key).await
    }
}

#[derive(Debug)]
struct Hold {
    key: String,
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// [`MemoryStore`] wrapper that can suspend one write until released.
#[derive(Debug, Default)]
pub(crate) struct GatedStore {
    inner: MemoryStore,
    hold: Mutex<Option<Hold>>,
}

impl GatedStore {
    /// Suspends the next write of `key` before it reaches storage.
    ///
    /// The first receiver fires once that write has started; the write lands
    /// after the returned sender fires.
    pub(crate) fn hold(&self, key: &str) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(Hold {
            key: key.to_string(),
            entered: entered_tx,
            release: release_rx,
        });
        (entered_rx, release_tx)
    }
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let hold = {
            let mut hold = self.hold.lock().unwrap();
            if hold.as_ref().is_some_and(|h| h.key == key) {
                hold.take()
            } else {
                None
            }
        };
        if let Some(hold) = hold {
            let _ = hold.entered.send(());
            let _ = hold.release.await;
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }
}

/// Identity provider with a fixed outcome that records its calls.
#[derive(Debug, Default)]
pub(crate) struct MockIdentityProvider {
    credentials: Option<Credentials>,
    fail_clear: bool,
    authorize_calls: Mutex<Vec<AuthorizeRequest>>,
    clear_calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub(crate) fn succeeding(access_token: &str, id_token: &str) -> Self {
        Self {
            credentials: Some(Credentials {
                access_token: access_token.to_string(),
                id_token: id_token.to_string(),
            }),
            ..Self::default()
        }
    }

    /// Fails both authorization and session clearing.
    pub(crate) fn failing() -> Self {
        Self {
            fail_clear: true,
            ..Self::default()
        }
    }

    pub(crate) fn last_authorize(&self) -> Option<AuthorizeRequest> {
        self.authorize_calls.lock().unwrap().last().cloned()
    }

    pub(crate) fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn authorize(&self, request: &AuthorizeRequest) -> Result<Credentials> {
        self.authorize_calls.lock().unwrap().push(request.clone());
        self.credentials
            .clone()
            .ok_or_else(|| MarketdirError::LoginFailed("user cancelled".to_string()))
    }

    async fn clear_session(&self, _request: &ClearSessionRequest) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_clear {
            return Err(MarketdirError::LogoutFailed("provider unreachable".to_string()));
        }
        Ok(())
    }
}

enum Reply {
    Ready(Result<Vec<Notification>>),
    Pending(oneshot::Receiver<Vec<Notification>>),
}

/// Notification source answering from a queue of scripted replies.
///
/// Once the script runs out every fetch returns an empty feed.
#[derive(Default)]
pub(crate) struct ScriptedNotifications {
    script: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedNotifications {
    pub(crate) fn push_ok(&self, feed: Vec<Notification>) {
        self.script.lock().unwrap().push_back(Reply::Ready(Ok(feed)));
    }

    pub(crate) fn push_err(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(MarketdirError::FetchFailed(message.to_string()))));
    }

    /// Queues a reply that resolves only when the returned sender fires.
    pub(crate) fn push_pending(&self) -> oneshot::Sender<Vec<Notification>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Reply::Pending(rx));
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSource for ScriptedNotifications {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Pending(rx)) => rx
                .await
                .map_err(|_| MarketdirError::FetchFailed("reply dropped".to_string())),
            None => Ok(Vec::new()),
        }
    }
}
