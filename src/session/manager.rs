//! Authentication session lifecycle.
//!
//! [`SessionManager`] owns the signed-in identity and its bearer token. It is
//! hydrated once from storage at startup, mutated only by [`SessionManager::login`]
//! and [`SessionManager::logout`], and shared with consumers by handle.
//!
//! Storage access for the session keys is serialized. A logout that arrives
//! while a login is still writing waits for those writes and then removes them.

use crate::domain::error::{MarketdirError, Result};
use crate::domain::UserProfile;
use crate::session::provider::{AuthorizeRequest, ClearSessionRequest, IdentityProvider};
use crate::session::token::decode_id_token;
use crate::storage::{KeyValueStore, StorageKey};
use crate::AuthConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

/// An authenticated identity together with its bearer token.
///
/// The pair is always set and cleared as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: UserProfile,
}

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    session: Option<Session>,
    /// True only while the initial restore from storage is in progress.
    pub loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

/// Mediates between the application and the external identity provider.
pub struct SessionManager {
    state: Mutex<SessionState>,
    writes: AsyncMutex<()>,
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn IdentityProvider>,
    auth: AuthConfig,
}

impl SessionManager {
    /// Creates a manager in the loading, signed-out state.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn IdentityProvider>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            writes: AsyncMutex::new(()),
            store,
            provider,
            auth,
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token().map(str::to_string)
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.lock().user().cloned()
    }

    /// Hydrates the session from storage.
    ///
    /// Signs in only when both the token and the identity are present and
    /// readable; anything else leaves the session signed out. The loading flag
    /// is cleared either way. Runs once at startup and never retries.
    pub async fn restore_session(&self) -> SessionState {
        let _writes = self.writes.lock().await;
        let restored = self.read_persisted().await;

        tracing::debug!(restored = restored.is_some(), "session restore finished");

        let mut state = self.lock();
        state.session = restored;
        state.loading = false;
        state.clone()
    }

    /// Signs in through the identity provider using `connection`.
    ///
    /// On success the decoded identity and the access token are written to
    /// durable storage, then published in memory. A storage failure at this
    /// point is logged and does not undo the login.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::LoginFailed`] if the provider flow fails or
    /// its identity token cannot be decoded. The previous state is untouched.
    pub async fn login(&self, connection: &str) -> Result<UserProfile> {
        tracing::debug!(connection = %connection, "starting login");

        let request = AuthorizeRequest {
            scope: self.auth.scope.clone(),
            connection: connection.to_string(),
            redirect_uri: self.auth.redirect_uri.clone(),
        };

        let credentials = self.provider.authorize(&request).await.map_err(|e| {
            tracing::warn!(connection = %connection, error = %e, "authorization failed");
            MarketdirError::LoginFailed(e.to_string())
        })?;

        let user = decode_id_token(&credentials.id_token).map_err(|e| {
            tracing::warn!(connection = %connection, error = %e, "identity token rejected");
            MarketdirError::LoginFailed(e.to_string())
        })?;

        let session = Session {
            access_token: credentials.access_token,
            user,
        };

        {
            let _writes = self.writes.lock().await;
            self.persist(&session).await;
            self.lock().session = Some(session.clone());
        }

        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session.user)
    }

    /// Signs out.
    ///
    /// The provider's session-clearing flow is attempted first; the local
    /// session and its persisted keys are cleared afterwards whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::LogoutFailed`] if the provider call failed.
    /// Local state is already cleared when this is returned.
    pub async fn logout(&self) -> Result<()> {
        let request = ClearSessionRequest {
            federated: self.auth.federated_logout,
            return_to: self.auth.return_to.clone(),
        };
        let remote = self.provider.clear_session(&request).await;

        {
            let _writes = self.writes.lock().await;
            self.lock().session = None;

            for key in [StorageKey::AccessToken, StorageKey::User] {
                if let Err(e) = self.store.remove(key.as_str()).await {
                    tracing::warn!(key = %key, error = %e, "failed to remove persisted session key");
                }
            }
        }

        remote.map_err(|e| {
            tracing::warn!(error = %e, "provider session clear failed, local session cleared");
            MarketdirError::LogoutFailed(e.to_string())
        })?;

        tracing::info!("signed out");
        Ok(())
    }

    async fn read_persisted(&self) -> Option<Session> {
        let access_token = self.read_key(StorageKey::AccessToken).await?;
        let user_json = self.read_key(StorageKey::User).await?;

        match serde_json::from_str::<UserProfile>(&user_json) {
            Ok(user) => Some(Session { access_token, user }),
            Err(e) => {
                let error = MarketdirError::PersistenceRead {
                    key: StorageKey::User.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %error, "discarding unreadable persisted identity");
                None
            }
        }
    }

    async fn read_key(&self, key: StorageKey) -> Option<String> {
        match self.store.get(key.as_str()).await {
            Ok(value) => value,
            Err(e) => {
                let error = MarketdirError::PersistenceRead {
                    key: key.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %error, "session key unreadable");
                None
            }
        }
    }

    async fn persist(&self, session: &Session) {
        if let Err(e) = self
            .store
            .set(StorageKey::AccessToken.as_str(), &session.access_token)
            .await
        {
            tracing::warn!(key = %StorageKey::AccessToken, error = %e, "failed to persist access token");
        }

        match serde_json::to_string(&session.user) {
            Ok(json) => {
                if let Err(e) = self.store.set(StorageKey::User.as_str(), &json).await {
                    tracing::warn!(key = %StorageKey::User, error = %e, "failed to persist identity");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode identity"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
