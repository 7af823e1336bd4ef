//! Application context wiring the state owners to their collaborators.

use crate::domain::error::{MarketdirError, Result};
use crate::domain::Notification;
use crate::infrastructure::paths;
use crate::remote::{HttpSource, NotificationSource};
use crate::session::{IdentityProvider, SessionManager};
use crate::settings::SettingsStore;
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::ui::PaletteSet;
use crate::worker::{PersistHandle, PersistWorker};
use crate::Config;
use std::sync::Arc;

/// Path of the notification feed under `api_base_url`.
pub const NOTIFICATIONS_PATH: &str = "notifications";

/// External services the application state depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn KeyValueStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub notifications: Arc<dyn NotificationSource>,
}

impl Collaborators {
    /// Builds the default collaborators for `config`.
    ///
    /// Storage is a [`JsonFileStore`] in the data directory and the feed is
    /// fetched over HTTP from `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::Config`] if `api_base_url` is unset, or a
    /// storage error if the store file cannot be opened.
    pub async fn open(config: &Config, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
        let base_url = config
            .api_base_url
            .as_deref()
            .ok_or_else(|| MarketdirError::Config("api_base_url is not set".to_string()))?;

        let storage = JsonFileStore::open(config.data_dir.join(paths::STORE_FILE)).await?;
        let notifications: HttpSource<Notification> = HttpSource::new(base_url, NOTIFICATIONS_PATH);

        Ok(Self {
            storage: Arc::new(storage),
            identity,
            notifications: Arc::new(notifications),
        })
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Handles to the running application state.
///
/// Owns nothing global: every consumer receives the handles it needs from here.
#[derive(Debug, Clone)]
pub struct AppContext {
    session: Arc<SessionManager>,
    settings: Arc<SettingsStore>,
    persist: PersistHandle,
}

impl AppContext {
    /// Starts the persistence worker and hydrates both state owners.
    ///
    /// Session restore and settings initialization run concurrently. Must be
    /// called inside a tokio runtime.
    pub async fn start(config: &Config, collaborators: Collaborators) -> Self {
        let Collaborators {
            storage,
            identity,
            notifications,
        } = collaborators;

        let (worker, persist) = PersistWorker::new(storage.clone());
        tokio::spawn(worker.run());

        let session = Arc::new(SessionManager::new(
            storage.clone(),
            identity,
            config.auth.clone(),
        ));
        let settings = Arc::new(
            SettingsStore::new(storage, persist.clone(), notifications)
                .with_palettes(load_palettes(config))
                .with_default_region(config.default_region.clone()),
        );

        let (session_state, settings_state) =
            tokio::join!(session.restore_session(), settings.initialize());

        tracing::info!(
            authenticated = session_state.is_authenticated(),
            theme = %settings_state.theme,
            online = settings_state.online_mode,
            "application state ready"
        );

        Self {
            session,
            settings,
            persist,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    #[must_use]
    pub const fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Waits for every queued settings write to reach storage.
    pub async fn shutdown(self) {
        self.persist.flush().await;
        tracing::debug!("application state flushed");
    }
}

fn load_palettes(config: &Config) -> PaletteSet {
    let Some(file) = &config.palette_file else {
        return PaletteSet::default();
    };

    let path = paths::resolve_in(&config.data_dir, file);
    PaletteSet::from_file(&path).unwrap_or_else(|e| {
        tracing::warn!(palette_file = %path.display(), error = %e, "using built-in palettes");
        PaletteSet::default()
    })
}
