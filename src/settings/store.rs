//! Settings and notification store.
//!
//! Every mutation updates the in-memory state and queues a write of the one
//! field it touched. Writes go through the persistence queue, so callers never
//! wait on storage and writes to the same key land in call order.
//!
//! The notification feed is refreshed from the remote source only while the
//! app is online and notification delivery is enabled. Overlapping refreshes
//! are neither de-duplicated nor cancelled; whichever resolves last determines
//! the cached feed.

use crate::domain::error::MarketdirError;
use crate::domain::Notification;
use crate::remote::NotificationSource;
use crate::settings::state::SettingsState;
use crate::storage::{KeyValueStore, StorageKey};
use crate::ui::{Palette, PaletteSet, ThemeMode};
use crate::worker::PersistHandle;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy)]
enum Flag {
    Online,
    Notifications,
}

impl Flag {
    const fn key(self) -> StorageKey {
        match self {
            Self::Online => StorageKey::IsOnline,
            Self::Notifications => StorageKey::NotificationsEnabled,
        }
    }
}

/// Owner of [`SettingsState`].
pub struct SettingsStore {
    state: Mutex<SettingsState>,
    store: Arc<dyn KeyValueStore>,
    persist: PersistHandle,
    source: Arc<dyn NotificationSource>,
    palettes: PaletteSet,
}

impl SettingsStore {
    /// Creates a store in the loading state with default values.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        persist: PersistHandle,
        source: Arc<dyn NotificationSource>,
    ) -> Self {
        Self {
            state: Mutex::new(SettingsState::default()),
            store,
            persist,
            source,
            palettes: PaletteSet::default(),
        }
    }

    /// Replaces the built-in light/dark palettes.
    #[must_use]
    pub fn with_palettes(mut self, palettes: PaletteSet) -> Self {
        self.palettes = palettes;
        self
    }

    /// Sets the region used when none has been persisted yet.
    #[must_use]
    pub fn with_default_region(self, region: impl Into<String>) -> Self {
        self.lock().selected_region = region.into();
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> SettingsState {
        self.lock().clone()
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.lock().theme
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Palette for the current theme.
    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palettes.for_mode(self.theme()).clone()
    }

    /// Loads every field from storage, then refreshes the feed if allowed.
    ///
    /// Fields are read independently. A missing, unreadable or unparseable
    /// value keeps its default and never affects the other fields.
    pub async fn initialize(&self) -> SettingsState {
        let theme = self.load::<ThemeMode>(StorageKey::Theme).await;
        let region = self.load::<String>(StorageKey::SelectedState).await;
        let online = self.load::<bool>(StorageKey::IsOnline).await;
        let enabled = self.load::<bool>(StorageKey::NotificationsEnabled).await;
        let notifications = self.load::<Vec<Notification>>(StorageKey::Notifications).await;

        let fetch = {
            let mut state = self.lock();
            if let Some(theme) = theme {
                state.theme = theme;
            }
            if let Some(region) = region {
                state.selected_region = region;
            }
            if let Some(online) = online {
                state.online_mode = online;
            }
            if let Some(enabled) = enabled {
                state.notifications_enabled = enabled;
            }
            if let Some(notifications) = notifications {
                state.notifications = notifications;
            }
            state.loading = false;

            tracing::debug!(
                theme = %state.theme,
                region = %state.selected_region,
                online = state.online_mode,
                notifications_enabled = state.notifications_enabled,
                cached = state.notifications.len(),
                "settings loaded"
            );
            state.fetches_notifications()
        };

        if fetch {
            self.refresh_notifications().await;
        }
        self.snapshot()
    }

    /// Replaces the cached feed with the remote one.
    ///
    /// Does nothing unless online mode and notification delivery are both on.
    /// A failed fetch keeps the cached feed and is only logged.
    pub async fn refresh_notifications(&self) {
        if !self.lock().fetches_notifications() {
            tracing::debug!("notification refresh skipped");
            return;
        }

        match self.source.fetch_notifications().await {
            Ok(feed) => {
                tracing::debug!(count = feed.len(), "notification feed refreshed");
                let mut state = self.lock();
                state.notifications = feed;
                self.persist
                    .publish_json(StorageKey::Notifications, &state.notifications);
            }
            Err(e) => {
                tracing::warn!(error = %e, "notification refresh failed, keeping cached feed");
            }
        }
    }

    /// Prepends `notification` to the cached feed.
    pub fn add_notification(&self, notification: Notification) {
        let mut state = self.lock();
        state.notifications.insert(0, notification);
        self.persist
            .publish_json(StorageKey::Notifications, &state.notifications);
    }

    /// Flips light/dark and returns the new mode.
    pub fn toggle_theme(&self) -> ThemeMode {
        let mut state = self.lock();
        state.theme = state.theme.toggled();
        self.persist.publish_json(StorageKey::Theme, &state.theme);
        state.theme
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        let mut state = self.lock();
        state.theme = theme;
        self.persist.publish_json(StorageKey::Theme, &state.theme);
    }

    pub fn set_selected_region(&self, region: impl Into<String>) {
        let mut state = self.lock();
        state.selected_region = region.into();
        self.persist
            .publish_json(StorageKey::SelectedState, &state.selected_region);
    }

    /// Flips online mode and returns the new value.
    ///
    /// Going online with delivery enabled refreshes the feed before returning.
    pub async fn toggle_online_mode(&self) -> bool {
        self.apply_flag(Flag::Online, |online| !online).await
    }

    pub async fn set_online_mode(&self, online: bool) {
        self.apply_flag(Flag::Online, |_| online).await;
    }

    /// Flips notification delivery and returns the new value.
    ///
    /// Enabling delivery while online refreshes the feed before returning.
    pub async fn toggle_notifications(&self) -> bool {
        self.apply_flag(Flag::Notifications, |enabled| !enabled).await
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) {
        self.apply_flag(Flag::Notifications, |_| enabled).await;
    }

    async fn apply_flag(&self, flag: Flag, update: impl FnOnce(bool) -> bool) -> bool {
        let (value, became_live) = {
            let mut state = self.lock();
            let was_live = state.fetches_notifications();
            let slot = match flag {
                Flag::Online => &mut state.online_mode,
                Flag::Notifications => &mut state.notifications_enabled,
            };
            *slot = update(*slot);
            let value = *slot;
            self.persist.publish_json(flag.key(), &value);
            (value, !was_live && state.fetches_notifications())
        };

        tracing::debug!(flag = ?flag, value, "setting changed");

        if became_live {
            self.refresh_notifications().await;
        }
        value
    }

    async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(raw) => raw?,
            Err(e) => {
                let error = MarketdirError::PersistenceRead {
                    key: key.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %error, "using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                let error = MarketdirError::PersistenceRead {
                    key: key.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %error, "using default");
                None
            }
        }
    }

    // Writes are queued while this lock is held, so queue order matches the
    // order of in-memory updates.
    fn lock(&self) -> MutexGuard<'_, SettingsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}
