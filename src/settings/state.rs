//! Settings state snapshot.

use crate::domain::Notification;
use crate::ui::ThemeMode;

/// Region shown until the user picks one.
pub const DEFAULT_REGION: &str = "default region";

/// User preferences and the cached notification feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub theme: ThemeMode,
    pub selected_region: String,
    pub notifications_enabled: bool,
    pub online_mode: bool,
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// True until the first load from storage has finished.
    pub loading: bool,
}

impl SettingsState {
    /// Remote notification refresh only runs in this state.
    #[must_use]
    pub const fn fetches_notifications(&self) -> bool {
        self.online_mode && self.notifications_enabled
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            selected_region: DEFAULT_REGION.to_string(),
            notifications_enabled: true,
            online_mode: true,
            notifications: Vec::new(),
            loading: true,
        }
    }
}
