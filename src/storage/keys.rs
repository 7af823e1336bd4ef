//! Persisted storage keys.

use std::fmt;

/// Every key the state core reads or writes.
///
/// Values are JSON-encoded except [`StorageKey::AccessToken`], which holds the
/// raw bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Theme,
    SelectedState,
    IsOnline,
    NotificationsEnabled,
    Notifications,
    AccessToken,
    User,
}

impl StorageKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::SelectedState => "selectedState",
            Self::IsOnline => "isOnline",
            Self::NotificationsEnabled => "notificationsEnabled",
            Self::Notifications => "notifications",
            Self::AccessToken => "accessToken",
            Self::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
