//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry of the notification feed.
///
/// Serialized as camelCase JSON, which is both the remote wire format and the
/// persisted format of the cached feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Creates an unread notification stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketdir::domain::Notification;
    ///
    /// let n = Notification::new("n-1", "Welcome", "Thanks for joining");
    /// assert!(!n.read);
    /// assert_eq!(n.id, "n-1");
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
            read: false,
        }
    }
}
