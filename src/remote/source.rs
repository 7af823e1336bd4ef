//! Remote data source abstractions.

use crate::domain::error::Result;
use crate::domain::Notification;
use async_trait::async_trait;

/// Callback invoked with each page as soon as it arrives.
pub type PageCallback<'a, T> = &'a (dyn Fn(&[T]) + Send + Sync);

/// Outcome of a complete paged fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult<T> {
    /// Every item across all pages, in arrival order.
    pub items: Vec<T>,
    /// Number of pages retrieved.
    pub pages: usize,
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages: 0,
        }
    }
}

/// Supplies the notification feed.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Fetches the current feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketdirError::FetchFailed`] when the feed cannot be
    /// retrieved or decoded.
    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;
}

/// Supplies a listing collection, possibly across several pages.
#[async_trait]
pub trait ContentSource<T: Send + Sync + 'static>: Send + Sync {
    /// Fetches every page, calling `on_page` after each one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketdirError::FetchFailed`] on the first failing
    /// page. Pages already delivered through `on_page` are not retracted.
    async fn fetch(&self, on_page: Option<PageCallback<'_, T>>) -> Result<FetchResult<T>>;
}
