//! Remote data sources for the notification feed and listing collections.

pub mod http;
pub mod source;

pub use http::{HttpSource, DEFAULT_MAX_PAGES};
pub use source::{ContentSource, FetchResult, NotificationSource, PageCallback};
