//! HTTP JSON data source.
//!
//! Endpoints answer either with a bare JSON array or with a page object
//! `{"items": [...], "next": "<url>"}`. A `next` link may be absolute or
//! relative to the page that carried it.

use crate::domain::error::{MarketdirError, Result};
use crate::domain::Notification;
use crate::remote::source::{ContentSource, FetchResult, NotificationSource, PageCallback};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;

/// Upper bound on pages followed by one fetch.
pub const DEFAULT_MAX_PAGES: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Paged {
        items: Vec<T>,
        #[serde(default)]
        next: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> PageBody<T> {
    fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            Self::Paged { items, next } => (items, next.filter(|n| !n.is_empty())),
            Self::Bare(items) => (items, None),
        }
    }
}

/// [`ContentSource`] over a paged HTTP JSON endpoint.
pub struct HttpSource<T> {
    client: reqwest::Client,
    url: String,
    max_pages: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HttpSource<T> {
    /// Creates a source for `path` under `base_url`.
    #[must_use]
    pub fn new(base_url: &str, path: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: endpoint(base_url, path),
            max_pages: DEFAULT_MAX_PAGES,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

impl<T: DeserializeOwned> HttpSource<T> {
    async fn get_page(&self, url: &Url) -> Result<PageBody<T>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fetch_failed(url, &e))?;

        response
            .json::<PageBody<T>>()
            .await
            .map_err(|e| fetch_failed(url, &e))
    }
}

#[async_trait]
impl<T> ContentSource<T> for HttpSource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    #[tracing::instrument(level = "debug", name = "http_fetch", skip(self, on_page), fields(url = %self.url))]
    async fn fetch(&self, on_page: Option<PageCallback<'_, T>>) -> Result<FetchResult<T>> {
        let mut next = Some(
            Url::parse(&self.url)
                .map_err(|e| MarketdirError::FetchFailed(format!("invalid url {}: {e}", self.url)))?,
        );
        let mut result = FetchResult::default();

        while let Some(url) = next.take() {
            if result.pages == self.max_pages {
                tracing::warn!(max_pages = self.max_pages, "page limit reached, stopping");
                break;
            }

            let (items, link) = self.get_page(&url).await?.into_parts();
            result.pages += 1;
            tracing::debug!(page = result.pages, count = items.len(), "page received");

            if let Some(callback) = on_page {
                callback(&items);
            }
            result.items.extend(items);

            next = match link {
                Some(link) => Some(url.join(&link).map_err(|e| {
                    MarketdirError::FetchFailed(format!("invalid next link {link}: {e}"))
                })?),
                None => None,
            };
        }

        Ok(result)
    }
}

#[async_trait]
impl NotificationSource for HttpSource<Notification> {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        self.fetch(None).await.map(|result| result.items)
    }
}

impl<T> std::fmt::Debug for HttpSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("url", &self.url)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn fetch_failed(url: &Url, error: &reqwest::Error) -> MarketdirError {
    MarketdirError::FetchFailed(format!("{url}: {error}"))
}
