//! Page fetching and hierarchy traversal
//!
//! [`HttpFetcher`] talks to the site; [`HierarchyWalker`] drives it through
//! the continent → country → zone → spot hierarchy. The walker only sees the
//! [`PageSource`] trait, so tests can hand it an in-memory site.

pub mod fetcher;
pub mod headers;
pub mod walker;

use async_trait::async_trait;

use crate::utils::error::FetchError;

pub use fetcher::{HttpFetcher, RequestThrottle};
pub use walker::{HierarchyWalker, WalkOptions};

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Absolute URL after redirects
    pub url: String,
    pub status: u16,
    /// Decoded body
    pub body: String,
}

/// Anything that can produce catalog pages
///
/// Requests are issued one at a time from a single task, so implementations
/// need not be `Send`.
#[async_trait(?Send)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError>;
}

#[async_trait(?Send)]
impl<T: PageSource + ?Sized> PageSource for &T {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        (**self).fetch(url).await
    }
}
