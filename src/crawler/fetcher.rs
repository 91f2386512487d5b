//! HTTP fetcher with request throttling and charset detection
//!
//! This module provides the fetcher used for every catalog page:
//! - Minimum delay between consecutive requests with governor
//! - Browser-like default headers
//! - Relative URL resolution against the catalog root
//! - Charset detection and conversion with encoding_rs
//!
//! Retries are not done here; the hierarchy walker owns the retry policy.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use regex::Regex;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::crawler::headers::build_browser_headers;
use crate::crawler::{PageSource, RawPage};
use crate::utils::error::FetchError;
use crate::utils::resolve_url;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:\-]+)"#)
        .expect("Invalid regex pattern")
});

/// Bytes scanned for a `<meta charset>` declaration
const META_SNIFF_LEN: usize = 1024;

/// Enforces a minimum delay between consecutive requests
///
/// Backed by a direct governor limiter with a burst of one, so the first
/// request goes out immediately and each later one waits until `delay` has
/// passed since the previous. A zero delay disables throttling.
pub struct RequestThrottle {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    delay: Duration,
}

impl RequestThrottle {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            limiter: Quota::with_period(delay).map(RateLimiter::direct),
            delay,
        }
    }

    /// Wait until the next request may be sent
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Catalog page fetcher
pub struct HttpFetcher {
    /// HTTP client with timeout, compression and default headers
    client: Client,

    /// Shared by every request made through this fetcher
    throttle: RequestThrottle,

    /// Root that relative URLs are resolved against
    base_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher
    ///
    /// # Arguments
    ///
    /// * `base_url` - Catalog root, also sent as referer
    /// * `delay` - Minimum delay between requests
    /// * `timeout` - Per-request timeout
    /// * `user_agent` - User-Agent header value
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unparseable base URL and
    /// `FetchError::Network` if the HTTP client cannot be created
    pub fn new(
        base_url: &str,
        delay: Duration,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .default_headers(build_browser_headers(user_agent, Some(base_url.as_str())))
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            throttle: RequestThrottle::new(delay),
            base_url,
        })
    }

    /// Create a fetcher from the `[crawler]` settings
    ///
    /// # Errors
    ///
    /// Same as [`HttpFetcher::new`]
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            &config.crawler.base_url,
            config.request_delay(),
            config.request_timeout(),
            &config.crawler.user_agent,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn throttle(&self) -> &RequestThrottle {
        &self.throttle
    }

    /// Resolve a possibly relative URL against the base URL
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the URL cannot be resolved
    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        resolve_url(&self.base_url, url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))
    }

    /// Fetch one page
    ///
    /// Waits for the throttle, sends a GET request and decodes the body.
    ///
    /// # Errors
    ///
    /// - `FetchError::HttpStatus` for any non-success status
    /// - `FetchError::Timeout` when the request exceeds the timeout
    /// - `FetchError::Network` for connection failures
    /// - `FetchError::Decode` when the body cannot be decoded
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let target = self.resolve(url)?;

        self.throttle.wait().await;

        tracing::debug!(url = %target, "Fetching page");

        let response = self.client.get(target.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(url = %target, status = status.as_u16(), "Non-success status");
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = Self::decode_response(response).await?;

        tracing::trace!(url = %final_url, bytes = body.len(), "Fetched page");

        Ok(RawPage {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }

    async fn decode_response(response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await?;

        Self::decode_bytes(&bytes, &content_type)
    }

    /// Decode a response body to a string
    ///
    /// Tries, in order:
    /// 1. The charset from the Content-Type header
    /// 2. A `<meta charset>` declaration near the top of the document
    /// 3. UTF-8
    /// 4. windows-1252
    ///
    /// A declared charset that produces decoding errors is ignored.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` if no strategy decodes cleanly
    pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
        let declared = charset_from_content_type(content_type).or_else(|| sniff_meta_charset(bytes));

        if let Some(encoding) = declared {
            let (text, _, had_errors) = encoding.decode(bytes);
            if !had_errors {
                return Ok(text.into_owned());
            }
            tracing::warn!(
                encoding = encoding.name(),
                "Body does not match declared charset, falling back"
            );
        }

        let (text, _, had_errors) = UTF_8.decode(bytes);
        if !had_errors {
            return Ok(text.into_owned());
        }

        let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
        if had_errors {
            return Err(FetchError::Decode(
                "Failed to decode content as UTF-8 or windows-1252".to_string(),
            ));
        }

        Ok(text.into_owned())
    }
}

#[async_trait(?Send)]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        HttpFetcher::fetch(self, url).await
    }
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_LEN)]);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}
