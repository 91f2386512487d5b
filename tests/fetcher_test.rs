//! Integration tests for HttpFetcher using wiremock
//!
//! These tests validate the HTTP fetcher's behavior with mock servers.

mod common;

use std::time::{Duration, Instant};
use surfatlas::crawler::HttpFetcher;
use surfatlas::error::ScrapeErrorTrait;
use surfatlas::utils::error::FetchError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer, delay: Duration) -> HttpFetcher {
    HttpFetcher::new(
        &format!("{}/", server.uri()),
        delay,
        Duration::from_secs(5),
        "surfatlas-test",
    )
    .unwrap()
}

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let server = MockServer::start().await;
    common::mount_page(&server, "/spot/Europe/", "<html><body>Gravière</body></html>").await;

    let result = fetcher(&server, Duration::ZERO).fetch("/spot/Europe/").await;

    assert!(result.is_ok(), "Fetch should succeed: {:?}", result.err());
    let page = result.unwrap();
    assert_eq!(page.status, 200);
    assert!(page.url.ends_with("/spot/Europe/"));
    assert!(page.body.contains("Gravière"));
}

/// Test that browser headers go out with every request
#[tokio::test]
async fn test_sends_browser_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "surfatlas-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(&server, Duration::ZERO).fetch("/").await;
    assert!(result.is_ok(), "Headers should match: {:?}", result.err());

    // Comma-separated values are compared whole on the recorded request
    let requests = server.received_requests().await.unwrap();
    let language = requests[0]
        .headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok());
    assert_eq!(language, Some("en-US,en;q=0.9"));
    assert!(requests[0]
        .headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html")));
}

/// Test 404 is reported with its status and is not recoverable
#[tokio::test]
async fn test_404_status() {
    let server = MockServer::start().await;
    common::mount_status(&server, "/missing/", 404).await;

    let err = fetcher(&server, Duration::ZERO)
        .fetch("/missing/")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus { code: 404 }));
    assert!(!err.is_recoverable());
}

/// Test 503 is recoverable so the walker will retry it
#[tokio::test]
async fn test_503_is_recoverable() {
    let server = MockServer::start().await;
    common::mount_status(&server, "/busy/", 503).await;

    let err = fetcher(&server, Duration::ZERO).fetch("/busy/").await.unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { code: 503 }));
    assert!(err.is_recoverable());
}

/// Test request timeout
#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(
        &format!("{}/", server.uri()),
        Duration::ZERO,
        Duration::from_millis(200),
        "surfatlas-test",
    )
    .unwrap();

    let err = fetcher.fetch("/slow/").await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout), "got {err:?}");
    assert!(err.is_recoverable());
}

/// Test latin-1 body declared in the content type
#[tokio::test]
async fn test_fetch_latin1_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latin/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=ISO-8859-1")
                .set_body_bytes(b"<p>Pe\xf1a Cura\xe7ao</p>".to_vec()),
        )
        .mount(&server)
        .await;

    let page = fetcher(&server, Duration::ZERO).fetch("/latin/").await.unwrap();
    assert!(page.body.contains("Peña Curaçao"));
}

/// K fetches with delay D take at least (K-1)·D
#[tokio::test]
async fn test_throttle_spacing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(4)
        .mount(&server)
        .await;

    let delay = Duration::from_millis(100);
    let fetcher = fetcher(&server, delay);

    let start = Instant::now();
    for _ in 0..4 {
        fetcher.fetch("/page/").await.unwrap();
    }
    let elapsed = start.elapsed();

    // Small allowance for clock granularity between governor and std
    assert!(
        elapsed + Duration::from_millis(5) >= delay * 3,
        "4 requests took only {elapsed:?}"
    );
}

/// Relative and absolute URLs both resolve
#[tokio::test]
async fn test_absolute_url_passes_through() {
    let server = MockServer::start().await;
    common::mount_page(&server, "/spot/Africa/", "<html></html>").await;

    let url = format!("{}/spot/Africa/", server.uri());
    let page = fetcher(&server, Duration::ZERO).fetch(&url).await.unwrap();
    assert_eq!(page.url, url);
}
