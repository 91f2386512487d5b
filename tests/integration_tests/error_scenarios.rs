//! Error scenario integration tests
//!
//! Verifies that node failures are isolated and reported, that transient
//! failures are retried, and that only root or export failures abort a run.

use surfatlas::error::{Error, ErrorCategory};
use surfatlas::models::{NodeKind, ScrapeMode};
use surfatlas::pipeline;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, paths};

// ============================================================================
// Isolated Node Failures
// ============================================================================

#[tokio::test]
async fn test_failing_zone_does_not_stop_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site_except(&server, &[paths::LANDES]).await;
    common::mount_status(&server, paths::LANDES, 500).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.path, "Europe > France > Landes");
    assert_eq!(failure.kind, NodeKind::Zone);
    assert_eq!(failure.category, ErrorCategory::Network);
    assert!(failure.url.ends_with(paths::LANDES));

    // Pays Basque, Portugal and the other continent still made it
    assert_eq!(report.countries, 3);
    assert_eq!(report.zones, 3);
    assert_eq!(report.spots, 4);
    assert!(report.render_text().contains("FAILED [zone] Europe > France > Landes"));
}

#[tokio::test]
async fn test_missing_spot_is_recorded() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site_except(&server, &[paths::SEIGNOSSE]).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, NodeKind::Spot);
    assert_eq!(report.failures[0].path, "Europe > France > Landes > Seignosse");
    assert!(report.failures[0].error.contains("404"));
    assert_eq!(report.spots, 5);
}

#[tokio::test]
async fn test_malformed_country_page() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site_except(&server, &[paths::PORTUGAL]).await;
    common::mount_page(
        &server,
        paths::PORTUGAL,
        "<html><head><title>Maintenance</title></head><body><h1>Back soon</h1></body></html>",
    )
    .await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, NodeKind::Country);
    assert_eq!(report.failures[0].category, ErrorCategory::Parsing);
    assert_eq!(report.countries, 2);
    assert!(!report
        .csv_files
        .iter()
        .any(|p| p.ends_with("Portugal.csv")));
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_transient_error_is_retried() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site_except(&server, &[paths::LANDES]).await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path(paths::LANDES))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::mount_page(&server, paths::LANDES, common::ZONE_LANDES_HTML).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert!(!report.is_partial(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.spots, 6);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site_except(&server, &[paths::LANDES]).await;

    Mock::given(method("GET"))
        .and(path(paths::LANDES))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = common::test_config(&server, temp_dir.path());
    config.crawler.max_retries = 2;
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.contains("503"));
}

// ============================================================================
// Fatal Errors
// ============================================================================

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_status(&server, paths::ROOT, 503).await;

    let config = common::test_config(&server, temp_dir.path());
    let err = pipeline::run(&config, ScrapeMode::Sample).await.unwrap_err();

    assert!(matches!(err, Error::RootUnavailable { .. }), "got {err:?}");
    assert!(!config.output.csv_dir.exists(), "nothing should be exported");
    assert!(!config.output.workbook_dir.exists());
}

#[tokio::test]
async fn test_malformed_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_page(&server, paths::ROOT, "<html><body>Under construction</body></html>").await;

    let config = common::test_config(&server, temp_dir.path());
    let err = pipeline::run(&config, ScrapeMode::Full).await.unwrap_err();

    assert!(matches!(err, Error::RootUnavailable { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unwritable_output_is_export_error() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let blocker = temp_dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();

    let mut config = common::test_config(&server, temp_dir.path());
    config.output.csv_dir = blocker.join("csv");
    let err = pipeline::run(&config, ScrapeMode::Full).await.unwrap_err();

    assert!(matches!(err, Error::Export(_)), "got {err:?}");
}
