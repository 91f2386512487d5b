//! End-to-end pipeline integration tests
//!
//! Tests the complete workflow:
//! 1. Continent index fetch (mocked)
//! 2. Country, zone and spot traversal
//! 3. Aggregation
//! 4. CSV and workbook export

use std::path::{Path, PathBuf};
use surfatlas::config::CsvLayout;
use calamine::{open_workbook, Reader, Xlsx};
use surfatlas::export::{ABSENT, COUNTRY_COLUMNS, SPOT_COLUMNS, ZONE_COLUMNS};
use surfatlas::models::ScrapeMode;
use surfatlas::pipeline;
use tempfile::TempDir;
use wiremock::MockServer;

use crate::common::{self, paths};

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Records of a CSV file keyed by header
fn read_csv(path: &Path) -> Vec<std::collections::HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    reader
        .records()
        .map(|r| {
            headers
                .iter()
                .cloned()
                .zip(r.unwrap().iter().map(String::from))
                .collect()
        })
        .collect()
}

fn column(name: &str) -> usize {
    SPOT_COLUMNS.iter().position(|c| *c == name).unwrap()
}

// ============================================================================
// Complete Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_full_run_exports_everything() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::Full);
    assert!(!report.is_partial(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.continents, 3);
    assert_eq!(report.countries, 3);
    assert_eq!(report.zones, 4);
    assert_eq!(report.spots, 6);

    assert_eq!(
        file_names(&report.csv_files),
        vec![
            "France.csv",
            "France_Landes.csv",
            "France_North.csv",
            "Portugal.csv",
            "USA.csv",
        ]
    );
    assert_eq!(
        file_names(&report.workbooks),
        vec!["Europe.xlsx", "North_America.xlsx", "Antarctica.xlsx"]
    );
    for path in report.csv_files.iter().chain(&report.workbooks) {
        assert!(path.exists(), "{} should exist", path.display());
    }
}

#[tokio::test]
async fn test_mavericks_csv_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    let usa = report
        .csv_files
        .iter()
        .find(|p| p.ends_with("USA.csv"))
        .unwrap();
    let mut reader = csv::Reader::from_path(usa).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, SPOT_COLUMNS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    let mavericks = &records[0];

    assert_eq!(&mavericks[column("Continent")], "North America");
    assert_eq!(&mavericks[column("Country")], "USA");
    assert_eq!(&mavericks[column("Zone")], "California");
    assert_eq!(&mavericks[column("Spot")], "Mavericks");
    assert_eq!(mavericks[column("Latitude")].parse::<f64>().unwrap(), 37.4);
    assert_eq!(mavericks[column("Longitude")].parse::<f64>().unwrap(), -122.5);
    assert_eq!(&mavericks[column("Access type")], "boat");
    assert_eq!(&mavericks[column("Nov/Dec")], "Large");
    assert_eq!(&mavericks[column("Best tide movement")], ABSENT);
    assert_eq!(&mavericks[column("Other details")], "Crowd: Locals only");
    assert!(mavericks[column("URL")].ends_with(paths::MAVERICKS));
}

#[tokio::test]
async fn test_region_split_rows() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    let by_name = |name: &str| {
        report
            .csv_files
            .iter()
            .find(|p| p.file_name().unwrap() == name)
            .map(|p| read_csv(p))
            .unwrap()
    };

    let france = by_name("France.csv");
    assert_eq!(france.len(), 1);
    assert_eq!(france[0]["Spot"], "La Torche");
    assert_eq!(france[0]["Zone"], ABSENT);

    let landes = by_name("France_Landes.csv");
    let names: Vec<_> = landes.iter().map(|r| r["Spot"].as_str()).collect();
    assert_eq!(names, vec!["Hossegor", "Seignosse"]);

    let north = by_name("France_North.csv");
    assert_eq!(north[0]["Zone"], "Pays Basque > North");
    assert_eq!(north[0]["Jan/Feb"], "Large");
}

#[tokio::test]
async fn test_per_country_layout() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let mut config = common::test_config(&server, temp_dir.path());
    config.output.csv_layout = CsvLayout::PerCountry;
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    assert_eq!(
        file_names(&report.csv_files),
        vec!["France.csv", "Portugal.csv", "USA.csv"]
    );
    assert_eq!(read_csv(&report.csv_files[0]).len(), 4);
}

// ============================================================================
// Sample Mode Tests
// ============================================================================

#[tokio::test]
async fn test_sample_mode_limits_each_level() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let mut config = common::test_config(&server, temp_dir.path());
    config.crawler.sample_limit = 1;
    let report = pipeline::run(&config, ScrapeMode::Sample).await.unwrap();

    assert_eq!(report.continents, 3);
    assert_eq!(report.countries, 2, "one country per continent");
    assert_eq!(report.zones, 2);
    assert_eq!(report.spots, 2);

    // France lists Landes before its own spots, so La Torche is left out
    let requests = server.received_requests().await.unwrap();
    let requested: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(requested.len(), 7, "requested: {requested:?}");
    assert!(!requested.iter().any(|p| p == paths::PORTUGAL));
    assert!(!requested.iter().any(|p| p == paths::BASQUE));
    assert!(!requested.iter().any(|p| p == paths::SEIGNOSSE));
    assert!(!requested.iter().any(|p| p == paths::LA_TORCHE));
}

#[tokio::test]
async fn test_sample_mode_default_limit_covers_small_site() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Sample).await.unwrap();

    assert_eq!(report.mode, ScrapeMode::Sample);
    assert_eq!(report.spots, 6);
}

// ============================================================================
// Workbook Tests
// ============================================================================

#[tokio::test]
async fn test_empty_continent_workbook_has_three_sheets() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    let antarctica = report
        .workbooks
        .iter()
        .find(|p| p.ends_with("Antarctica.xlsx"))
        .unwrap();
    let mut workbook: Xlsx<_> = open_workbook(antarctica).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Country", "Zones", "Spots"]);

    for (sheet, columns) in [
        ("Country", &COUNTRY_COLUMNS[..]),
        ("Zones", &ZONE_COLUMNS[..]),
        ("Spots", &SPOT_COLUMNS[..]),
    ] {
        let range = workbook.worksheet_range(sheet).unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(rows.len(), 1, "{sheet} should hold only its header");
        assert_eq!(rows[0], columns.to_vec());
    }
}

#[tokio::test]
async fn test_json_summary() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    common::mount_site(&server).await;

    let config = common::test_config(&server, temp_dir.path());
    let report = pipeline::run(&config, ScrapeMode::Full).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["mode"], "full");
    assert_eq!(value["spots"], 6);
    assert_eq!(value["csv_files"].as_array().unwrap().len(), 5);
    assert!(value["failures"].as_array().unwrap().is_empty());
}
