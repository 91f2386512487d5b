//! End-to-end run: walk, aggregate, verify, export
//!
//! Node failures are collected in the [`RunReport`] and do not fail the run.
//! Only an unreachable root, a broken aggregation invariant or an export
//! failure surface as `Err`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::aggregate::{aggregate_tree, verify_tree};
use crate::config::Config;
use crate::crawler::{HierarchyWalker, HttpFetcher, PageSource, WalkOptions};
use crate::error::Result;
use crate::export::{CsvExporter, WorkbookExporter};
use crate::models::{NodeFailure, ScrapeMode, ScrapeTree};

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: ScrapeMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub continents: usize,
    pub countries: usize,
    pub zones: usize,
    pub spots: usize,
    pub csv_files: Vec<PathBuf>,
    pub workbooks: Vec<PathBuf>,
    pub failures: Vec<NodeFailure>,
}

impl RunReport {
    /// Whether some nodes were skipped
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Human-readable summary: one line per failure, then the totals
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for failure in &self.failures {
            let _ = writeln!(
                out,
                "FAILED [{}] {} ({}): {}",
                failure.kind, failure.path, failure.url, failure.error
            );
        }
        if !self.failures.is_empty() {
            out.push('\n');
        }

        let _ = writeln!(out, "Scrape Summary ({} mode)", self.mode);
        let _ = writeln!(out, "=====================");
        let _ = writeln!(out, "Continents:  {}", self.continents);
        let _ = writeln!(out, "Countries:   {}", self.countries);
        let _ = writeln!(out, "Zones:       {}", self.zones);
        let _ = writeln!(out, "Spots:       {}", self.spots);
        let _ = writeln!(out, "Failures:    {}", self.failures.len());
        let _ = writeln!(out, "CSV files:   {}", self.csv_files.len());
        let _ = writeln!(out, "Workbooks:   {}", self.workbooks.len());
        let _ = writeln!(
            out,
            "Duration:    {:.1}s",
            self.elapsed().num_milliseconds() as f64 / 1000.0
        );
        out
    }

    /// Pretty-printed JSON form
    ///
    /// # Errors
    ///
    /// Only if serialization itself fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Paths written by [`export_tree`]
#[derive(Debug, Clone, Default)]
pub struct ExportedFiles {
    pub csv_files: Vec<PathBuf>,
    pub workbooks: Vec<PathBuf>,
}

/// Run against the live site described by `config`
///
/// # Errors
///
/// See [`run_with_source`]; additionally fails if the HTTP client cannot be
/// built.
pub async fn run(config: &Config, mode: ScrapeMode) -> Result<RunReport> {
    let fetcher = HttpFetcher::from_config(config)?;
    tracing::info!(
        base_url = %fetcher.base_url(),
        delay_ms = fetcher.throttle().delay().as_millis() as u64,
        "Fetcher ready"
    );
    run_with_source(&fetcher, config, mode).await
}

/// Run against any page source
///
/// # Errors
///
/// - `Error::RootUnavailable` when the continent index cannot be loaded
/// - `Error::Aggregation` when summaries disagree with the tree
/// - `Error::Export` when an output file cannot be written
pub async fn run_with_source<S: PageSource>(
    source: S,
    config: &Config,
    mode: ScrapeMode,
) -> Result<RunReport> {
    let started_at = Utc::now();
    tracing::info!(mode = %mode, root = %config.crawler.base_url, "Starting scrape");

    let walker = HierarchyWalker::new(source, WalkOptions::from_config(config, mode));
    let mut tree = walker.walk(&config.crawler.base_url).await?;

    aggregate_tree(&mut tree);
    verify_tree(&tree)?;

    let files = export_tree(&tree, config)?;

    let report = RunReport {
        mode,
        started_at,
        finished_at: Utc::now(),
        continents: tree.continents.len(),
        countries: tree.country_count(),
        zones: tree.zone_count(),
        spots: tree.spot_count(),
        csv_files: files.csv_files,
        workbooks: files.workbooks,
        failures: tree.failures,
    };

    tracing::info!(
        countries = report.countries,
        zones = report.zones,
        spots = report.spots,
        failures = report.failures.len(),
        "Scrape finished"
    );
    Ok(report)
}

/// Write CSV files and workbooks for an aggregated tree
///
/// # Errors
///
/// Returns the first export failure
pub fn export_tree(tree: &ScrapeTree, config: &Config) -> Result<ExportedFiles> {
    let csv_files =
        CsvExporter::new(&config.output.csv_dir, config.output.csv_layout).export(tree)?;
    let workbooks = WorkbookExporter::new(&config.output.workbook_dir).export_all(&tree.continents)?;

    Ok(ExportedFiles {
        csv_files,
        workbooks,
    })
}
