//! Configuration management for the surfatlas crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags are applied on top by the
//! binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default catalog root
pub const DEFAULT_BASE_URL: &str = "https://www.wannasurf.com/";

/// Desktop browser User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output locations and layout
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Home page listing all continents
    pub base_url: String,

    /// Minimum delay between two requests, in seconds
    pub delay_secs: f64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Children visited per level in sample mode
    pub sample_limit: usize,

    /// Extra attempts for recoverable fetch errors
    pub max_retries: u32,

    /// First backoff delay in milliseconds, doubled on every retry
    pub retry_base_delay_ms: u64,

    /// Deepest zone nesting followed below a country
    pub max_depth: usize,
}

/// How spot rows are split across CSV files
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CsvLayout {
    /// One file per leaf region, `{Country}.csv` when a country has only one
    #[default]
    PerRegion,
    /// One `{Country}.csv` per country
    PerCountry,
}

impl FromStr for CsvLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "per-region" => Ok(Self::PerRegion),
            "per-country" => Ok(Self::PerCountry),
            other => Err(format!("unknown CSV layout '{other}'")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for per-region CSV files
    pub csv_dir: PathBuf,

    /// Directory for per-continent workbooks
    pub workbook_dir: PathBuf,

    pub csv_layout: CsvLayout,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            delay_secs: 0.5,
            request_timeout_secs: 30,
            user_agent: String::from(DEFAULT_USER_AGENT),
            sample_limit: 3,
            max_retries: 2,
            retry_base_delay_ms: 1000,
            max_depth: 8,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from("output_csv"),
            workbook_dir: PathBuf::from("excel_output"),
            csv_layout: CsvLayout::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Read `key`, falling back to `default` when unset or unparseable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from `SURFATLAS_*` environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let crawler = CrawlerConfig {
            base_url: env_or("SURFATLAS_BASE_URL", defaults.crawler.base_url),
            delay_secs: env_or("SURFATLAS_DELAY_SECS", defaults.crawler.delay_secs),
            request_timeout_secs: env_or(
                "SURFATLAS_REQUEST_TIMEOUT",
                defaults.crawler.request_timeout_secs,
            ),
            user_agent: env_or("SURFATLAS_USER_AGENT", defaults.crawler.user_agent),
            sample_limit: env_or("SURFATLAS_SAMPLE_LIMIT", defaults.crawler.sample_limit),
            max_retries: env_or("SURFATLAS_MAX_RETRIES", defaults.crawler.max_retries),
            retry_base_delay_ms: env_or(
                "SURFATLAS_RETRY_BASE_DELAY_MS",
                defaults.crawler.retry_base_delay_ms,
            ),
            max_depth: env_or("SURFATLAS_MAX_DEPTH", defaults.crawler.max_depth),
        };

        let output = OutputConfig {
            csv_dir: env_or("SURFATLAS_CSV_DIR", defaults.output.csv_dir),
            workbook_dir: env_or("SURFATLAS_WORKBOOK_DIR", defaults.output.workbook_dir),
            csv_layout: env_or("SURFATLAS_CSV_LAYOUT", defaults.output.csv_layout),
        };

        let logging = LoggingConfig {
            level: env_or("SURFATLAS_LOG_LEVEL", defaults.logging.level),
            format: env_or("SURFATLAS_LOG_FORMAT", defaults.logging.format),
        };

        Ok(Self {
            crawler,
            output,
            logging,
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.crawler.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.crawler.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("base_url must use http or https");
        }

        if !self.crawler.delay_secs.is_finite() || self.crawler.delay_secs < 0.0 {
            anyhow::bail!("delay_secs must be a non-negative number");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.crawler.sample_limit == 0 {
            anyhow::bail!("sample_limit must be greater than 0");
        }

        if self.crawler.max_depth == 0 {
            anyhow::bail!("max_depth must be greater than 0");
        }

        if reqwest::header::HeaderValue::from_str(&self.crawler.user_agent).is_err() {
            anyhow::bail!("user_agent contains characters not allowed in a header");
        }

        if self.output.csv_dir.as_os_str().is_empty()
            || self.output.workbook_dir.as_os_str().is_empty()
        {
            anyhow::bail!("output directories must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Minimum delay between requests
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.crawler.delay_secs).unwrap_or_default()
    }

    #[must_use]
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.retry_base_delay_ms)
    }
}
