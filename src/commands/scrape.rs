use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use surfatlas::config::{Config, CsvLayout};
use surfatlas::models::ScrapeMode;
use surfatlas::pipeline::{self, RunReport};
use surfatlas::Error;

/// Exit code for a run that could not load the continent index
pub const EXIT_ROOT_UNAVAILABLE: u8 = 2;

/// Exit code for every other fatal error
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Visit every discovered child instead of a sample per level
    #[arg(long)]
    pub full: bool,

    /// TOML configuration file; environment variables are used otherwise
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Minimum delay between requests, in seconds
    #[arg(long)]
    pub delay: Option<f64>,

    /// Children visited per level in sample mode
    #[arg(long)]
    pub sample_limit: Option<usize>,

    /// Directory for CSV files
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Directory for workbooks
    #[arg(long)]
    pub workbook_dir: Option<PathBuf>,

    /// How spot rows are split across CSV files
    #[arg(long, value_enum)]
    pub csv_layout: Option<CsvLayout>,

    /// Format of the summary printed at the end
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
}

impl ScrapeArgs {
    pub fn mode(&self) -> ScrapeMode {
        ScrapeMode::from_sample_flag(!self.full)
    }

    /// Load the configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::from_env()?,
        };
        self.apply(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.crawler.base_url.clone_from(url);
        }
        if let Some(delay) = self.delay {
            config.crawler.delay_secs = delay;
        }
        if let Some(limit) = self.sample_limit {
            config.crawler.sample_limit = limit;
        }
        if let Some(dir) = &self.csv_dir {
            config.output.csv_dir.clone_from(dir);
        }
        if let Some(dir) = &self.workbook_dir {
            config.output.workbook_dir.clone_from(dir);
        }
        if let Some(layout) = self.csv_layout {
            config.output.csv_layout = layout;
        }
    }
}

pub async fn scrape(args: &ScrapeArgs, config: &Config) -> Result<()> {
    let report = pipeline::run(config, args.mode()).await?;
    print_report(&report, args.summary)
}

fn print_report(report: &RunReport, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Text => {
            print!("{}", report.render_text());
            if report.is_partial() {
                println!("\nSome nodes were skipped; exported data is partial.");
            }
        }
        SummaryFormat::Json => {
            println!("{}", report.to_json().context("Failed to serialize report")?);
        }
    }
    Ok(())
}

/// Map a fatal error to the process exit code
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::RootUnavailable { .. }) => EXIT_ROOT_UNAVAILABLE,
        _ => EXIT_FAILURE,
    }
}
