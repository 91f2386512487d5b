//! surfatlas - Surf spot catalog crawler
//!
//! Walks the continent → country → zone → spot hierarchy of a surf spot
//! catalog and exports the result as per-region CSV files and per-continent
//! workbooks.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Throttled fetching and hierarchy traversal
//! - [`parser`] - HTML parsing for index and spot pages
//! - [`models`] - Catalog tree and record types
//! - [`aggregate`] - Bottom-up summaries for countries and zones
//! - [`export`] - CSV and workbook writers
//! - [`pipeline`] - End-to-end run and its report
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use surfatlas::config::Config;
//! use surfatlas::models::ScrapeMode;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let report = surfatlas::pipeline::run(&config, ScrapeMode::Sample).await?;
//!     println!("{}", report.render_text());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod crawler;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, CsvLayout};
    pub use crate::crawler::{HierarchyWalker, HttpFetcher, PageSource, RawPage};
    pub use crate::error::{Error, ErrorCategory, Result, ScrapeErrorTrait};
    pub use crate::models::{Area, Continent, ScrapeMode, ScrapeTree, Spot};
    pub use crate::parser::{PageKind, PageParser};
    pub use crate::pipeline::RunReport;
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use models::{ScrapeMode, ScrapeTree};
