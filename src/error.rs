//! Unified error handling for the surfatlas crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`ScrapeErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use surfatlas::error::{Error, ScrapeErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Retrying: {err}");
//!     } else {
//!         eprintln!("Fatal error ({}): {err}", err.category());
//!     }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

pub use crate::utils::error::{AggregationError, ExportError, FetchError, ParseError};

/// Common trait for all surfatlas error types
///
/// The hierarchy walker uses it to decide whether a failed request is worth
/// another attempt, and failure records carry its category.
pub trait ScrapeErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, status)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Broken aggregation invariants
    Aggregation,
    /// Output file errors
    Export,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Aggregation => "aggregation",
            Self::Export => "export",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScrapeErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::HttpStatus { code } => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::InvalidUrl(_) | Self::Decode(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) => ErrorCategory::Parsing,
            _ => ErrorCategory::Network,
        }
    }
}

impl ScrapeErrorTrait for ParseError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl ScrapeErrorTrait for AggregationError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Aggregation
    }
}

impl ScrapeErrorTrait for ExportError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Export
    }
}

/// Unified error type for the surfatlas crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Aggregation invariant violations
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The root index page could not be fetched or parsed
    #[error("Root page {url} unavailable: {reason}")]
    RootUnavailable { url: String, reason: String },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl ScrapeErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::Aggregation(e) => e.is_recoverable(),
            Self::Export(e) => e.is_recoverable(),
            Self::RootUnavailable { .. } | Self::Config(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Parse(e) => e.category(),
            Self::Aggregation(e) => e.category(),
            Self::Export(e) => e.category(),
            Self::RootUnavailable { .. } => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a root-unavailable error from any underlying cause
    pub fn root_unavailable(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::RootUnavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
