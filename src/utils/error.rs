//! Error types for the surfatlas crawler
//!
//! This module defines the domain-specific error types used by the fetcher,
//! parser, aggregator and exporters.

use thiserror::Error;

use crate::parser::PageKind;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, reset, body read)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// URL could not be resolved against the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                code: status.as_u16(),
            }
        } else {
            Self::Network(err)
        }
    }
}

/// Errors that can occur during parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// Markup has neither a recognizable child list nor any record fields
    #[error("Malformed {kind} page: {reason}")]
    Malformed { kind: PageKind, reason: String },
}

impl ParseError {
    pub fn malformed(kind: PageKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

/// Invariant violations detected after aggregation
///
/// These indicate a bug in the aggregator, not a runtime condition.
#[derive(Error, Debug, PartialEq)]
pub enum AggregationError {
    /// Stored spot count disagrees with the children
    #[error("Spot count mismatch in '{area}': stored {stored}, counted {counted}")]
    SpotCountMismatch {
        area: String,
        stored: usize,
        counted: usize,
    },

    /// Summary bounds fall outside valid latitude/longitude ranges
    #[error("Coordinate bounds out of range in '{area}'")]
    BoundsOutOfRange { area: String },
}

/// Errors that can occur while writing output files
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure (directory creation, file open, write)
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failure
    #[error("CSV failure on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Workbook serialization failure
    #[error("Workbook failure on {path}: {source}")]
    Workbook {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}
