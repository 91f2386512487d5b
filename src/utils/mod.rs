//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Maximum length of a sanitized file name component
pub const MAX_FILENAME_LEN: usize = 50;

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Sanitize a name for use as a file name component
///
/// Runs of characters outside `[A-Za-z0-9_]` collapse to a single `_`, and the
/// result is cut to [`MAX_FILENAME_LEN`] characters.
pub fn sanitize_filename(name: &str) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re =
        INVALID_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("Invalid regex pattern"));

    let cleaned = re.replace_all(name, "_");
    let cleaned: String = cleaned.chars().take(MAX_FILENAME_LEN).collect();
    if cleaned.is_empty() {
        String::from("unnamed")
    } else {
        cleaned
    }
}

/// Resolve a possibly relative link against a base URL
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Last non-empty path segment of a URL, used when a page has no title
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(|s| s.replace(['_', '-'], " "))
}
