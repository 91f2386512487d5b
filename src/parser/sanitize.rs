//! Text sanitization utilities for cleaning extracted page content
//!
//! Spot pages mix non-breaking spaces, stray entities and layout whitespace
//! into every label/value pair. The helpers here turn that into single-line
//! values, or `None` when nothing meaningful is left.

use crate::utils::normalize_whitespace;

/// Clean a text fragment into a single line
///
/// 1. Remove zero-width characters
/// 2. Remove control characters
/// 3. Decode leftover HTML entities
/// 4. Replace non-breaking spaces and collapse all whitespace
///
/// # Examples
///
/// ```
/// use surfatlas::parser::sanitize::clean_text;
///
/// assert_eq!(clean_text("  Right\u{a0}hand \n barrel "), "Right hand barrel");
/// ```
pub fn clean_text(text: &str) -> String {
    let mut result = remove_zero_width(text);
    result = remove_control_chars(&result);
    result = decode_html_entities(&result);
    normalize_whitespace(&result.replace('\u{a0}', " "))
}

/// Cleaned text, or `None` when nothing is left
pub fn non_empty(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    has_content(&cleaned).then_some(cleaned)
}

/// Remove zero-width spaces, directional marks and the BOM
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except newline and tab
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Decode HTML entities that survived markup parsing (double-escaped text)
///
/// # Examples
///
/// ```
/// use surfatlas::parser::sanitize::decode_html_entities;
///
/// assert_eq!(decode_html_entities("Rock &amp; sand"), "Rock & sand");
/// ```
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Check if text contains meaningful content
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Site placeholder shown when nobody has written an "About" text yet
pub fn is_about_placeholder(text: &str) -> bool {
    text.to_lowercase().starts_with("wanna add some info")
}

/// Site placeholder shown instead of a hand-written "At a glance" section
pub fn is_glance_placeholder(text: &str) -> bool {
    text.to_lowercase().contains("automatic build")
}
