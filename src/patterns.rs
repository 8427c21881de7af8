//! Compiled regex patterns for link acceptance, naming and size detection.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

// =============================================================================
// Size Detection Patterns
// =============================================================================

/// `<number> <unit>` with a decimal number and a KB/MB/GB/TB/byte(s) unit.
pub static SIZE_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(KB|MB|GB|TB|bytes?)").expect("SIZE_WITH_UNIT regex")
});

/// Comma-grouped byte count, e.g. `1,048,576 bytes`.
pub static GROUPED_BYTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d{3})*)\s*bytes?").expect("GROUPED_BYTES regex")
});

/// Labelled size, e.g. `Size: 3 MB`.
pub static SIZE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)size[:\s]*(\d+(?:\.\d+)?)\s*(KB|MB|GB|TB|B)").expect("SIZE_LABEL regex")
});

/// Short unit suffix ending on a word boundary, e.g. `740KB` or `12 B`.
pub static SHORT_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*([KMGT]?B)\b").expect("SHORT_UNIT regex")
});

/// Patterns tried against an element's own text, most specific first.
pub static ELEMENT_TEXT_SIZE_PATTERNS: LazyLock<[&'static Regex; 4]> = LazyLock::new(|| {
    [
        &*SIZE_WITH_UNIT,
        &*GROUPED_BYTES,
        &*SIZE_LABEL,
        &*SHORT_UNIT,
    ]
});

// =============================================================================
// Naming Patterns
// =============================================================================

/// Trailing `.ext` of a path segment.
pub static TRAILING_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.([0-9A-Za-z]+)$").expect("TRAILING_EXTENSION regex")
});

/// Runs of characters that are not ASCII letters or digits.
pub static NON_ALPHANUMERIC_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]+").expect("NON_ALPHANUMERIC_RUN regex")
});

/// Repeated hyphens.
pub static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("HYPHEN_RUN regex"));

// =============================================================================
// URL Patterns
// =============================================================================

/// Two or more consecutive path separators.
pub static SLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("SLASH_RUN regex"));

// =============================================================================
// Charset Patterns
// =============================================================================

/// `<meta charset="...">`.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("META_CHARSET regex")
});

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
pub static META_CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>;]+)"#)
        .expect("META_CONTENT_TYPE_CHARSET regex")
});

/// Build the accepted-extension pattern for a settings extension list.
///
/// The extension must close the URL, optionally followed by a query string.
/// Matching is case-insensitive. An empty list yields `None` (nothing is
/// accepted).
///
/// # Errors
///
/// Returns [`crate::Error::Pattern`] if the generated pattern fails to
/// compile.
pub fn extension_pattern(extensions: &[String]) -> Result<Option<Regex>> {
    if extensions.is_empty() {
        return Ok(None);
    }

    let alternatives = extensions
        .iter()
        .map(|ext| regex::escape(ext))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = Regex::new(&format!(r"(?i)\.({alternatives})(\?.*)?$"))?;
    Ok(Some(pattern))
}
