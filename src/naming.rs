//! Filename and extension derivation.
//!
//! Turns a document URL into a filesystem-safe slug plus a lowercase
//! extension. The primary path is pure: the same URL always yields the same
//! name.

use chrono::Utc;
use percent_encoding::percent_decode_str;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::patterns::{HYPHEN_RUN, NON_ALPHANUMERIC_RUN, TRAILING_EXTENSION};

/// Base name used when a slug comes out empty.
pub const FALLBACK_BASE_NAME: &str = "file";

/// Slugged base name and extension derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameAndExt {
    /// Slug without extension, never empty.
    pub base_name: String,
    /// Lowercase extension without dot, possibly empty.
    pub extension: String,
}

impl NameAndExt {
    /// `base.ext`, or just `base` without an extension.
    #[must_use]
    pub fn file_name(&self) -> String {
        with_extension(&self.base_name, &self.extension)
    }
}

/// Join a base name and an optional extension.
#[must_use]
pub fn with_extension(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{extension}")
    }
}

/// Derive a slugged base name and extension from a URL.
///
/// Takes the last non-empty path segment, percent-decodes it and splits off
/// a trailing alphanumeric extension. Relative references are handled by
/// looking at the part before any `?` or `#`. If the segment cannot be
/// decoded the whole URL is slugged instead and the extension is left empty.
///
/// # Examples
/// ```
/// use quick_doc::naming::derive_name_and_ext;
///
/// let derived = derive_name_and_ext("https://example.com/files/Annual%20Report%202024.PDF?v=1");
/// assert_eq!(derived.base_name, "annual-report-2024");
/// assert_eq!(derived.extension, "pdf");
///
/// let derived = derive_name_and_ext("https://example.com/");
/// assert_eq!(derived.base_name, "file");
/// assert_eq!(derived.extension, "");
/// ```
#[must_use]
pub fn derive_name_and_ext(url: &str) -> NameAndExt {
    match split_last_segment(url) {
        Some(segment) => {
            let (stem, extension) = split_extension(&segment);
            NameAndExt {
                base_name: slugify(stem),
                extension,
            }
        }
        None => {
            tracing::debug!("falling back to slug of raw URL: {url}");
            NameAndExt {
                base_name: slugify_raw(url),
                extension: String::new(),
            }
        }
    }
}

/// Decoded last path segment, `None` when decoding fails.
fn split_last_segment(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url.split(['?', '#']).next().unwrap_or_default().to_string()
        }
        Err(_) => return None,
    };

    let last = path.split('/').filter(|s| !s.is_empty()).next_back().unwrap_or("");
    let decoded = percent_decode_str(last).decode_utf8().ok()?;

    let cleaned = decoded.split(['?', '#']).next().unwrap_or_default().trim();
    Some(cleaned.to_string())
}

/// Split `name.ext` into the stem and the lowercased extension.
fn split_extension(segment: &str) -> (&str, String) {
    match TRAILING_EXTENSION.captures(segment) {
        Some(caps) => {
            let stem_end = caps.get(0).map_or(segment.len(), |m| m.start());
            let extension = caps
                .get(1)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            (&segment[..stem_end], extension)
        }
        None => (segment, String::new()),
    }
}

/// Slug a piece of text for use as a file name.
///
/// Applies NFKD and drops combining diacritics, replaces every run of
/// non-alphanumeric characters with one hyphen, trims hyphens and
/// lowercases. Empty results become [`FALLBACK_BASE_NAME`].
///
/// # Examples
/// ```
/// use quick_doc::naming::slugify;
///
/// assert_eq!(slugify("Résumé – Q3 (final)"), "resume-q3-final");
/// assert_eq!(slugify("___"), "file");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let stripped: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let hyphenated = NON_ALPHANUMERIC_RUN.replace_all(&stripped, "-");
    let trimmed = hyphenated.trim_matches('-');
    let slug = HYPHEN_RUN.replace_all(trimmed, "-").to_lowercase();

    if slug.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        slug
    }
}

/// Coarse slug of a whole URL string, used when derivation fails.
fn slugify_raw(raw: &str) -> String {
    let slug = NON_ALPHANUMERIC_RUN.replace_all(raw, "-").to_lowercase();
    if slug.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        slug
    }
}

/// Generated name for records with no URL to derive from.
///
/// Uses the record's position when known; otherwise falls back to the
/// current time in milliseconds so the name is still unlikely to collide.
#[must_use]
pub fn fallback_base_name(sequence: Option<usize>) -> String {
    match sequence {
        Some(n) => format!("document-{n}"),
        None => format!("document-{}", Utc::now().timestamp_millis()),
    }
}
