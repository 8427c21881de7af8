//! # quick-doc
//!
//! Finds downloadable document links (PDF, Office files, text exports) on a
//! web page and prepares them for bulk download and CMS import.
//!
//! Links inside headers, footers, navigation and similar boilerplate are
//! skipped. Every remaining link gets a canonical URL key, a slugged file
//! name and a best-effort size. Links to the same resource share one name
//! and one download; different resources whose names collide get numbered
//! suffixes.
//!
//! ## Quick Start
//!
//! ```rust
//! use quick_doc::{extract_links, resolve_links, Settings};
//!
//! let html = r#"<html><body>
//!   <nav><a href="/brochure.pdf">Brochure</a></nav>
//!   <main>
//!     <a href="/2024/report.pdf">Annual report (2.5 MB)</a>
//!     <a href="/2023/report.pdf">Annual report 2023</a>
//!   </main>
//! </body></html>"#;
//!
//! let page = "https://example.com/investors/";
//! let response = extract_links(html, page, &Settings::default());
//! let records = resolve_links(response.into_links()?, page);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].filename_with_ext, "report.pdf");
//! assert_eq!(records[1].filename_with_ext, "report-1.pdf");
//! # Ok::<(), quick_doc::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - [`collector`]: selector walk, zone filter, raw records
//! - [`url_utils`], [`naming`], [`size`]: per-link metadata
//! - [`resolver`]: final names and duplicate flags
//! - [`export`], [`download`]: CSV/HTML output and the download plan
//! - [`session`]: request/timeout handling around all of the above

mod error;
mod patterns;

/// DOM capability traits and their `dom_query` implementation.
pub mod dom;

/// Navigational/boilerplate zone classification.
pub mod zone;

/// Selector walk producing raw link records.
pub mod collector;

/// URL resolution and the canonical comparison key.
pub mod url_utils;

/// File name and extension derivation.
pub mod naming;

/// File size estimation.
pub mod size;

/// Record types and the page request/response pair.
pub mod record;

/// Duplicate resolution and final file names.
pub mod resolver;

/// CSV and HTML export.
pub mod export;

/// Download plan and driver.
pub mod download;

/// Extraction session with timeout handling.
pub mod session;

/// Settings and their persisted form.
pub mod settings;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Logging setup for binaries.
pub mod logging;

// Public API - re-exports
pub use error::{Error, Result};
pub use record::{ExtractionResponse, LinkRecord, RawLinkRecord};
pub use settings::{Settings, StoredSettings};

/// Collects document links from an HTML page.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `page_url` - Address the page was loaded from, used to resolve
///   relative links
/// * `settings` - Extraction settings
///
/// # Returns
///
/// A successful [`ExtractionResponse`] carrying every matching link, with
/// duplicates preserved in page order.
#[must_use]
pub fn extract_links(html: &str, page_url: &str, settings: &Settings) -> ExtractionResponse {
    let doc = dom::parse(html);
    let links = collector::collect(&&doc, page_url, settings);
    ExtractionResponse::success(links, page_url)
}

/// Collects document links from raw page bytes with automatic encoding
/// detection.
///
/// # Example
///
/// ```rust
/// use quick_doc::{extract_links_bytes, Settings};
///
/// let html = b"<meta charset=\"windows-1252\"><a href=\"/r.pdf\">\x93Report\x94</a>";
/// let response = extract_links_bytes(html, "https://example.com/", &Settings::default());
/// assert_eq!(response.links[0].title, "\u{201C}Report\u{201D}");
/// ```
#[must_use]
pub fn extract_links_bytes(html: &[u8], page_url: &str, settings: &Settings) -> ExtractionResponse {
    let html = encoding::decode_page(html);
    extract_links(&html, page_url, settings)
}

/// Turns raw links into resolved records ready for export and download.
#[must_use]
pub fn resolve_links(raw: Vec<RawLinkRecord>, page_url: &str) -> Vec<LinkRecord> {
    resolver::resolve(record::normalize_links(raw, page_url))
}
