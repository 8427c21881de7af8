//! Record types for extraction output.
//!
//! `RawLinkRecord` is what the collector sees in the page: one entry per
//! matching element. `LinkRecord` adds the normalized URL and derived file
//! name and is what resolution, export and downloads operate on. The
//! request/response pair models the exchange with the page context.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::naming::{self, NameAndExt};
use crate::settings::Settings;
use crate::size::human_file_size;
use crate::url_utils::normalize_url;

/// Whether a resolved record repeats an earlier record's resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateFlag {
    Yes,
    No,
}

impl DuplicateFlag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// One element match as found in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLinkRecord {
    /// Href after absolutization (when enabled).
    pub url: String,

    /// Display text; empty when titles are disabled.
    pub title: String,

    /// Lowercase extension without dot.
    pub extension: String,

    /// Size in bytes, if the page advertised one.
    pub estimated_size: Option<u64>,

    /// `"PDF, 2.5 MB, opens in a new window"`.
    pub tooltip: String,

    /// Page the link was found on.
    pub page_url: String,

    /// Selector that matched the element.
    pub selector_used: String,

    /// Index of the element among that selector's kept matches.
    pub element_index: usize,

    /// Start of the element's markup, for diagnostics.
    pub element: String,
}

/// A discovered document reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub url: String,

    /// Canonical identity key (see [`crate::url_utils::normalize_url`]).
    pub url_normalized: String,

    pub title: String,

    pub extension: String,

    /// Slug derived from the URL before any collision suffix.
    pub base_name: String,

    /// Final slug without extension.
    pub filename: String,

    /// Final slug with extension.
    pub filename_with_ext: String,

    pub estimated_size: Option<u64>,

    pub tooltip: String,

    /// Set by [`crate::resolver::resolve`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<DuplicateFlag>,

    pub page_url: String,
}

impl LinkRecord {
    /// Build a record from a raw match.
    ///
    /// `index` is the record's position in the batch; it names records that
    /// have no URL to derive a file name from.
    #[must_use]
    pub fn from_raw(raw: RawLinkRecord, page_url: &str, index: usize) -> Self {
        let url_normalized = normalize_url(&raw.url, page_url);
        let NameAndExt {
            base_name,
            extension,
        } = if raw.url.trim().is_empty() {
            NameAndExt {
                base_name: naming::fallback_base_name(Some(index)),
                extension: String::new(),
            }
        } else {
            naming::derive_name_and_ext(&raw.url)
        };

        let estimated_size = raw.estimated_size.filter(|s| *s > 0);
        let tooltip = if raw.tooltip.is_empty() {
            build_tooltip(&extension, estimated_size)
        } else {
            raw.tooltip
        };

        Self {
            filename_with_ext: naming::with_extension(&base_name, &extension),
            filename: base_name.clone(),
            base_name,
            extension,
            url: raw.url,
            url_normalized,
            title: raw.title,
            estimated_size,
            tooltip,
            is_duplicate: None,
            page_url: page_url.to_string(),
        }
    }
}

/// Turn raw matches into records, preserving order and duplicates.
#[must_use]
pub fn normalize_links(raw: Vec<RawLinkRecord>, page_url: &str) -> Vec<LinkRecord> {
    raw.into_iter()
        .enumerate()
        .map(|(index, raw)| LinkRecord::from_raw(raw, page_url, index))
        .collect()
}

/// Tooltip text: kind, size, and the new-window notice.
///
/// # Examples
/// ```
/// use quick_doc::record::build_tooltip;
///
/// assert_eq!(build_tooltip("pdf", Some(2_621_440)), "PDF, 2.5 MB, opens in a new window");
/// assert_eq!(build_tooltip("", None), "FILE, size not available, opens in a new window");
/// ```
#[must_use]
pub fn build_tooltip(extension: &str, size: Option<u64>) -> String {
    let kind = if extension.is_empty() {
        "FILE".to_string()
    } else {
        extension.to_uppercase()
    };
    let size = match size.filter(|s| *s > 0) {
        Some(_) => human_file_size(size),
        None => "size not available".to_string(),
    };
    format!("{kind}, {size}, opens in a new window")
}

/// Raw URLs that occur more than once, with their counts, in first-seen
/// order.
#[must_use]
pub fn duplicate_stats(links: &[RawLinkRecord]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for link in links {
        let count = counts.entry(link.url.as_str()).or_insert(0);
        if *count == 0 {
            order.push(link.url.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|url| {
            let count = counts.get(url).copied().unwrap_or(0);
            (count > 1).then(|| (url.to_string(), count))
        })
        .collect()
}

/// Request sent to the page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub settings: Settings,
    pub page_url: String,
}

/// Answer from the page context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResponse {
    pub success: bool,

    pub links: Vec<RawLinkRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,

    /// RFC 3339 time the extraction finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    pub total_found: usize,

    /// Raw URLs seen more than once with their counts.
    pub duplicate_stats: Vec<(String, usize)>,
}

impl ExtractionResponse {
    /// Successful response carrying every raw match.
    #[must_use]
    pub fn success(links: Vec<RawLinkRecord>, page_url: &str) -> Self {
        Self {
            success: true,
            total_found: links.len(),
            duplicate_stats: duplicate_stats(&links),
            links,
            error: None,
            page_url: Some(page_url.to_string()),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// Failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// The links of a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Communication`] for `success: false`, carrying the
    /// page's error message.
    pub fn into_links(self) -> Result<Vec<RawLinkRecord>> {
        if self.success {
            Ok(self.links)
        } else {
            Err(Error::Communication(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Failed to extract links".to_string()),
            ))
        }
    }
}

/// Overview of an extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// Sum of the known sizes, `None` when no size is known.
    pub estimated_total_size: Option<u64>,
    pub page_url: Option<String>,
}

impl Summary {
    #[must_use]
    pub fn of(records: &[LinkRecord]) -> Self {
        let total_size: u64 = records
            .iter()
            .filter_map(|r| r.estimated_size)
            .fold(0, u64::saturating_add);

        Self {
            total: records.len(),
            estimated_total_size: (total_size > 0).then_some(total_size),
            page_url: records.first().map(|r| r.page_url.clone()),
        }
    }

    /// Total size for display, `Unknown` when nothing is known.
    #[must_use]
    pub fn size_text(&self) -> String {
        match self.estimated_total_size {
            Some(_) => human_file_size(self.estimated_total_size),
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/reports/";

    fn raw(url: &str) -> RawLinkRecord {
        RawLinkRecord {
            url: url.to_string(),
            ..RawLinkRecord::default()
        }
    }

    #[test]
    fn test_from_raw_derives_everything() {
        let record = LinkRecord::from_raw(
            RawLinkRecord {
                url: "https://Example.com:443/reports/Q1%20Results.pdf#x".to_string(),
                title: "Q1 results".to_string(),
                estimated_size: Some(2048),
                ..RawLinkRecord::default()
            },
            PAGE,
            0,
        );

        assert_eq!(record.url_normalized, "https://example.com/reports/Q1%20Results.pdf");
        assert_eq!(record.base_name, "q1-results");
        assert_eq!(record.filename, "q1-results");
        assert_eq!(record.filename_with_ext, "q1-results.pdf");
        assert_eq!(record.extension, "pdf");
        assert_eq!(record.tooltip, "PDF, 2.0 KB, opens in a new window");
        assert_eq!(record.is_duplicate, None);
        assert_eq!(record.page_url, PAGE);
    }

    #[test]
    fn test_from_raw_without_url_gets_generated_name() {
        let record = LinkRecord::from_raw(raw("  "), PAGE, 7);
        assert_eq!(record.filename, "document-7");
        assert_eq!(record.filename_with_ext, "document-7");
        assert_eq!(record.estimated_size, None);
    }

    #[test]
    fn test_zero_size_is_unknown() {
        let record = LinkRecord::from_raw(
            RawLinkRecord {
                estimated_size: Some(0),
                ..raw("/a.pdf")
            },
            PAGE,
            0,
        );
        assert_eq!(record.estimated_size, None);
        assert_eq!(record.tooltip, "PDF, size not available, opens in a new window");
    }

    #[test]
    fn test_normalize_links_keeps_order_and_duplicates() {
        let records = normalize_links(vec![raw("/a.pdf"), raw("/b.pdf"), raw("/a.pdf")], PAGE);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url_normalized, records[2].url_normalized);
        assert_eq!(records[1].filename, "b");
    }

    #[test]
    fn test_duplicate_stats() {
        let stats = duplicate_stats(&[raw("/a.pdf"), raw("/b.pdf"), raw("/a.pdf"), raw("/a.pdf")]);
        assert_eq!(stats, vec![("/a.pdf".to_string(), 3)]);
    }

    #[test]
    fn test_response_into_links() {
        let ok = ExtractionResponse::success(vec![raw("/a.pdf"), raw("/a.pdf")], PAGE);
        assert_eq!(ok.total_found, 2);
        assert_eq!(ok.duplicate_stats.len(), 1);
        assert!(ok.timestamp.is_some());
        assert_eq!(ok.into_links().unwrap().len(), 2);

        let err = ExtractionResponse::failure("Receiving end does not exist").into_links();
        assert!(matches!(err, Err(Error::Communication(ref m)) if m == "Receiving end does not exist"));

        let err = ExtractionResponse::default().into_links();
        assert!(matches!(err, Err(Error::Communication(ref m)) if m == "Failed to extract links"));
    }

    #[test]
    fn test_response_wire_format() {
        let json = r#"{"success": false, "error": "boom"}"#;
        let response: ExtractionResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.links.is_empty());

        let out = serde_json::to_string(&ExtractionResponse::success(vec![raw("/a.pdf")], PAGE)).unwrap();
        assert!(out.contains("\"totalFound\":1"));
        assert!(out.contains("\"pageUrl\""));
    }

    #[test]
    fn test_duplicate_flag_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DuplicateFlag::Yes).unwrap(), "\"yes\"");
        assert_eq!(DuplicateFlag::No.as_str(), "no");
    }

    #[test]
    fn test_summary() {
        let mut records = normalize_links(vec![raw("/a.pdf"), raw("/b.pdf")], PAGE);
        assert_eq!(Summary::of(&records).size_text(), "Unknown");

        records[0].estimated_size = Some(1024);
        records[1].estimated_size = Some(1024);
        let summary = Summary::of(&records);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.size_text(), "2.0 KB");
        assert_eq!(summary.page_url.as_deref(), Some(PAGE));
    }
}
