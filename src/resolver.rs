//! Duplicate resolution.
//!
//! Assigns every record a final file name. Records that point at the same
//! resource (same normalized URL) share the first record's name and are
//! flagged as duplicates; distinct resources whose names collide get
//! numbered suffixes in first-seen order.

use std::collections::{HashMap, HashSet};

use crate::naming::{derive_name_and_ext, with_extension};
use crate::record::{DuplicateFlag, LinkRecord};
use crate::url_utils::normalize_url;

/// Counts describing a resolved batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveStats {
    pub total: usize,
    pub unique_urls: usize,
    pub duplicates: usize,
}

impl ResolveStats {
    #[must_use]
    pub fn of(resolved: &[LinkRecord]) -> Self {
        let duplicates = resolved
            .iter()
            .filter(|r| r.is_duplicate == Some(DuplicateFlag::Yes))
            .count();
        Self {
            total: resolved.len(),
            unique_urls: resolved.len() - duplicates,
            duplicates,
        }
    }
}

/// Resolve final file names and duplicate flags.
///
/// Output has the same length and order as the input. Resolution reads
/// each record's `base_name`, so resolving an already resolved batch gives
/// the same result.
///
/// # Example
///
/// ```rust
/// use quick_doc::record::{normalize_links, RawLinkRecord};
/// use quick_doc::resolver::resolve;
///
/// let raw = ["/a/report.pdf", "/b/report.pdf", "/a/report.pdf"]
///     .iter()
///     .map(|u| RawLinkRecord { url: u.to_string(), ..Default::default() })
///     .collect();
/// let resolved = resolve(normalize_links(raw, "https://example.com/"));
///
/// let names: Vec<_> = resolved.iter().map(|r| r.filename_with_ext.as_str()).collect();
/// assert_eq!(names, ["report.pdf", "report-1.pdf", "report.pdf"]);
/// ```
#[must_use]
pub fn resolve(records: Vec<LinkRecord>) -> Vec<LinkRecord> {
    // normalized URL -> (filename, filename_with_ext) of its first record
    let mut first_by_url: HashMap<String, (String, String)> = HashMap::new();
    // base name -> number of distinct URLs that claimed it
    let mut claimants: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    let resolved: Vec<LinkRecord> = records
        .into_iter()
        .map(|mut record| {
            fill_missing_keys(&mut record);

            if let Some((filename, with_ext)) = first_by_url.get(&record.url_normalized) {
                record.filename.clone_from(filename);
                record.filename_with_ext.clone_from(with_ext);
                record.is_duplicate = Some(DuplicateFlag::Yes);
                return record;
            }

            let count = claimants.entry(record.base_name.clone()).or_insert(0);
            let mut n = *count;
            let (filename, with_ext) = loop {
                let filename = if n == 0 {
                    record.base_name.clone()
                } else {
                    format!("{}-{n}", record.base_name)
                };
                let with_ext = with_extension(&filename, &record.extension);
                if !taken.contains(&with_ext) {
                    break (filename, with_ext);
                }
                n += 1;
            };
            *count += 1;

            taken.insert(with_ext.clone());
            first_by_url.insert(
                record.url_normalized.clone(),
                (filename.clone(), with_ext.clone()),
            );

            record.filename = filename;
            record.filename_with_ext = with_ext;
            record.is_duplicate = Some(DuplicateFlag::No);
            record
        })
        .collect();

    let stats = ResolveStats::of(&resolved);
    tracing::debug!(
        "resolved {} records: {} unique URLs, {} duplicates",
        stats.total,
        stats.unique_urls,
        stats.duplicates
    );

    resolved
}

/// Records built by hand may lack the derived keys.
fn fill_missing_keys(record: &mut LinkRecord) {
    if record.base_name.is_empty() {
        let derived = derive_name_and_ext(&record.url);
        record.base_name = derived.base_name;
        if record.extension.is_empty() {
            record.extension = derived.extension;
        }
    }
    if record.url_normalized.is_empty() {
        record.url_normalized = normalize_url(&record.url, "");
    }
}

/// One record per normalized URL, first occurrence kept.
#[must_use]
pub fn unique_by_normalized_url(records: &[LinkRecord]) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.url_normalized.as_str()))
        .cloned()
        .collect()
}
