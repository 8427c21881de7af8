//! CSV and HTML export of resolved records.
//!
//! Both formats keep every row, duplicates included, so the output mirrors
//! the page. Paths are built from the settings' media prefixes and the
//! resolved file names.


use crate::record::{DuplicateFlag, LinkRecord};
use crate::settings::Settings;
use crate::size::human_file_size;

/// Default file name for the CSV export.
pub const CSV_EXPORT_FILE_NAME: &str = "document-links-export.csv";

/// Default file name for the HTML export.
pub const HTML_EXPORT_FILE_NAME: &str = "document-links.html";

const CSV_HEADERS: &[&str] = &[
    "original_url",
    "title",
    "slugified_filename_with_ext",
    "slugified_filename_no_ext",
    "media_constant",
    "media_constant_no_ext",
    "link_text",
    "file_size_human",
    "tooltip",
    "extension",
    "status",
    "is_duplicate",
];

const BUTTON_CLASSES: &str = "button-label align-items-center d-inline-flex text-decoration-none text-primary-1 pt-sm-2 pb-sm-2 ps-sm-3 pe-sm-3";

const DOWNLOAD_ICON: &str = r#"<span class="icon icon-arrow-in-down"></span>"#;

/// Quote a CSV cell if it contains a comma, quote or newline.
///
/// # Examples
/// ```
/// use quick_doc::export::escape_csv_cell;
///
/// assert_eq!(escape_csv_cell("plain"), "plain");
/// assert_eq!(escape_csv_cell("a, \"b\""), "\"a, \"\"b\"\"\"");
/// ```
#[must_use]
pub fn escape_csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render records as CSV, one row per record, rows joined by `\n`.
#[must_use]
pub fn to_csv(records: &[LinkRecord], settings: &Settings) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        CSV_HEADERS
            .iter()
            .map(|h| escape_csv_cell(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let prefix = &settings.media_prefix_xlsx;
        let cells = [
            record.url.clone(),
            record.title.clone(),
            record.filename_with_ext.clone(),
            record.filename.clone(),
            format!("{prefix}/{}", record.filename_with_ext),
            format!("{prefix}/{}", record.filename),
            record.title.clone(),
            human_file_size(record.estimated_size),
            record.tooltip.clone(),
            record.extension.clone(),
            "extracted".to_string(),
            record
                .is_duplicate
                .unwrap_or(DuplicateFlag::No)
                .as_str()
                .to_string(),
        ];
        lines.push(
            cells
                .iter()
                .map(|c| escape_csv_cell(c))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Render records as a block of download buttons for the CMS.
///
/// # Example
///
/// ```rust
/// use quick_doc::export::to_html_snippet;
/// use quick_doc::record::LinkRecord;
/// use quick_doc::Settings;
///
/// let record = LinkRecord {
///     title: "Q1 results".to_string(),
///     extension: "pdf".to_string(),
///     filename_with_ext: "q1.pdf".to_string(),
///     ..LinkRecord::default()
/// };
/// let html = to_html_snippet(&[record], &Settings::default());
///
/// assert!(html.contains("<!-- Total: 1 links -->"));
/// assert!(html.contains(r#"title="PDF, Unknown size opens in a new window""#));
/// ```
#[must_use]
pub fn to_html_snippet(records: &[LinkRecord], settings: &Settings) -> String {
    let blocks: Vec<String> = records
        .iter()
        .map(|record| html_block(record, settings))
        .collect();

    format!(
        "<!-- Generated by Quick Doc -->\n<!-- Total: {} links -->\n\n{}",
        records.len(),
        blocks.join("\n\n")
    )
}

fn html_block(record: &LinkRecord, settings: &Settings) -> String {
    let ext = record.extension.to_uppercase();
    let size = human_file_size(record.estimated_size);
    let href = format!("{}/{}", settings.media_prefix_html, record.filename_with_ext);

    let inner = if settings.inner_content && !record.title.is_empty() {
        format!("{DOWNLOAD_ICON} {}", escape_html(&record.title))
    } else {
        DOWNLOAD_ICON.to_string()
    };

    format!(
        "<a href=\"{}\"\n   title=\"{}, {} opens in a new window\"\n   target=\"_blank\"\n   class=\"{BUTTON_CLASSES}\">\n   {inner}\n</a>",
        escape_html(&href),
        escape_html(&ext),
        escape_html(&size),
    )
}
