//! Best-effort file size estimation.
//!
//! Pages advertise sizes in many ways: data attributes, a "(2.4 MB)" next
//! to the link, a `title` tooltip, a hidden `.file-size` span. Each of those
//! is an independent strategy; they run in a fixed order and the first one
//! that finds something wins. Nothing is ever guessed: no match means
//! `None`.

use regex::Regex;

use crate::dom::ElementHandle;
use crate::patterns::{ELEMENT_TEXT_SIZE_PATTERNS, SIZE_WITH_UNIT};

/// Attributes that carry a raw byte count.
const SIZE_ATTRIBUTES: &[&str] = &[
    "data-size",
    "data-filesize",
    "data-bytes",
    "data-file-size",
    "size",
    "filesize",
];

/// Descendants that commonly hold a size label.
const SIZE_MARKER_SELECTOR: &str = "[data-size], [data-filesize], .file-size, .size";

/// How many ancestors are searched for size text.
const MAX_ANCESTOR_DEPTH: usize = 3;

/// A single size lookup strategy.
pub type SizeStrategy<E> = fn(&E) -> Option<u64>;

/// The strategies in the order they are tried, with a name for logging.
#[must_use]
pub fn strategies<E: ElementHandle>() -> [(&'static str, SizeStrategy<E>); 6] {
    [
        ("attribute", from_attributes::<E>),
        ("ancestor", from_ancestors::<E>),
        ("sibling", from_siblings::<E>),
        ("element-text", from_element_text::<E>),
        ("label", from_labels::<E>),
        ("marker", from_marker::<E>),
    ]
}

/// Estimate the size in bytes of the document an element links to.
///
/// # Example
///
/// ```rust
/// use quick_doc::dom::{self, DomElement};
/// use quick_doc::size::estimate_size;
///
/// let doc = dom::parse(r#"<li><a href="/r.pdf">Report</a> (2.5 MB)</li>"#);
/// let link = DomElement::from_selection(&doc.select("a")).unwrap();
/// assert_eq!(estimate_size(&link), Some(2_621_440));
/// ```
#[must_use]
pub fn estimate_size<E: ElementHandle>(element: &E) -> Option<u64> {
    strategies::<E>().into_iter().find_map(|(name, strategy)| {
        let size = strategy(element)?;
        tracing::trace!("size {size} found by {name} strategy");
        Some(size)
    })
}

/// 1. Integer byte count in a known size attribute.
pub fn from_attributes<E: ElementHandle>(element: &E) -> Option<u64> {
    let raw = SIZE_ATTRIBUTES.iter().find_map(|name| {
        element.attr(name).filter(|v| !v.is_empty())
    })?;
    parse_leading_integer(&raw).filter(|n| *n > 0)
}

/// 2. Size text in up to three ancestors, nearest first.
pub fn from_ancestors<E: ElementHandle>(element: &E) -> Option<u64> {
    let mut current = element.parent();
    let mut depth = 0;

    while let Some(ancestor) = current {
        if depth >= MAX_ANCESTOR_DEPTH {
            break;
        }
        if let Some(size) = match_size(&SIZE_WITH_UNIT, &ancestor.clean_text()) {
            return Some(size);
        }
        current = ancestor.parent();
        depth += 1;
    }

    None
}

/// 3. Size text in sibling elements.
pub fn from_siblings<E: ElementHandle>(element: &E) -> Option<u64> {
    let parent = element.parent()?;
    parent
        .children()
        .iter()
        .filter(|sibling| !sibling.same_node(element))
        .find_map(|sibling| match_size(&SIZE_WITH_UNIT, &sibling.clean_text()))
}

/// 4. The element's own text, against increasingly permissive patterns.
pub fn from_element_text<E: ElementHandle>(element: &E) -> Option<u64> {
    let text = element.clean_text();
    ELEMENT_TEXT_SIZE_PATTERNS
        .iter()
        .find_map(|pattern| match_size(pattern, &text))
}

/// 5. `aria-label` and `title` attributes.
pub fn from_labels<E: ElementHandle>(element: &E) -> Option<u64> {
    let combined = format!(
        "{} {}",
        element.attr("aria-label").unwrap_or_default(),
        element.attr("title").unwrap_or_default()
    );
    match_size(&SIZE_WITH_UNIT, &combined)
}

/// 6. A size-marker descendant.
pub fn from_marker<E: ElementHandle>(element: &E) -> Option<u64> {
    let marker = element.query_first(SIZE_MARKER_SELECTOR)?;
    match_size(&SIZE_WITH_UNIT, &marker.clean_text())
}

/// Apply one size pattern to a text.
///
/// Group 1 is the number (commas allowed), group 2 the optional unit.
#[must_use]
pub fn match_size(pattern: &Regex, text: &str) -> Option<u64> {
    let caps = pattern.captures(text)?;
    let number = caps.get(1)?.as_str().replace(',', "");
    let value: f64 = number.parse().ok()?;
    let unit = caps.get(2).map_or("B", |m| m.as_str());
    convert_to_bytes(value, unit)
}

/// Convert a value with a unit to whole bytes.
///
/// Units use powers of 1024. Unknown units count as bytes. Zero, negative
/// and non-finite values yield `None`.
#[must_use]
pub fn convert_to_bytes(value: f64, unit: &str) -> Option<u64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let multiplier: f64 = match unit.to_ascii_uppercase().as_str() {
        "TB" => 1024.0_f64.powi(4),
        "GB" => 1024.0_f64.powi(3),
        "MB" => 1024.0_f64.powi(2),
        "KB" => 1024.0,
        _ => 1.0,
    };

    let bytes = (value * multiplier).round();
    if bytes < 1.0 || bytes >= u64::MAX as f64 {
        return None;
    }
    Some(bytes as u64)
}

/// Parse leading decimal digits after optional whitespace.
fn parse_leading_integer(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Human-readable size, e.g. `2.5 MB`; `Unknown size` when absent or zero.
#[must_use]
pub fn human_file_size(bytes: Option<u64>) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let Some(bytes) = bytes.filter(|b| *b > 0) else {
        return "Unknown size".to_string();
    };

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.1} {}", UNITS[unit])
}
