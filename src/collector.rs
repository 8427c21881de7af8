//! Link collection.
//!
//! Walks the configured selectors over a page, drops matches that sit in a
//! navigational zone and turns the rest into [`RawLinkRecord`]s. Every
//! surviving element yields one record; duplicates are kept here and sorted
//! out later by the resolver.

use regex::Regex;

use crate::dom::{ElementHandle, PageRoot};
use crate::naming::derive_name_and_ext;
use crate::patterns::extension_pattern;
use crate::record::{build_tooltip, duplicate_stats, RawLinkRecord};
use crate::settings::Settings;
use crate::size::estimate_size;
use crate::url_utils::{is_ignored_href, make_absolute};
use crate::zone::is_excluded_zone;

/// Attributes holding the link target, in priority order.
const HREF_ATTRIBUTES: &[&str] = &["href", "data-href", "data-download"];

/// How much of an element's markup is kept for diagnostics.
const ELEMENT_SNIPPET_CHARS: usize = 200;

/// A single title lookup strategy.
type TitleStrategy<E> = fn(&E) -> Option<String>;

fn title_strategies<E: ElementHandle>() -> [TitleStrategy<E>; 5] {
    [
        |el: &E| Some(el.visible_text()),
        |el: &E| Some(el.clean_text()),
        |el: &E| el.attr("title"),
        |el: &E| el.attr("aria-label"),
        |el: &E| el.attr("data-title"),
    ]
}

/// Best display title for a link element; empty when nothing is found.
#[must_use]
pub fn link_title<E: ElementHandle>(element: &E) -> String {
    title_strategies::<E>()
        .into_iter()
        .find_map(|strategy| {
            strategy(element)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default()
}

/// First non-empty href-like attribute.
fn link_target<E: ElementHandle>(element: &E) -> Option<String> {
    HREF_ATTRIBUTES
        .iter()
        .find_map(|name| element.attr(name).filter(|v| !v.trim().is_empty()))
}

fn element_snippet<E: ElementHandle>(element: &E) -> String {
    let html = element.outer_html();
    let mut snippet: String = html.chars().take(ELEMENT_SNIPPET_CHARS).collect();
    snippet.push_str("...");
    snippet
}

/// Collect document links from a page.
///
/// Selectors run in settings order, matches in document order. Invalid
/// selectors are logged and skipped.
///
/// # Example
///
/// ```rust
/// use quick_doc::collector::collect;
/// use quick_doc::{dom, Settings};
///
/// let doc = dom::parse(r#"<main><a href="/q1.pdf">Q1 (1 MB)</a></main>
///     <footer><a href="/terms.pdf">Terms</a></footer>"#);
/// let links = collect(&&doc, "https://example.com/", &Settings::default());
///
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url, "https://example.com/q1.pdf");
/// assert_eq!(links[0].estimated_size, Some(1_048_576));
/// ```
#[must_use]
pub fn collect<P: PageRoot>(page: &P, page_url: &str, settings: &Settings) -> Vec<RawLinkRecord> {
    let accept = match extension_pattern(&settings.file_extensions) {
        Ok(Some(pattern)) => pattern,
        Ok(None) => {
            tracing::debug!("no file extensions configured, nothing to collect");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("invalid extension list: {e}");
            return Vec::new();
        }
    };

    let mut links = Vec::new();

    for selector in &settings.link_selectors {
        let Some(elements) = page.query_all(selector) else {
            tracing::warn!("skipping invalid selector: {selector}");
            continue;
        };

        let candidates: Vec<_> = elements
            .into_iter()
            .filter(|el| !is_excluded_zone(el))
            .collect();
        tracing::debug!(
            "selector {selector}: {} elements outside excluded zones",
            candidates.len()
        );

        let before = links.len();
        for (index, element) in candidates.iter().enumerate() {
            if let Some(record) =
                collect_one(element, index, selector, page_url, settings, &accept)
            {
                links.push(record);
            }
        }
        tracing::debug!("selector {selector}: {} links kept", links.len() - before);
    }

    let duplicates = duplicate_stats(&links);
    if !duplicates.is_empty() {
        tracing::debug!("{} URLs found more than once", duplicates.len());
        for (url, count) in &duplicates {
            tracing::trace!("{url} found {count} times");
        }
    }
    tracing::info!("collected {} links from {page_url}", links.len());

    links
}

/// Build the record for one element, or `None` if it is not a document
/// link.
fn collect_one<E: ElementHandle>(
    element: &E,
    index: usize,
    selector: &str,
    page_url: &str,
    settings: &Settings,
    accept: &Regex,
) -> Option<RawLinkRecord> {
    let href = link_target(element)?;
    if is_ignored_href(&href) {
        return None;
    }

    let href = href.trim();
    let url = if settings.make_absolute {
        make_absolute(href, page_url)
    } else {
        href.to_string()
    };

    if !accept.is_match(&url) {
        return None;
    }

    let title = if settings.inner_content {
        link_title(element)
    } else {
        String::new()
    };
    let estimated_size = estimate_size(element);
    let extension = derive_name_and_ext(&url).extension;

    Some(RawLinkRecord {
        tooltip: build_tooltip(&extension, estimated_size),
        url,
        title,
        extension,
        estimated_size,
        page_url: page_url.to_string(),
        selector_used: selector.to_string(),
        element_index: index,
        element: element_snippet(element),
    })
}
