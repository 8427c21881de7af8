//! URL Utility Functions
//!
//! Resolution of hrefs against the page URL and the canonical comparison key
//! used for duplicate detection.

use url::Url;

use crate::patterns::SLASH_RUN;

/// Returns true for hrefs that never point at a document: in-page anchors
/// and `javascript:` pseudo-URLs.
#[must_use]
pub fn is_ignored_href(href: &str) -> bool {
    let href = href.trim();
    href.starts_with('#')
        || href
            .get(..11)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

/// Resolve `href` against `page_url`.
///
/// # Returns
/// * The absolute URL string, or the trimmed `href` if resolution fails
///
/// # Examples
/// ```
/// use quick_doc::url_utils::make_absolute;
///
/// assert_eq!(
///     make_absolute("files/a.pdf", "https://example.com/docs/index.html"),
///     "https://example.com/docs/files/a.pdf"
/// );
/// assert_eq!(make_absolute("/a.pdf", "not a url"), "/a.pdf");
/// ```
#[must_use]
pub fn make_absolute(href: &str, page_url: &str) -> String {
    let href = href.trim();

    match resolve(href, page_url) {
        Some(url) => url.to_string(),
        None => {
            tracing::warn!("failed to make absolute URL: {href}");
            href.to_string()
        }
    }
}

fn resolve(url_str: &str, base_str: &str) -> Option<Url> {
    match Url::parse(base_str.trim()) {
        Ok(base) => base.join(url_str).ok(),
        Err(_) => Url::parse(url_str).ok(),
    }
}

/// Canonical comparison key for a URL.
///
/// The URL is resolved against `page_url`, then rebuilt as
/// `scheme://host[:port]path[?query]` with:
/// - scheme and host lowercased
/// - port dropped when it is the scheme default (80/443)
/// - repeated `/` collapsed and a trailing `/` removed (root kept)
/// - query kept verbatim, fragment dropped
///
/// Path case and the http/https distinction are preserved. Malformed input
/// comes back trimmed and otherwise unchanged.
///
/// # Examples
/// ```
/// use quick_doc::url_utils::normalize_url;
///
/// let page = "https://example.com/";
/// assert_eq!(
///     normalize_url("https://EXAMPLE.com:443//docs//report.pdf/#p2", page),
///     "https://example.com/docs/report.pdf"
/// );
/// assert_eq!(normalize_url("/a.pdf?v=2", page), "https://example.com/a.pdf?v=2");
/// ```
#[must_use]
pub fn normalize_url(url_str: &str, page_url: &str) -> String {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Some(url) = resolve(trimmed, page_url) else {
        return trimmed.to_string();
    };

    // `Url` already lowercases scheme/host and hides default ports.
    let host = url.host_str().unwrap_or("");
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();

    let mut path = SLASH_RUN.replace_all(url.path(), "/").into_owned();
    if path.is_empty() {
        path.push('/');
    }
    if path != "/" && path.ends_with('/') {
        path.pop();
    }

    let query = url
        .query()
        .filter(|q| !q.is_empty())
        .map(|q| format!("?{q}"))
        .unwrap_or_default();

    format!("{}://{host}{port}{path}{query}", url.scheme())
}

/// Check if two URLs refer to the same resource on a page.
#[must_use]
pub fn urls_match(url1: &str, url2: &str, page_url: &str) -> bool {
    normalize_url(url1, page_url) == normalize_url(url2, page_url)
}
