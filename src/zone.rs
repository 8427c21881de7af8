//! Bad Zone Classification
//!
//! Identifies navigational and boilerplate regions (headers, footers, nav
//! bars, breadcrumbs, legal link lists) whose links should not be
//! collected. The check is intentionally over-inclusive: a missed footer is
//! acceptable, an occasional excluded content link is the known cost.

use crate::dom::ElementHandle;

/// Selector patterns for navigational/boilerplate regions.
pub static BAD_ZONE_SELECTORS: &[&str] = &[
    // Structural elements and landmark roles
    "header",
    "footer",
    "nav",
    "aside",
    r#"[role="banner"]"#,
    r#"[role="contentinfo"]"#,
    r#"[role="navigation"]"#,
    r#"[role="complementary"]"#,
    // Site chrome class names
    ".site-header",
    ".site-footer",
    ".global-header",
    ".global-footer",
    ".header",
    ".footer",
    ".navigation",
    ".nav",
    ".navbar",
    ".nav-bar",
    ".site-nav",
    ".main-nav",
    ".primary-nav",
    ".secondary-nav",
    ".breadcrumb",
    ".breadcrumbs",
    ".page-header",
    ".page-footer",
    ".top-bar",
    ".bottom-bar",
    ".masthead",
    ".site-info",
    // Site chrome ids
    "#header",
    "#footer",
    "#navigation",
    "#nav",
    "#navbar",
    "#site-header",
    "#site-footer",
    "#main-nav",
    "#primary-nav",
    // Corporate footers
    ".main-footer",
    ".footer-section",
    ".footer-content",
    ".footer-wrapper",
    ".footer-links",
    ".footer-nav",
    ".footer-menu",
    r#"[class*="footer"]"#,
    r#"[id*="footer"]"#,
    ".legal-links",
    ".corporate-links",
    ".utility-links",
];

/// Tags at which the ancestor walk stops (they are not checked).
const WALK_BOUNDARY_TAGS: &[&str] = &["body", "html"];

/// Check a single element against every bad-zone pattern.
///
/// Patterns the element cannot evaluate count as non-matches.
#[must_use]
pub fn matches_bad_zone<E: ElementHandle>(element: &E) -> bool {
    BAD_ZONE_SELECTORS
        .iter()
        .any(|pattern| element.matches_selector(pattern) == Some(true))
}

/// Returns true if `element`, or any ancestor below `body`, is a bad zone.
///
/// # Example
///
/// ```rust
/// use quick_doc::dom::{self, DomElement};
/// use quick_doc::zone::is_excluded_zone;
///
/// let doc = dom::parse(r#"<body><footer><a href="/t.pdf">Terms</a></footer>
///     <main><a href="/r.pdf">Report</a></main></body>"#);
///
/// let footer_link = DomElement::from_selection(&doc.select("footer a")).unwrap();
/// let main_link = DomElement::from_selection(&doc.select("main a")).unwrap();
/// assert!(is_excluded_zone(&footer_link));
/// assert!(!is_excluded_zone(&main_link));
/// ```
#[must_use]
pub fn is_excluded_zone<E: ElementHandle>(element: &E) -> bool {
    let mut current = Some(element.clone());

    while let Some(el) = current {
        if el
            .tag_name()
            .is_some_and(|tag| WALK_BOUNDARY_TAGS.contains(&tag.as_str()))
        {
            return false;
        }
        if matches_bad_zone(&el) {
            return true;
        }
        current = el.parent();
    }

    false
}
