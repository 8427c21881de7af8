//! DOM Capability Adapter
//!
//! The zone classifier, collector and size estimator never touch a parser
//! directly. They work against two small traits:
//!
//! - [`ElementHandle`]: attribute/text access, tree navigation and
//!   selector probing for a single element
//! - [`PageRoot`]: document-wide selector queries
//!
//! [`DomElement`] implements them over a `dom_query` document, which is
//! what the library uses for real HTML. Tests can plug in synthetic trees.

use dom_query::{Matcher, NodeRef, Selection};

// Re-export core types for external use
pub use dom_query::Document;

/// Tags whose text never counts as element text.
const NON_TEXT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Read-only view of one element.
pub trait ElementHandle: Clone {
    /// Attribute value, if the attribute is present.
    fn attr(&self, name: &str) -> Option<String>;

    /// Lowercase tag name.
    fn tag_name(&self) -> Option<String>;

    /// Parent element. `None` at the top of the element tree.
    fn parent(&self) -> Option<Self>;

    /// Direct element children in document order.
    fn children(&self) -> Vec<Self>;

    /// Text with script/style/noscript content removed and whitespace
    /// collapsed to single spaces.
    fn clean_text(&self) -> String;

    /// Approximation of rendered text: like [`ElementHandle::clean_text`]
    /// but also skipping hidden subtrees.
    fn visible_text(&self) -> String;

    /// Serialized element, including the element's own tag.
    fn outer_html(&self) -> String;

    /// Probe the element against a CSS selector.
    ///
    /// `None` means the selector could not be evaluated here (unsupported or
    /// malformed syntax). Callers treat that as "no match".
    fn matches_selector(&self, pattern: &str) -> Option<bool>;

    /// First descendant matching `selector`.
    fn query_first(&self, selector: &str) -> Option<Self>;

    /// Identity comparison.
    fn same_node(&self, other: &Self) -> bool;
}

/// Document-level queries.
pub trait PageRoot {
    type Element: ElementHandle;

    /// All elements matching `selector` in document order, or `None` when
    /// the selector does not parse.
    fn query_all(&self, selector: &str) -> Option<Vec<Self::Element>>;
}

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// An element of a parsed `dom_query` document.
#[derive(Clone, Copy)]
pub struct DomElement<'a> {
    node: NodeRef<'a>,
}

impl<'a> DomElement<'a> {
    #[must_use]
    pub fn new(node: NodeRef<'a>) -> Self {
        Self { node }
    }

    /// First element of a selection.
    #[must_use]
    pub fn from_selection(sel: &Selection<'a>) -> Option<Self> {
        sel.nodes().first().copied().map(Self::new)
    }

    fn selection(&self) -> Selection<'a> {
        Selection::from(self.node)
    }

    /// Concatenate descendant text nodes, skipping any text that sits under
    /// an element rejected by `skip` (this element included).
    fn collect_text(&self, skip: impl Fn(&NodeRef<'a>) -> bool) -> String {
        let mut raw = String::new();
        for node in self.node.descendants() {
            if !node.is_text() {
                continue;
            }

            let mut hidden = false;
            let mut current = node.parent();
            while let Some(anc) = current {
                if anc.is_element() && skip(&anc) {
                    hidden = true;
                    break;
                }
                if anc.id == self.node.id {
                    break;
                }
                current = anc.parent();
            }

            if !hidden {
                raw.push_str(&node.text());
            }
        }
        collapse_whitespace(&raw)
    }
}

fn has_non_text_tag(node: &NodeRef) -> bool {
    node.node_name()
        .is_some_and(|tag| NON_TEXT_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)))
}

fn is_hidden(node: &NodeRef) -> bool {
    if has_non_text_tag(node) {
        return true;
    }
    if node
        .node_name()
        .is_some_and(|tag| tag.eq_ignore_ascii_case("template"))
    {
        return true;
    }

    let sel = Selection::from(*node);
    if sel.has_attr("hidden") {
        return true;
    }
    sel.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

/// Collapse runs of whitespace into single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<'a> ElementHandle for DomElement<'a> {
    fn attr(&self, name: &str) -> Option<String> {
        self.selection().attr(name).map(|v| v.to_string())
    }

    fn tag_name(&self) -> Option<String> {
        self.node.node_name().map(|t| t.to_ascii_lowercase())
    }

    fn parent(&self) -> Option<Self> {
        self.node
            .parent()
            .filter(|p| p.is_element())
            .map(Self::new)
    }

    fn children(&self) -> Vec<Self> {
        self.selection()
            .children()
            .nodes()
            .iter()
            .copied()
            .filter(|n| n.is_element())
            .map(Self::new)
            .collect()
    }

    fn clean_text(&self) -> String {
        self.collect_text(has_non_text_tag)
    }

    fn visible_text(&self) -> String {
        self.collect_text(is_hidden)
    }

    fn outer_html(&self) -> String {
        self.selection().html().to_string()
    }

    fn matches_selector(&self, pattern: &str) -> Option<bool> {
        // `Selection::is` swallows parse errors, so validate first to keep
        // "unknown" distinct from "no match".
        Matcher::new(pattern).ok()?;
        Some(self.selection().is(pattern))
    }

    fn query_first(&self, selector: &str) -> Option<Self> {
        Matcher::new(selector).ok()?;
        Self::from_selection(&self.selection().select(selector))
    }

    fn same_node(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }
}

impl<'a> PageRoot for &'a Document {
    type Element = DomElement<'a>;

    fn query_all(&self, selector: &str) -> Option<Vec<DomElement<'a>>> {
        Matcher::new(selector).ok()?;
        let doc: &'a Document = *self;
        Some(
            doc.select(selector)
                .nodes()
                .iter()
                .copied()
                .map(DomElement::new)
                .collect(),
        )
    }
}

/// In-memory element tree used by unit tests that want exact control over
/// selector support.
#[cfg(test)]
pub(crate) mod synthetic {
    use super::ElementHandle;
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    struct Node {
        tag: String,
        attrs: Vec<(String, String)>,
        text: String,
        parent: RefCell<Weak<Node>>,
        children: RefCell<Vec<Rc<Node>>>,
    }

    #[derive(Clone)]
    pub(crate) struct FakeElement(Rc<Node>);

    impl FakeElement {
        pub(crate) fn new(tag: &str, attrs: &[(&str, &str)], text: &str) -> Self {
            Self(Rc::new(Node {
                tag: tag.to_string(),
                attrs: attrs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                text: text.to_string(),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }))
        }

        pub(crate) fn append(&self, child: &FakeElement) {
            *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
            self.0.children.borrow_mut().push(Rc::clone(&child.0));
        }

        fn text_content(&self) -> String {
            let mut text = self.0.text.clone();
            for child in self.children() {
                text.push_str(&child.text_content());
            }
            text
        }
    }

    impl ElementHandle for FakeElement {
        fn attr(&self, name: &str) -> Option<String> {
            self.0
                .attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }

        fn tag_name(&self) -> Option<String> {
            Some(self.0.tag.clone())
        }

        fn parent(&self) -> Option<Self> {
            self.0.parent.borrow().upgrade().map(FakeElement)
        }

        fn children(&self) -> Vec<Self> {
            self.0
                .children
                .borrow()
                .iter()
                .map(|c| FakeElement(Rc::clone(c)))
                .collect()
        }

        fn clean_text(&self) -> String {
            super::collapse_whitespace(&self.text_content())
        }

        fn visible_text(&self) -> String {
            self.clean_text()
        }

        fn outer_html(&self) -> String {
            format!("<{0}>{1}</{0}>", self.0.tag, self.text_content())
        }

        // Only bare tags, `.class` and `#id` are understood; anything else
        // is reported as unknown.
        fn matches_selector(&self, pattern: &str) -> Option<bool> {
            if let Some(class) = pattern.strip_prefix('.') {
                return Some(
                    self.attr("class")
                        .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
                );
            }
            if let Some(id) = pattern.strip_prefix('#') {
                return Some(self.attr("id").as_deref() == Some(id));
            }
            if pattern.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Some(self.0.tag == pattern);
            }
            None
        }

        fn query_first(&self, selector: &str) -> Option<Self> {
            for child in self.children() {
                if child.matches_selector(selector) == Some(true) {
                    return Some(child);
                }
                if let Some(found) = child.query_first(selector) {
                    return Some(found);
                }
            }
            None
        }

        fn same_node(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }
}
