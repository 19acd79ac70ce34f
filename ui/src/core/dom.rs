//! Minimal DOM facade.
//!
//! Everything that paints or reads the page goes through [`Document`], so the
//! pipeline runs against `web_sys` in the browser and against
//! the in-memory `MemoryDocument` under `cargo test`.

use std::fmt;

/// The subset of CSS selectors the site runtime needs.
///
/// Kept as data (not raw strings) so the in-memory document can match them
/// without a CSS engine. [`Selector::to_css`] produces the browser form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
    Tag(String),
    /// `[name]`
    Attr(String),
    /// `[name="value"]`
    AttrEq(String, String),
    /// `[name^="value"]`
    AttrPrefix(String, String),
    /// `[name*="value"]`
    AttrContains(String, String),
    /// Compound selector: both parts must match the same element.
    And(Box<Selector>, Box<Selector>),
    /// Descendant combinator: `outer inner`.
    Within(Box<Selector>, Box<Selector>),
    /// Selector list: `a, b, c`.
    Any(Vec<Selector>),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrEq(name.into(), value.into())
    }

    pub fn attr_prefix(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrPrefix(name.into(), value.into())
    }

    pub fn attr_contains(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrContains(name.into(), value.into())
    }

    pub fn and(self, other: Selector) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn within(outer: Selector, inner: Selector) -> Self {
        Self::Within(Box::new(outer), Box::new(inner))
    }

    pub fn any(list: impl IntoIterator<Item = Selector>) -> Self {
        Self::Any(list.into_iter().collect())
    }

    /// Selector list of ids, e.g. `#cta-call, #hero-call`.
    pub fn ids(ids: &[&str]) -> Self {
        Self::any(ids.iter().map(|id| Self::id(*id)))
    }

    /// Selector list of classes, e.g. `.section, .card`.
    pub fn classes(classes: &[&str]) -> Self {
        Self::any(classes.iter().map(|class| Self::class(*class)))
    }

    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(class) => format!(".{class}"),
            Self::Tag(tag) => tag.clone(),
            Self::Attr(name) => format!("[{name}]"),
            Self::AttrEq(name, value) => format!("[{name}=\"{}\"]", escape_css_string(value)),
            Self::AttrPrefix(name, value) => format!("[{name}^=\"{}\"]", escape_css_string(value)),
            Self::AttrContains(name, value) => {
                format!("[{name}*=\"{}\"]", escape_css_string(value))
            }
            Self::And(left, right) => format!("{}{}", left.to_css(), right.to_css()),
            Self::Within(outer, inner) => format!("{} {}", outer.to_css(), inner.to_css()),
            Self::Any(list) => list
                .iter()
                .map(Selector::to_css)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Operations the runtime performs on the page.
///
/// Mutating methods take `&self`: both implementations are handles onto
/// shared, single-threaded state. Failures of individual DOM calls are
/// swallowed, the same way the page script treats a missing element.
pub trait Document {
    type Node: Clone + PartialEq;

    /// All attached elements matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node>;

    fn query(&self, selector: &Selector) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn by_id(&self, id: &str) -> Option<Self::Node> {
        self.query(&Selector::id(id))
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &Selector) -> Option<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn root(&self) -> Self::Node;
    fn head(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn set_class(&self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Current value of an `input`, `select` or `textarea`.
    fn value(&self, node: &Self::Node) -> String;
    fn checked(&self, node: &Self::Node) -> bool;

    fn focus(&self, node: &Self::Node);
    fn active_element(&self) -> Option<Self::Node>;

    fn title(&self) -> String;
    fn set_title(&self, title: &str);

    /// Creates a detached element.
    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: &Self::Node);
    fn insert_after(&self, reference: &Self::Node, child: &Self::Node);
}

/// Sink for the document-level `lang` / `dir` attributes.
///
/// Separate from [`Document`] so language state can hold it as a trait object.
pub trait RootAttributes {
    fn apply_language(&self, code: &str, dir: &str);
}

impl<D: Document> RootAttributes for D {
    fn apply_language(&self, code: &str, dir: &str) {
        let root = self.root();
        self.set_attribute(&root, "lang", code);
        self.set_attribute(&root, "dir", dir);
    }
}
