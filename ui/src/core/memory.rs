//! In-memory platform doubles.
//!
//! These back the native test suite: a tiny element arena implementing
//! [`Document`], a canned-response [`Fetcher`] that counts requests, and
//! recording [`Browser`] / [`Toaster`] implementations.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use super::dom::{Document, Selector};
use super::fetch::{FetchError, Fetcher};
use super::platform::{Browser, ResolvedUrl, Toaster};
use super::storage::KeyValueStore;

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    pub tag: String,
    pub parent: Option<NodeId>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub inner_html: Option<String>,
    pub style: BTreeMap<String, String>,
    pub value: String,
    pub checked: bool,
}

/// Element arena. Node `0` is `<html>`, `1` is `<head>`, `2` is `<body>`.
/// Query results follow creation order, which stands in for document order.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<MemoryElement>>,
    title: RefCell<String>,
    focused: Cell<Option<NodeId>>,
}

pub const ROOT: NodeId = 0;
pub const HEAD: NodeId = 1;
pub const BODY: NodeId = 2;

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let element = |tag: &str, parent: Option<NodeId>| MemoryElement {
            tag: tag.to_string(),
            parent,
            ..MemoryElement::default()
        };
        Self {
            nodes: RefCell::new(vec![
                element("html", None),
                element("head", Some(ROOT)),
                element("body", Some(ROOT)),
            ]),
            title: RefCell::new(String::new()),
            focused: Cell::new(None),
        }
    }

    /// Appends `<tag attrs…>text</tag>` under `parent` and returns its id.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(MemoryElement {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: text.to_string(),
            ..MemoryElement::default()
        });
        nodes.len() - 1
    }

    pub fn element(&self, node: NodeId) -> MemoryElement {
        self.nodes.borrow()[node].clone()
    }

    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow()[node].inner_html.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node].style.get(property).cloned()
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node].value = value.to_string();
    }

    pub fn set_checked(&self, node: NodeId, checked: bool) {
        self.nodes.borrow_mut()[node].checked = checked;
    }

    fn is_attached(nodes: &[MemoryElement], mut node: NodeId) -> bool {
        loop {
            if node == ROOT {
                return true;
            }
            match nodes[node].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn matches(nodes: &[MemoryElement], node: NodeId, selector: &Selector) -> bool {
        let element = &nodes[node];
        let attr = |name: &str| element.attributes.get(name);
        match selector {
            Selector::Id(id) => attr("id").is_some_and(|v| v == id),
            Selector::Class(class) => {
                attr("class").is_some_and(|v| v.split_whitespace().any(|c| c == class))
            }
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Selector::Attr(name) => attr(name).is_some(),
            Selector::AttrEq(name, value) => attr(name).is_some_and(|v| v == value),
            Selector::AttrPrefix(name, value) => attr(name).is_some_and(|v| v.starts_with(value)),
            Selector::AttrContains(name, value) => attr(name).is_some_and(|v| v.contains(value)),
            Selector::And(left, right) => {
                Self::matches(nodes, node, left) && Self::matches(nodes, node, right)
            }
            Selector::Within(outer, inner) => {
                if !Self::matches(nodes, node, inner) {
                    return false;
                }
                let mut cursor = element.parent;
                while let Some(parent) = cursor {
                    if Self::matches(nodes, parent, outer) {
                        return true;
                    }
                    cursor = nodes[parent].parent;
                }
                false
            }
            Selector::Any(list) => list.iter().any(|s| Self::matches(nodes, node, s)),
        }
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&mut MemoryElement) -> R) -> R {
        f(&mut self.nodes.borrow_mut()[node])
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node]
            .attributes
            .get("class")
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn write_classes(&self, node: NodeId, classes: &[String]) {
        self.with_node(node, |el| {
            el.attributes.insert("class".into(), classes.join(" "));
        });
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        (0..nodes.len())
            .filter(|&idx| Self::is_attached(&nodes, idx) && Self::matches(&nodes, idx, selector))
            .collect()
    }

    fn closest(&self, node: &NodeId, selector: &Selector) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if Self::matches(&nodes, current, selector) {
                return Some(current);
            }
            cursor = nodes[current].parent;
        }
        None
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if current == *ancestor {
                return true;
            }
            cursor = nodes[current].parent;
        }
        false
    }

    fn root(&self) -> NodeId {
        ROOT
    }

    fn head(&self) -> Option<NodeId> {
        Some(HEAD)
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[*node].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.with_node(*node, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        self.with_node(*node, |el| {
            el.attributes.remove(name);
        });
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(*node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.write_classes(*node, &classes);
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(*node);
        classes.retain(|c| c != class);
        self.write_classes(*node, &classes);
    }

    fn text(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].text.clone()
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.with_node(*node, |el| {
            el.text = text.to_string();
            el.inner_html = None;
        });
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.with_node(*node, |el| el.inner_html = Some(html.to_string()));
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.with_node(*node, |el| {
            el.style.insert(property.to_string(), value.to_string());
        });
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].value.clone()
    }

    fn checked(&self, node: &NodeId) -> bool {
        self.nodes.borrow()[*node].checked
    }

    fn focus(&self, node: &NodeId) {
        self.focused.set(Some(*node));
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused.get().or(Some(BODY))
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(MemoryElement {
            tag: tag.to_ascii_lowercase(),
            ..MemoryElement::default()
        });
        Some(nodes.len() - 1)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        self.with_node(*child, |el| el.parent = Some(*parent));
    }

    fn insert_before(&self, parent: &NodeId, child: &NodeId, _reference: &NodeId) {
        self.append_child(parent, child);
    }

    fn insert_after(&self, reference: &NodeId, child: &NodeId) {
        let parent = self.nodes.borrow()[*reference].parent;
        self.with_node(*child, |el| el.parent = parent);
    }
}

/// Canned responses keyed by URL. Unknown URLs fail with a 404.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: RefCell<HashMap<String, Result<String, FetchError>>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: impl Into<String>) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Ok(body.into()));
    }

    pub fn fail(&self, url: &str) {
        self.responses.borrow_mut().insert(
            url.to_string(),
            Err(FetchError::Network {
                url: url.to_string(),
                reason: "connection refused".into(),
            }),
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        self.requests.borrow_mut().push(url.to_string());
        let outcome = self
            .responses
            .borrow()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            });
        future::ready(outcome).boxed_local()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Records navigation and clipboard traffic.
#[derive(Debug)]
pub struct MemoryBrowser {
    pub pathname: RefCell<String>,
    pub reduced_motion: Cell<bool>,
    pub clipboard_fails: Cell<bool>,
    pub opened: RefCell<Vec<String>>,
    pub navigations: RefCell<Vec<String>>,
    pub clipboard: RefCell<Vec<String>>,
}

impl Default for MemoryBrowser {
    fn default() -> Self {
        Self::at("/index.html")
    }
}

impl MemoryBrowser {
    pub fn at(pathname: &str) -> Self {
        Self {
            pathname: RefCell::new(pathname.to_string()),
            reduced_motion: Cell::new(false),
            clipboard_fails: Cell::new(false),
            opened: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            clipboard: RefCell::new(Vec::new()),
        }
    }
}

const ORIGIN: &str = "https://forcegym.test";

/// Enough of URL resolution against an `http(s)` page for link decisions.
/// Backslashes count as slashes and default ports are dropped; dot segments
/// are left as written.
fn resolve_against(origin: &str, base_path: &str, href: &str) -> Option<ResolvedUrl> {
    let href = href.trim().replace('\\', "/");
    let (base_scheme, _) = origin.split_once("://")?;
    let has_scheme = matches!(
        href.split_once(':'),
        Some((scheme, _)) if !scheme.is_empty() && !scheme.contains(['/', '?', '#'])
    );
    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("{base_scheme}://{rest}")
    } else if has_scheme {
        href
    } else {
        let path = href.split(['?', '#']).next().unwrap_or_default();
        let pathname = if path.is_empty() {
            base_path.to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            let dir = base_path.rfind('/').map_or("/", |end| &base_path[..=end]);
            format!("{dir}{path}")
        };
        return Some(ResolvedUrl {
            origin: origin.to_string(),
            pathname,
        });
    };

    let Some((scheme, rest)) = absolute.split_once("://") else {
        return Some(ResolvedUrl {
            origin: "null".to_string(),
            pathname: String::new(),
        });
    };
    let scheme = scheme.to_ascii_lowercase();
    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let mut host = rest[..host_end].to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "https" => ":443",
        "http" => ":80",
        _ => "",
    };
    if !default_port.is_empty() && host.ends_with(default_port) {
        host.truncate(host.len() - default_port.len());
    }
    let path = rest[host_end..].split(['?', '#']).next().unwrap_or_default();
    Some(ResolvedUrl {
        origin: format!("{scheme}://{host}"),
        pathname: if path.is_empty() { "/".to_string() } else { path.to_string() },
    })
}

impl Browser for MemoryBrowser {
    fn pathname(&self) -> String {
        self.pathname.borrow().clone()
    }

    fn origin(&self) -> String {
        ORIGIN.to_string()
    }

    fn resolve(&self, href: &str) -> Option<ResolvedUrl> {
        resolve_against(ORIGIN, &self.pathname(), href)
    }

    fn open_in_new_tab(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn save_data(&self) -> bool {
        false
    }

    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), String>> {
        let outcome = if self.clipboard_fails.get() {
            Err("clipboard permission denied".to_string())
        } else {
            self.clipboard.borrow_mut().push(text.to_string());
            Ok(())
        };
        future::ready(outcome).boxed_local()
    }

    fn current_year(&self) -> i32 {
        2026
    }
}

#[derive(Debug, Default)]
pub struct MemoryToaster {
    pub messages: RefCell<Vec<String>>,
}

impl MemoryToaster {
    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Toaster for MemoryToaster {
    fn show(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
