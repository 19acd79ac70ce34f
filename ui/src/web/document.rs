//! [`Document`] over the live DOM.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::core::{Document, Selector};

pub struct WebDocument {
    document: web_sys::Document,
    root: Element,
}

impl WebDocument {
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let root = document.document_element()?;
        Some(Self { document, root })
    }

    pub fn raw(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn query_all(&self, selector: &Selector) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&selector.to_css()) else {
            tracing::debug!("invalid selector {selector}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|idx| list.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, selector: &Selector) -> Option<Element> {
        self.document.query_selector(&selector.to_css()).ok().flatten()
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn closest(&self, node: &Element, selector: &Selector) -> Option<Element> {
        node.closest(&selector.to_css()).ok().flatten()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        node.set_attribute(name, value).ok();
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        node.remove_attribute(name).ok();
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        node.class_list().add_1(class).ok();
    }

    fn remove_class(&self, node: &Element, class: &str) {
        node.class_list().remove_1(class).ok();
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.style().set_property(property, value).ok();
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>()
            .is_some_and(HtmlInputElement::checked)
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.focus().ok();
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        parent.append_child(child).ok();
    }

    fn insert_before(&self, parent: &Element, child: &Element, reference: &Element) {
        let reference: &web_sys::Node = reference;
        parent.insert_before(child, Some(reference)).ok();
    }

    fn insert_after(&self, reference: &Element, child: &Element) {
        reference.after_with_node_1(child).ok();
    }
}
