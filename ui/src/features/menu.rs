//! Mobile navigation menu with a focus trap.

use std::cell::RefCell;

use crate::core::{Document, Selector};

pub const TOGGLER_ID: &str = "navToggler";
pub const MENU_ID: &str = "navbar-menu";
const OPEN_CLASS: &str = "active";

/// State of the `#navToggler` / `#navbar-menu` pair.
pub struct MobileMenu<D: Document> {
    pub toggler: D::Node,
    pub menu: D::Node,
    previously_focused: RefCell<Option<D::Node>>,
}

impl<D: Document> MobileMenu<D> {
    /// `None` when the page has no menu (e.g. the navbar partial failed).
    pub fn find(doc: &D) -> Option<Self> {
        Some(Self {
            toggler: doc.by_id(TOGGLER_ID)?,
            menu: doc.by_id(MENU_ID)?,
            previously_focused: RefCell::new(None),
        })
    }

    pub fn is_open(&self, doc: &D) -> bool {
        doc.has_class(&self.menu, OPEN_CLASS)
    }

    /// Toggler click. Opening focuses the first link; closing this way hands
    /// focus back to the toggler.
    pub fn toggle(&self, doc: &D) {
        if self.is_open(doc) {
            doc.remove_class(&self.menu, OPEN_CLASS);
            doc.set_attribute(&self.toggler, "aria-expanded", "false");
            doc.focus(&self.toggler);
            return;
        }
        doc.add_class(&self.menu, OPEN_CLASS);
        doc.set_attribute(&self.toggler, "aria-expanded", "true");
        *self.previously_focused.borrow_mut() = doc.active_element();
        if let Some(first) = self.links(doc).into_iter().next() {
            doc.focus(&first);
        }
    }

    /// Closes and restores focus to whatever had it before opening.
    pub fn close(&self, doc: &D) {
        doc.remove_class(&self.menu, OPEN_CLASS);
        doc.set_attribute(&self.toggler, "aria-expanded", "false");
        if let Some(previous) = self.previously_focused.borrow_mut().take() {
            doc.focus(&previous);
        }
    }

    /// Click inside the menu: following a link closes it.
    pub fn on_menu_click(&self, doc: &D, target: &D::Node) {
        if self.is_open(doc) && doc.closest(target, &Selector::tag("a")).is_some() {
            self.close(doc);
        }
    }

    /// Any document click: outside both menu and toggler closes it.
    pub fn on_document_click(&self, doc: &D, target: &D::Node) {
        if self.is_open(doc)
            && !doc.contains(&self.menu, target)
            && !doc.contains(&self.toggler, target)
        {
            self.close(doc);
        }
    }

    pub fn on_escape(&self, doc: &D) {
        if self.is_open(doc) {
            self.close(doc);
        }
    }

    /// Tab handling while open. Returns `true` when focus was wrapped and the
    /// key event's default must be prevented.
    pub fn on_tab(&self, doc: &D, shift: bool) -> bool {
        if !self.is_open(doc) {
            return false;
        }
        let focusable = self.focusable(doc);
        let (Some(first), Some(last)) = (focusable.first(), focusable.last()) else {
            return false;
        };
        let active = doc.active_element();
        if shift && active.as_ref() == Some(first) {
            doc.focus(last);
            true
        } else if !shift && active.as_ref() == Some(last) {
            doc.focus(first);
            true
        } else {
            false
        }
    }

    fn links(&self, doc: &D) -> Vec<D::Node> {
        self.within_menu(doc, &Selector::tag("a"))
    }

    fn focusable(&self, doc: &D) -> Vec<D::Node> {
        let selector = Selector::any([
            Selector::tag("a"),
            Selector::tag("button"),
            Selector::attr_eq("tabindex", "0"),
        ]);
        self.within_menu(doc, &selector)
    }

    fn within_menu(&self, doc: &D, selector: &Selector) -> Vec<D::Node> {
        doc.query_all(selector)
            .into_iter()
            .filter(|node| *node != self.menu && doc.contains(&self.menu, node))
            .collect()
    }
}
