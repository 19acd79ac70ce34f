//! Reveal-on-scroll bookkeeping.
//!
//! The registry remembers which elements were already tagged, so repainting
//! (language switch, membership render) only hands new elements to the
//! observer.

use std::cell::RefCell;

use crate::core::{Document, Selector};

const REVEAL_CLASS: &str = "reveal";
const IN_VIEW_CLASS: &str = "in-view";

pub fn targets() -> Selector {
    Selector::classes(&[
        "section",
        "card",
        "program-card",
        "facility-item",
        "gallery-item",
        "pricing-card",
        "benefit-card",
        "page-header",
    ])
}

pub struct RevealRegistry<D: Document> {
    seen: RefCell<Vec<D::Node>>,
}

impl<D: Document> Default for RevealRegistry<D> {
    fn default() -> Self {
        Self {
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl<D: Document> RevealRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every unseen target with `reveal`. With reduced motion they are
    /// shown at once and nothing is returned; otherwise the returned nodes
    /// still need observing.
    pub fn register(&self, doc: &D, reduced_motion: bool) -> Vec<D::Node> {
        let mut seen = self.seen.borrow_mut();
        let mut fresh = Vec::new();
        for node in doc.query_all(&targets()) {
            if seen.contains(&node) {
                continue;
            }
            doc.add_class(&node, REVEAL_CLASS);
            if reduced_motion {
                doc.add_class(&node, IN_VIEW_CLASS);
            } else {
                fresh.push(node.clone());
            }
            seen.push(node);
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }
}

/// Observer callback for an element entering the viewport.
pub fn reveal<D: Document>(doc: &D, node: &D::Node) {
    doc.add_class(node, IN_VIEW_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, BODY};

    #[test]
    fn only_new_targets_are_returned() {
        let doc = MemoryDocument::new();
        let registry = RevealRegistry::new();
        let section = doc.add(BODY, "section", &[("class", "section")], "");
        doc.add(BODY, "p", &[], "");

        assert_eq!(registry.register(&doc, false), vec![section]);
        assert!(doc.has_class(&section, "reveal"));
        assert!(!doc.has_class(&section, "in-view"));

        let card = doc.add(section, "div", &[("class", "pricing-card card")], "");
        assert_eq!(registry.register(&doc, false), vec![card]);
        assert_eq!(registry.len(), 2);

        reveal(&doc, &card);
        assert!(doc.has_class(&card, "in-view"));
    }

    #[test]
    fn reduced_motion_shows_everything() {
        let doc = MemoryDocument::new();
        let registry = RevealRegistry::new();
        let header = doc.add(BODY, "header", &[("class", "page-header")], "");

        assert!(registry.register(&doc, true).is_empty());
        assert!(doc.has_class(&header, "reveal"));
        assert!(doc.has_class(&header, "in-view"));
    }
}
