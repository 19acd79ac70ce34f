//! Navbar highlighting and in-page anchor scrolling.

use crate::config::SiteConfig;
use crate::core::{Document, Selector};

const ACTIVE_CLASS: &str = "nav-active";

fn menu_links() -> Selector {
    Selector::within(Selector::class("navbar-menu"), Selector::tag("a"))
}

fn hash_links() -> Selector {
    Selector::within(
        Selector::class("navbar-menu"),
        Selector::tag("a").and(Selector::attr_prefix("href", "#")),
    )
}

/// Marks the menu link pointing at the current page file.
pub fn set_active_nav<D: Document>(doc: &D, page_name: &str) {
    for link in doc.query_all(&menu_links()) {
        let current = doc.attribute(&link, "href").as_deref() == Some(page_name);
        doc.set_class(&link, ACTIVE_CLASS, current);
    }
}

/// Sections tracked by scroll-spy. Empty when the page has no sections or
/// no in-page menu links, in which case nothing needs observing.
pub fn spy_sections<D: Document>(doc: &D) -> Vec<D::Node> {
    if doc.query(&hash_links()).is_none() {
        return Vec::new();
    }
    doc.query_all(&Selector::tag("section").and(Selector::attr("id")))
}

/// Scroll-spy callback for a section crossing the threshold.
pub fn mark_spy_active<D: Document>(doc: &D, section: &D::Node) {
    let Some(id) = doc.attribute(section, "id") else {
        return;
    };
    let target = format!("#{id}");
    for link in doc.query_all(&hash_links()) {
        let current = doc.attribute(&link, "href").as_deref() == Some(target.as_str());
        doc.set_class(&link, ACTIVE_CLASS, current);
    }
}

/// In-page anchors, excluding the bare `#`.
pub fn smooth_scroll_anchors<D: Document>(doc: &D) -> Vec<D::Node> {
    doc.query_all(&Selector::tag("a").and(Selector::attr_prefix("href", "#")))
        .into_iter()
        .filter(|anchor| doc.attribute(anchor, "href").as_deref() != Some("#"))
        .collect()
}

/// Resolves an anchor's `#id` to its target element.
pub fn anchor_target<D: Document>(doc: &D, anchor: &D::Node) -> Option<D::Node> {
    let href = doc.attribute(anchor, "href")?;
    let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
    doc.by_id(id)
}

/// Window offset that puts an element just below the fixed navbar.
pub fn scroll_offset(
    target_top: f64,
    scroll_y: f64,
    nav_height: Option<f64>,
    config: &SiteConfig,
) -> f64 {
    let nav_height = nav_height.unwrap_or(config.fallback_nav_height_px);
    target_top + scroll_y - nav_height - config.smooth_scroll_gap_px
}

/// With reduced motion the root must not animate scrolling.
pub fn disable_smooth_scrolling<D: Document>(doc: &D) {
    doc.set_style(&doc.root(), "scroll-behavior", "auto");
}
