//! Scroll-driven chrome: navbar shadow, back-to-top button, progress bar.

use crate::config::SiteConfig;
use crate::core::{Document, Selector};
use crate::i18n::Lang;
use crate::t;

pub const BACK_TO_TOP_ID: &str = "back-to-top";
const PROGRESS_CLASS: &str = "scroll-progress";

/// A snapshot of the window's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Percentage of the scrollable distance covered; 0 when nothing scrolls.
    pub fn progress_percent(&self) -> f64 {
        let scrollable = self.scroll_height - self.client_height;
        if scrollable <= 0.0 {
            return 0.0;
        }
        (self.scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
    }
}

pub fn apply_scroll_ui<D: Document>(doc: &D, metrics: ScrollMetrics, config: &SiteConfig) {
    if let Some(navbar) = doc.query(&Selector::class("navbar")) {
        doc.set_class(&navbar, "navbar-scrolled", metrics.scroll_y > config.navbar_scrolled_px);
    }
    if let Some(button) = doc.by_id(BACK_TO_TOP_ID) {
        doc.set_class(&button, "visible", metrics.scroll_y > config.back_to_top_px);
    }
    let bar = Selector::within(Selector::class(PROGRESS_CLASS), Selector::tag("span"));
    if let Some(span) = doc.query(&bar) {
        doc.set_style(&span, "width", &format!("{}%", metrics.progress_percent()));
    }
}

/// Adds the back-to-top button unless the page already has one. Returns the
/// button only when it was created here.
pub fn ensure_back_to_top<D: Document>(doc: &D, lang: Lang) -> Option<D::Node> {
    if doc.by_id(BACK_TO_TOP_ID).is_some() {
        return None;
    }
    let body = doc.body()?;
    let button = doc.create_element("button")?;
    doc.set_attribute(&button, "id", BACK_TO_TOP_ID);
    doc.set_attribute(&button, "class", "back-to-top");
    doc.set_attribute(&button, "aria-label", &t!(lang, "back-to-top"));
    doc.set_text(&button, "↑");
    doc.append_child(&body, &button);
    Some(button)
}

pub fn ensure_scroll_progress<D: Document>(doc: &D) {
    if doc.query(&Selector::class(PROGRESS_CLASS)).is_some() {
        return;
    }
    let (Some(body), Some(bar), Some(span)) = (
        doc.body(),
        doc.create_element("div"),
        doc.create_element("span"),
    ) else {
        return;
    };
    doc.set_attribute(&bar, "class", PROGRESS_CLASS);
    doc.set_attribute(&bar, "aria-hidden", "true");
    doc.append_child(&bar, &span);
    doc.append_child(&body, &bar);
}
