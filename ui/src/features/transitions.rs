//! Page enter/leave transitions and internal-link interception.

use crate::core::{Browser, Document};

const TRANSITION: &str = "page-transition";
const LOADING: &str = "page-loading";
const READY: &str = "page-ready";
const NAVIGATING: &str = "is-navigating";

/// Attributes of a clicked anchor relevant to interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkClick<'a> {
    pub href: &'a str,
    pub new_tab: bool,
    pub download: bool,
}

/// Returns the URL to navigate to when the click should be animated, or
/// `None` to leave the browser's default behaviour alone.
pub fn navigation_target<B: Browser + ?Sized>(
    link: LinkClick<'_>,
    browser: &B,
) -> Option<String> {
    let href = link.href;
    let skipped = href.is_empty()
        || ["#", "mailto:", "tel:", "wa.me"]
            .iter()
            .any(|prefix| href.starts_with(prefix))
        || link.new_tab
        || link.download;
    if skipped {
        return None;
    }
    let url = browser.resolve(href)?;
    if url.origin != browser.origin() {
        return None;
    }
    (url.pathname.ends_with(".html") || url.pathname.ends_with('/')).then(|| href.to_string())
}

pub fn mark_loading<D: Document>(doc: &D) {
    if let Some(body) = doc.body() {
        doc.add_class(&body, TRANSITION);
        doc.add_class(&body, LOADING);
    }
}

/// Runs two animation frames after [`mark_loading`].
pub fn mark_ready<D: Document>(doc: &D) {
    if let Some(body) = doc.body() {
        doc.remove_class(&body, LOADING);
        doc.add_class(&body, READY);
    }
}

pub fn mark_navigating<D: Document>(doc: &D) {
    if let Some(body) = doc.body() {
        doc.add_class(&body, NAVIGATING);
    }
}

/// `pageshow` from the back/forward cache: undo the leave animation.
pub fn restore<D: Document>(doc: &D) {
    if let Some(body) = doc.body() {
        doc.remove_class(&body, LOADING);
        doc.remove_class(&body, NAVIGATING);
        doc.add_class(&body, READY);
    }
}
