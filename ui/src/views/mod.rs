//! HTML fragments the runtime writes into the page.
//!
//! Each fragment is an ordinary Dioxus component rendered to a string with
//! `dioxus-ssr`, which also takes care of escaping content values.

pub mod membership;
pub mod schedule;
pub mod theme;

use dioxus::prelude::*;

/// Renders `root` with `props` to static HTML.
pub fn render_html<P: Clone + 'static>(root: fn(P) -> Element, props: P) -> String {
    let mut dom = VirtualDom::new_with_props(root, props);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}
