//! Shared navbar/footer fragments.

use std::collections::HashMap;

use crate::config::SiteConfig;
use crate::core::{Browser, Document, Fetcher};

pub const NAVBAR_PLACEHOLDER: &str = "site-navbar";
pub const FOOTER_PLACEHOLDER: &str = "site-footer";

/// Fragments embedded in the page, keyed by `navbar` / `footer`.
pub type PreloadedPartials = HashMap<String, String>;

/// Fills `#site-navbar` and `#site-footer`, then stamps `#current-year`.
///
/// A preloaded fragment wins over the network. Missing placeholders are
/// skipped; failed fetches leave the placeholder as authored.
pub async fn inject_partials<D: Document>(
    doc: &D,
    fetcher: &dyn Fetcher,
    browser: &dyn Browser,
    config: &SiteConfig,
    preloaded: &PreloadedPartials,
) {
    let slots = [
        (NAVBAR_PLACEHOLDER, "navbar", config.navbar_partial_url.as_str()),
        (FOOTER_PLACEHOLDER, "footer", config.footer_partial_url.as_str()),
    ];

    for (placeholder, name, url) in slots {
        let Some(container) = doc.by_id(placeholder) else {
            continue;
        };
        let html = match preloaded.get(name).filter(|html| !html.is_empty()) {
            Some(html) => Some(html.clone()),
            None => match fetcher.fetch_text(url).await {
                Ok(html) => Some(html),
                Err(err) => {
                    tracing::warn!("{name} partial not injected: {err}");
                    None
                }
            },
        };
        if let Some(html) = html.filter(|html| !html.is_empty()) {
            doc.set_inner_html(&container, &html);
        }
    }

    stamp_year(doc, browser);
}

pub fn stamp_year<D: Document>(doc: &D, browser: &dyn Browser) {
    if let Some(year) = doc.by_id("current-year") {
        doc.set_text(&year, &browser.current_year().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryBrowser, MemoryDocument, MemoryFetcher, BODY};
    use futures::executor::block_on;

    #[test]
    fn injects_fetched_and_preloaded_fragments() {
        let doc = MemoryDocument::new();
        let nav = doc.add(BODY, "div", &[("id", NAVBAR_PLACEHOLDER)], "");
        let footer = doc.add(BODY, "div", &[("id", FOOTER_PLACEHOLDER)], "");
        let year = doc.add(BODY, "span", &[("id", "current-year")], "2020");

        let fetcher = MemoryFetcher::new();
        fetcher.respond("partials/footer.html", "<footer>fetched</footer>");
        let preloaded = PreloadedPartials::from([("navbar".to_string(), "<nav>inline</nav>".to_string())]);

        block_on(inject_partials(
            &doc,
            &fetcher,
            &MemoryBrowser::default(),
            &SiteConfig::default(),
            &preloaded,
        ));

        assert_eq!(doc.inner_html(nav).as_deref(), Some("<nav>inline</nav>"));
        assert_eq!(doc.inner_html(footer).as_deref(), Some("<footer>fetched</footer>"));
        assert_eq!(doc.text(&year), "2026");
        assert_eq!(fetcher.requests(), vec!["partials/footer.html"]);
    }

    #[test]
    fn failed_fetch_leaves_placeholder_alone() {
        let doc = MemoryDocument::new();
        let nav = doc.add(BODY, "div", &[("id", NAVBAR_PLACEHOLDER)], "");
        let fetcher = MemoryFetcher::new();
        fetcher.fail("partials/navbar.html");

        block_on(inject_partials(
            &doc,
            &fetcher,
            &MemoryBrowser::default(),
            &SiteConfig::default(),
            &PreloadedPartials::new(),
        ));

        assert_eq!(doc.inner_html(nav), None);
        assert_eq!(fetcher.request_count("partials/footer.html"), 0);
    }
}
