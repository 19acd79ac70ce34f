//! Paints a content document onto the page.
//!
//! [`update_ui`] is idempotent: running it again with the same document
//! leaves the page unchanged. Values that are missing or empty never blank
//! what the page already shows.

use crate::config::SiteConfig;
use crate::content::{present, ContentDocument, SiteContent};
use crate::core::format::{tel_href, whatsapp_link_for};
use crate::core::{Browser, Document, Selector, Toaster};
use crate::i18n::Lang;
use crate::partials::stamp_year;
use crate::t;

pub const I18N_TEXT_ATTR: &str = "data-i18n";
pub const I18N_ALT_ATTR: &str = "data-i18n-alt";
pub const I18N_ARIA_ATTR: &str = "data-i18n-aria";
pub const FLAG_ATTR: &str = "data-flag";
pub const COPY_VALUE_ATTR: &str = "data-copy-value";
pub const LANGUAGE_TOGGLE_ID: &str = "language-toggle";

const PHONE_TARGETS: [&str; 4] = ["cta-call", "hero-call", "footer-phone", "contact-phone"];
const PHONE_TEXT_TARGETS: [&str; 2] = ["footer-phone", "contact-phone"];
const WHATSAPP_TARGETS: [&str; 2] = ["cta-whatsapp", "hero-whatsapp"];
const WHATSAPP2_TARGETS: [&str; 2] = ["cta-whatsapp2", "hero-whatsapp2"];
const DIRECTIONS_TARGETS: [&str; 3] = ["cta-directions", "hero-directions", "location-directions"];

/// What a copy button puts on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopySource {
    Phone,
    Phone2,
    Address,
}

const COPY_BUTTONS: [(&str, CopySource); 5] = [
    ("copy-phone", CopySource::Phone),
    ("copy-phone-contact", CopySource::Phone),
    ("copy-phone2", CopySource::Phone2),
    ("copy-address", CopySource::Address),
    ("copy-address-contact", CopySource::Address),
];

pub fn update_ui<D: Document>(
    doc: &D,
    content: &ContentDocument,
    lang: Lang,
    config: &SiteConfig,
    browser: &dyn Browser,
) {
    bind_markers(doc, content);

    let site = content.site();
    bind_contact_links(doc, site, config);
    bind_social(doc, site);
    bind_seo(doc, site);
    bind_flags(doc, site);
    bind_copy_buttons(doc, site);

    if let Some(label) = doc.by_id("lang-toggle-label") {
        doc.set_text(&label, lang.toggle_label());
    }
    stamp_year(doc, browser);
}

fn bind_markers<D: Document>(doc: &D, content: &ContentDocument) {
    for node in doc.query_all(&Selector::attr(I18N_TEXT_ATTR)) {
        if let Some(value) = lookup(doc, &node, I18N_TEXT_ATTR, content) {
            doc.set_text(&node, &value);
        }
    }
    for node in doc.query_all(&Selector::attr(I18N_ALT_ATTR)) {
        if let Some(value) = lookup(doc, &node, I18N_ALT_ATTR, content) {
            doc.set_attribute(&node, "alt", &value);
        }
    }
    for node in doc.query_all(&Selector::attr(I18N_ARIA_ATTR)) {
        if let Some(value) = lookup(doc, &node, I18N_ARIA_ATTR, content) {
            doc.set_attribute(&node, "aria-label", &value);
        }
    }
}

fn lookup<D: Document>(
    doc: &D,
    node: &D::Node,
    marker: &str,
    content: &ContentDocument,
) -> Option<String> {
    let path = doc.attribute(node, marker)?;
    content.resolve(path.trim())
}

fn set_href_all<D: Document>(doc: &D, ids: &[&str], href: &str) {
    for node in doc.query_all(&Selector::ids(ids)) {
        doc.set_attribute(&node, "href", href);
    }
}

fn bind_contact_links<D: Document>(doc: &D, site: &SiteContent, config: &SiteConfig) {
    let cc = config.country_code.as_str();
    let phone = present(&site.phone);
    let phone2 = present(&site.phone2);

    if let Some(phone) = phone {
        let tel = tel_href(phone, cc);
        let tel_links = Selector::tag("a").and(Selector::attr_prefix("href", "tel:"));
        for node in doc.query_all(&tel_links) {
            doc.set_attribute(&node, "href", &tel);
        }
        for node in doc.query_all(&Selector::ids(&PHONE_TARGETS)) {
            if doc.tag_name(&node) == "a" {
                doc.set_attribute(&node, "href", &tel);
            }
        }
    }
    if let Some(display) = site.display_phone() {
        for node in doc.query_all(&Selector::ids(&PHONE_TEXT_TARGETS)) {
            doc.set_text(&node, display);
        }
    }

    if let Some(node) = doc.by_id("footer-phone2") {
        if let Some(phone2) = phone2 {
            if doc.tag_name(&node) == "a" {
                doc.set_attribute(&node, "href", &tel_href(phone2, cc));
            }
        }
        if let Some(display) = site.display_phone2() {
            doc.set_text(&node, display);
        }
    }

    let whatsapp = present(&site.whatsapp_link)
        .map(str::to_string)
        .or_else(|| phone.map(|p| whatsapp_link_for(p, cc)));
    if let Some(link) = whatsapp {
        set_href_all(doc, &WHATSAPP_TARGETS, &link);
    }

    let whatsapp2 = present(&site.whatsapp_link2)
        .map(str::to_string)
        .or_else(|| phone2.map(|p| whatsapp_link_for(p, cc)));
    if let Some(link) = whatsapp2 {
        set_href_all(doc, &WHATSAPP2_TARGETS, &link);
    }

    if let Some(maps) = present(&site.maps_link) {
        set_href_all(doc, &DIRECTIONS_TARGETS, maps);
    }
}

fn bind_social<D: Document>(doc: &D, site: &SiteContent) {
    let links = [
        ("instagram", present(&site.social.instagram)),
        ("facebook", present(&site.social.facebook)),
    ];
    for (network, target) in links {
        let Some(target) = target else { continue };
        let selector = Selector::tag("a").and(Selector::attr_contains("href", network));
        if let Some(node) = doc.query(&selector) {
            doc.set_attribute(&node, "href", target);
        }
    }
}

fn bind_seo<D: Document>(doc: &D, site: &SiteContent) {
    let seo = &site.seo;
    let title = present(&seo.title)
        .or(present(&site.site_name))
        .unwrap_or("Force Gym");
    doc.set_title(title);

    let description = present(&seo.description).unwrap_or_default();
    let metas = [
        (Selector::attr_eq("name", "description"), description),
        (Selector::attr_eq("property", "og:title"), present(&seo.title).unwrap_or_default()),
        (Selector::attr_eq("property", "og:description"), description),
        (Selector::attr_eq("property", "og:url"), present(&seo.og_url).unwrap_or_default()),
    ];
    for (selector, value) in metas {
        if let Some(meta) = doc.query(&Selector::tag("meta").and(selector)) {
            doc.set_attribute(&meta, "content", value);
        }
    }

    if let Some(image) = present(&seo.og_image) {
        let selector = Selector::tag("meta").and(Selector::attr_eq("property", "og:image"));
        if let Some(meta) = doc.query(&selector) {
            doc.set_attribute(&meta, "content", image);
        }
    }
}

fn bind_flags<D: Document>(doc: &D, site: &SiteContent) {
    for node in doc.query_all(&Selector::attr(FLAG_ATTR)) {
        let Some(flag) = doc.attribute(&node, FLAG_ATTR) else { continue };
        if !flag.is_empty() && !site.flag_enabled(&flag) {
            doc.set_style(&node, "display", "none");
        }
    }
}

fn bind_copy_buttons<D: Document>(doc: &D, site: &SiteContent) {
    for (id, source) in COPY_BUTTONS {
        let Some(button) = doc.by_id(id) else { continue };
        let value = match source {
            CopySource::Phone => site.display_phone(),
            CopySource::Phone2 => site.display_phone2(),
            CopySource::Address => present(&site.address),
        };
        match value {
            Some(value) => doc.set_attribute(&button, COPY_VALUE_ATTR, value),
            None => doc.remove_attribute(&button, COPY_VALUE_ATTR),
        }
    }
}

/// Selector for every copy trigger the binder manages.
pub fn copy_buttons() -> Selector {
    Selector::any(COPY_BUTTONS.iter().map(|(id, _)| Selector::id(*id)))
}

/// Copies the payload recorded on `trigger` and reports the outcome.
pub async fn copy_from_trigger<D: Document>(
    doc: &D,
    trigger: &D::Node,
    content: Option<&ContentDocument>,
    lang: Lang,
    browser: &dyn Browser,
    toaster: &dyn Toaster,
) {
    let Some(value) = doc.attribute(trigger, COPY_VALUE_ATTR) else {
        return;
    };
    match browser.write_clipboard(&value).await {
        Ok(()) => {
            let copied = content
                .and_then(|c| present(&c.site().cta.copied).map(str::to_string))
                .unwrap_or_else(|| t!(lang, "copied"));
            toaster.show(&copied);
        }
        Err(err) => {
            tracing::warn!("clipboard write failed: {err}");
            toaster.show(&t!(lang, "clipboard-failed"));
        }
    }
}
