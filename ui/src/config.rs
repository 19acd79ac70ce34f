//! Runtime configuration.
//!
//! Every field has a default matching the published site layout. A page can
//! override any subset with an inline block:
//!
//! ```html
//! <script type="application/json" id="force-gym-config">
//!   { "scheduleUrl": "data/schedule.v2.json", "navigateDelayMs": 0 }
//! </script>
//! ```

use serde::Deserialize;

use crate::core::Document;

pub const CONFIG_ELEMENT_ID: &str = "force-gym-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Content document path; `{lang}` is replaced by the language code.
    pub content_url: String,
    pub schedule_url: String,
    /// Tried in order; the first successful response wins.
    pub membership_urls: Vec<String>,
    pub navbar_partial_url: String,
    pub footer_partial_url: String,

    pub lang_storage_key: String,
    pub theme_storage_key: String,

    /// International dialling code prepended to local numbers.
    pub country_code: String,
    pub default_whatsapp_link: String,
    pub default_schedule_phone: String,

    pub membership_page: String,

    pub navbar_scrolled_px: f64,
    pub back_to_top_px: f64,
    pub smooth_scroll_gap_px: f64,
    pub fallback_nav_height_px: f64,

    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub scroll_spy_threshold: f64,

    pub navigate_delay_ms: u32,
    pub toast_visible_ms: u32,
    pub toast_fade_ms: u32,

    pub business_address: PostalAddress,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_url: "data/site.{lang}.json".into(),
            schedule_url: "data/schedule.json".into(),
            membership_urls: vec![
                "data/membership.json".into(),
                "data/membership.json.txt".into(),
            ],
            navbar_partial_url: "partials/navbar.html".into(),
            footer_partial_url: "partials/footer.html".into(),
            lang_storage_key: "force-gym-lang".into(),
            theme_storage_key: "force-gym-theme".into(),
            country_code: "20".into(),
            default_whatsapp_link: "https://wa.me/201112622236".into(),
            default_schedule_phone: "201112622236".into(),
            membership_page: "membership.html".into(),
            navbar_scrolled_px: 10.0,
            back_to_top_px: 500.0,
            smooth_scroll_gap_px: 8.0,
            fallback_nav_height_px: 70.0,
            reveal_threshold: 0.12,
            reveal_root_margin: "0px 0px -10% 0px".into(),
            scroll_spy_threshold: 0.5,
            navigate_delay_ms: 140,
            toast_visible_ms: 3000,
            toast_fade_ms: 200,
            business_address: PostalAddress::default(),
        }
    }
}

/// Postal address published in the home page structured data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostalAddress {
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    pub postal_code: String,
    pub address_country: String,
}

impl Default for PostalAddress {
    fn default() -> Self {
        Self {
            street_address: "14 Al-Maqrizi St".into(),
            address_locality: "Manshiyet el Bakri, Heliopolis".into(),
            address_region: "Cairo".into(),
            postal_code: "11774".into(),
            address_country: "EG".into(),
        }
    }
}

impl SiteConfig {
    /// Defaults overlaid with the page's inline config block, if any.
    /// A malformed block is logged and ignored.
    pub fn from_document<D: Document>(doc: &D) -> Self {
        let Some(node) = doc.by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let raw = doc.text(&node);
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, HEAD};

    #[test]
    fn inline_block_overrides_only_named_fields() {
        let doc = MemoryDocument::new();
        doc.add(
            HEAD,
            "script",
            &[("id", CONFIG_ELEMENT_ID), ("type", "application/json")],
            r#"{ "scheduleUrl": "data/schedule.v2.json", "navigateDelayMs": 0 }"#,
        );

        let config = SiteConfig::from_document(&doc);
        assert_eq!(config.schedule_url, "data/schedule.v2.json");
        assert_eq!(config.navigate_delay_ms, 0);
        assert_eq!(config.lang_storage_key, "force-gym-lang");
        assert_eq!(config.membership_urls.len(), 2);
    }

    #[test]
    fn malformed_block_falls_back_to_defaults() {
        let doc = MemoryDocument::new();
        doc.add(HEAD, "script", &[("id", CONFIG_ELEMENT_ID)], "{ not json");
        assert_eq!(SiteConfig::from_document(&doc), SiteConfig::default());
    }
}
