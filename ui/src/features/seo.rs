//! `LocalBusiness` structured data for the home page.

use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::content::{present, SiteContent};
use crate::core::format::national_digits;
use crate::core::Document;

pub const JSON_LD_ID: &str = "force-gym-jsonld";
const HOME_PAGE: &str = "index.html";

pub fn local_business_json(site: &SiteContent, config: &SiteConfig) -> Value {
    let address = &config.business_address;
    let same_as: Vec<&str> = [&site.social.instagram, &site.social.facebook]
        .into_iter()
        .filter_map(present)
        .collect();
    let mut business = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": present(&site.site_name).unwrap_or("Force Gym"),
        "address": {
            "@type": "PostalAddress",
            "streetAddress": address.street_address,
            "addressLocality": address.address_locality,
            "addressRegion": address.address_region,
            "postalCode": address.postal_code,
            "addressCountry": address.address_country,
        },
        "sameAs": same_as,
    });
    if let Some(phone) = present(&site.phone) {
        business["telephone"] = json!(format!("+{}{}", config.country_code, national_digits(phone)));
    }
    business
}

/// Appends the script to `<head>` on the home page, once.
pub fn inject_json_ld<D: Document>(
    doc: &D,
    site: &SiteContent,
    config: &SiteConfig,
    page_name: &str,
) -> bool {
    if page_name != HOME_PAGE || doc.by_id(JSON_LD_ID).is_some() {
        return false;
    }
    let (Some(head), Some(script)) = (doc.head(), doc.create_element("script")) else {
        return false;
    };
    doc.set_attribute(&script, "type", "application/ld+json");
    doc.set_attribute(&script, "id", JSON_LD_ID);
    doc.set_text(&script, &local_business_json(site, config).to_string());
    doc.append_child(&head, &script);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentDocument;
    use crate::core::memory::MemoryDocument;

    fn site() -> SiteContent {
        ContentDocument::from_value(json!({
            "siteName": "Force Gym",
            "phone": "01112622236",
            "social": { "instagram": "https://instagram.com/forcegym" }
        }))
        .unwrap()
        .site()
        .clone()
    }

    #[test]
    fn business_carries_address_phone_and_socials() {
        let value = local_business_json(&site(), &SiteConfig::default());
        assert_eq!(value["@type"], "LocalBusiness");
        assert_eq!(value["telephone"], "+201112622236");
        assert_eq!(value["address"]["addressLocality"], "Manshiyet el Bakri, Heliopolis");
        assert_eq!(value["sameAs"], json!(["https://instagram.com/forcegym"]));
    }

    #[test]
    fn injected_once_and_only_on_home() {
        let doc = MemoryDocument::new();
        let config = SiteConfig::default();
        assert!(!inject_json_ld(&doc, &site(), &config, "membership.html"));
        assert!(inject_json_ld(&doc, &site(), &config, "index.html"));
        assert!(!inject_json_ld(&doc, &site(), &config, "index.html"));

        let script = doc.by_id(JSON_LD_ID).unwrap();
        let parsed: Value = serde_json::from_str(&doc.text(&script)).unwrap();
        assert_eq!(parsed["name"], "Force Gym");
    }
}
