use dioxus::prelude::*;

use super::render_html;
use crate::content::{present, PlanCard, SiteContent};
use crate::core::Document;
use crate::i18n::Lang;
use crate::t;

pub const PRICING_GRID: &str = "pricing-grid";
pub const BENEFITS_GRID: &str = "benefits-grid";
pub const PLAN_SELECT: &str = "req-plan";

/// Labels around the prices, from the content document or the built-in catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipLabels {
    pub badge: String,
    pub now: String,
    pub instead_of: String,
    pub egp: String,
    pub details: String,
    pub select: String,
}

impl MembershipLabels {
    pub fn new(site: &SiteContent, lang: Lang) -> Self {
        let pick = |value: &Option<String>, fallback: String| {
            present(value).map(str::to_string).unwrap_or(fallback)
        };
        let copy = &site.membership;
        Self {
            badge: pick(&copy.badge, t!(lang, "membership-badge")),
            now: pick(&copy.now, t!(lang, "price-now")),
            instead_of: pick(&copy.instead_of, t!(lang, "price-instead-of")),
            egp: pick(&copy.egp, t!(lang, "currency-egp")),
            details: pick(&site.cta.details, t!(lang, "contact-details")),
            select: t!(lang, "plan-select-placeholder"),
        }
    }
}

#[component]
pub fn PricingCards(plans: Vec<PlanCard>, labels: MembershipLabels) -> Element {
    rsx! {
        for (idx, plan) in plans.into_iter().enumerate() {
            div { key: "{idx}", class: "pricing-card card",
                span { class: "badge", "{labels.badge}" }
                h3 { "{plan.title}" }
                div { class: "price",
                    span { class: "now",
                        "{labels.now}: "
                        strong { "{plan.now}" }
                        " {labels.egp}"
                    }
                    span { class: "was",
                        "{labels.instead_of}: "
                        s { "{plan.was}" }
                        " {labels.egp}"
                    }
                }
                p { class: "benefits-summary", {plan.summary(&labels.details)} }
            }
        }
    }
}

#[component]
pub fn BenefitCards(plans: Vec<PlanCard>, details: String) -> Element {
    rsx! {
        for (idx, plan) in plans.into_iter().enumerate() {
            div { key: "{idx}", class: "benefit-card card",
                h3 { "{plan.title}" }
                if plan.benefits.is_empty() {
                    p { class: "muted", "{details}" }
                } else {
                    ul { class: "benefits-list",
                        for benefit in plan.benefits.iter() {
                            li { "{benefit}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn PlanOptions(plans: Vec<PlanCard>, labels: MembershipLabels) -> Element {
    rsx! {
        option { value: "", "{labels.select}" }
        for (idx, plan) in plans.into_iter().enumerate() {
            option { key: "{idx}", value: "{idx}", "{plan.title} - {plan.now} {labels.egp}" }
        }
    }
}

/// Writes pricing cards, benefit cards and the plan selector options.
/// Each target is optional.
pub fn paint_membership<D: Document>(doc: &D, plans: &[PlanCard], labels: &MembershipLabels) {
    if let Some(grid) = doc.by_id(PRICING_GRID) {
        let html = render_html(
            PricingCards,
            PricingCardsProps {
                plans: plans.to_vec(),
                labels: labels.clone(),
            },
        );
        doc.set_inner_html(&grid, &html);
    }
    if let Some(grid) = doc.by_id(BENEFITS_GRID) {
        let html = render_html(
            BenefitCards,
            BenefitCardsProps {
                plans: plans.to_vec(),
                details: labels.details.clone(),
            },
        );
        doc.set_inner_html(&grid, &html);
    }
    if let Some(select) = doc.by_id(PLAN_SELECT) {
        let html = render_html(
            PlanOptions,
            PlanOptionsProps {
                plans: plans.to_vec(),
                labels: labels.clone(),
            },
        );
        doc.set_inner_html(&select, &html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, BODY};

    fn plan(title: &str, now: &str, was: &str, benefits: &[&str]) -> PlanCard {
        PlanCard {
            title: title.into(),
            now: now.into(),
            was: was.into(),
            benefits: benefits.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn labels_fall_back_to_catalogue() {
        let labels = MembershipLabels::new(&SiteContent::default(), Lang::En);
        assert_eq!(labels.egp, "EGP");
        assert_eq!(labels.details, "Contact for details");
        assert_eq!(labels.select, "-- Select --");
    }

    #[test]
    fn pricing_card_shows_current_and_struck_price() {
        let labels = MembershipLabels::new(&SiteContent::default(), Lang::En);
        let html = render_html(
            PricingCards,
            PricingCardsProps {
                plans: vec![plan("1 Month", "500", "600", &["Sauna", "Pool", "Lockers", "Towels"])],
                labels,
            },
        );
        assert!(html.contains("<h3>1 Month</h3>"));
        assert!(html.contains("<strong>500</strong>"));
        assert!(html.contains("<s>600</s>"));
        assert!(html.contains("Sauna · Pool · Lockers"));
        assert!(!html.contains("Towels"));
    }

    #[test]
    fn benefit_cards_fall_back_to_details() {
        let html = render_html(
            BenefitCards,
            BenefitCardsProps {
                plans: vec![plan("Gold", "1", "2", &[]), plan("Silver", "1", "2", &["Sauna"])],
                details: "Ask us".into(),
            },
        );
        assert!(html.contains("<p class=\"muted\">Ask us</p>"));
        assert!(html.contains("<li>Sauna</li>"));
    }

    #[test]
    fn plan_options_are_indexed() {
        let doc = MemoryDocument::new();
        let select = doc.add(BODY, "select", &[("id", PLAN_SELECT)], "");
        let labels = MembershipLabels::new(&SiteContent::default(), Lang::En);

        paint_membership(&doc, &[plan("1 Month", "500", "600", &[])], &labels);

        let html = doc.inner_html(select).unwrap_or_default();
        assert!(html.contains("-- Select --"));
        assert!(html.contains("1 Month - 500 EGP"));
        assert!(html.contains("value=\"0\""));
    }
}
