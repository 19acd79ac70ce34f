//! Membership plans.
//!
//! Two plan layouts exist in the wild. The layout is detected from the first
//! plan record and every plan is then read with that layout:
//!
//! * duration plans: `{ "duration": {"months": 1}, "pricing": {"now": 500, "was": 600},
//!   "benefits": {"guests": 2, "ptSessions": 1, "freezeDays": 7} }`
//! * named plans: `{ "name": "Gold", "now": 500, "was": 600, "benefits": ["…"] }`
//!
//! Both normalize into [`PlanCard`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{present, SiteContent};
use crate::i18n::Lang;
use crate::t;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MembershipDocument {
    #[serde(default)]
    pub plans: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSchema {
    Duration,
    Named,
}

impl MembershipDocument {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn schema(&self) -> Option<PlanSchema> {
        let first = self.plans.first()?;
        if first.get("duration").is_some_and(is_truthy) {
            Some(PlanSchema::Duration)
        } else if first.get("name").is_some_and(is_truthy) {
            Some(PlanSchema::Named)
        } else {
            None
        }
    }

    /// Renderable cards, or `None` when the layout is not recognised.
    pub fn cards(&self, content: &SiteContent, lang: Lang) -> Option<Vec<PlanCard>> {
        let cards = match self.schema()? {
            PlanSchema::Duration => self
                .plans
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| read_plan::<DurationPlan>(index, raw))
                .map(|plan| plan.into_card(content, lang))
                .collect(),
            PlanSchema::Named => self
                .plans
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| read_plan::<NamedPlan>(index, raw))
                .map(NamedPlan::into_card)
                .collect(),
        };
        Some(cards)
    }
}

/// Malformed plans are skipped rather than rendered as empty cards.
fn read_plan<T: DeserializeOwned>(index: usize, raw: &Value) -> Option<T> {
    match T::deserialize(raw) {
        Ok(plan) => Some(plan),
        Err(err) => {
            tracing::warn!("skipping membership plan {index}: {err}");
            None
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A price as written in the document: number, string or absent.
fn price_text(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|n| *n > 0)
}

/// The shape every plan layout normalizes into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCard {
    pub title: String,
    pub now: String,
    pub was: String,
    pub benefits: Vec<String>,
}

impl PlanCard {
    /// First three benefits joined by ` · `, or `fallback` when there are none.
    pub fn summary(&self, fallback: &str) -> String {
        if self.benefits.is_empty() {
            fallback.to_string()
        } else {
            self.benefits
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" · ")
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DurationPlan {
    duration: Duration,
    pricing: Pricing,
    benefits: DurationBenefits,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Duration {
    pub days: Option<i64>,
    pub months: Option<i64>,
    pub years: Option<i64>,
}

impl Duration {
    /// `30 Days`, `1 Month`, `3 Months`, `1 Year` (`30 يوم`, `3 شهر`, `1 سنة`).
    pub fn title(&self, lang: Lang) -> String {
        if let Some(days) = positive(self.days) {
            t!(lang, "duration-days", count = days)
        } else if let Some(months) = positive(self.months) {
            t!(lang, "duration-months", count = months)
        } else if let Some(years) = positive(self.years) {
            t!(lang, "duration-years", count = years)
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Pricing {
    now: Option<Value>,
    was: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DurationBenefits {
    guests: Option<i64>,
    pt_sessions: Option<i64>,
    freeze_days: Option<i64>,
    freeze_months: Option<i64>,
    upgrade_days: Option<i64>,
}

impl DurationBenefits {
    fn describe(&self, content: &SiteContent, lang: Lang) -> Vec<String> {
        let copy = &content.membership;
        let label = |value: &Option<String>, fallback: String| {
            present(value).map(str::to_string).unwrap_or(fallback)
        };
        let days = t!(lang, "unit-days");

        let mut list = Vec::new();
        if let Some(guests) = positive(self.guests) {
            let noun = label(&copy.guest_invitations, t!(lang, "benefit-guests"));
            list.push(format!("{guests} {noun}"));
        }
        if let Some(sessions) = positive(self.pt_sessions) {
            let noun = label(&copy.pt_session, t!(lang, "benefit-pt"));
            list.push(format!("{sessions} {noun}"));
        }
        let freeze = label(&copy.freeze, t!(lang, "benefit-freeze"));
        if let Some(freeze_days) = positive(self.freeze_days) {
            list.push(format!("{freeze}: {freeze_days} {days}"));
        }
        if let Some(freeze_months) = positive(self.freeze_months) {
            let unit = t!(lang, "unit-months", count = freeze_months);
            list.push(format!("{freeze}: {freeze_months} {unit}"));
        }
        if let Some(upgrade_days) = positive(self.upgrade_days) {
            let upgrade = label(&copy.upgrade, t!(lang, "benefit-upgrade"));
            list.push(format!("{upgrade}: {upgrade_days} {days}"));
        }
        list
    }
}

impl DurationPlan {
    fn into_card(self, content: &SiteContent, lang: Lang) -> PlanCard {
        PlanCard {
            title: self.duration.title(lang),
            now: price_text(&self.pricing.now),
            was: price_text(&self.pricing.was),
            benefits: self.benefits.describe(content, lang),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct NamedPlan {
    name: String,
    now: Option<Value>,
    was: Option<Value>,
    benefits: Vec<String>,
}

impl NamedPlan {
    fn into_card(self) -> PlanCard {
        PlanCard {
            now: price_text(&self.now),
            was: price_text(&self.was),
            title: self.name,
            benefits: self.benefits,
        }
    }
}
