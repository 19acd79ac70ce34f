//! Content documents and the store that loads them.
//!
//! A [`ContentDocument`] keeps the raw JSON tree (for `data-i18n` dotted-path
//! lookups) next to a typed view of the fields the runtime reads directly.

pub mod membership;
pub mod schedule;
pub mod store;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::core::FetchError;

pub use membership::{MembershipDocument, PlanCard};
pub use schedule::ScheduleEntry;
pub use store::ContentStore;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{url} is not valid JSON for this document: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    pub fn parse(url: &str, source: serde_json::Error) -> Self {
        Self::Parse {
            url: url.to_string(),
            source,
        }
    }
}

/// Treats an empty string the same as a missing value.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// One language's site copy. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    raw: Value,
    site: SiteContent,
}

impl ContentDocument {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let site = SiteContent::deserialize(&raw)?;
        Ok(Self { raw, site })
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn site(&self) -> &SiteContent {
        &self.site
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Resolves a dotted key path (`hero.title`, `gallery.items.0.alt`).
    ///
    /// Only displayable values resolve: non-empty strings, non-zero numbers
    /// and `true`. Any missing segment yields `None`.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let mut node = &self.raw;
        for segment in path.split('.') {
            node = match node {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        match node {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

/// Reads a scalar as text: numbers are stringified, anything else is absent.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// A block of the wrong shape (`null`, a string where an object belongs)
/// reads as its default instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|err| {
        tracing::debug!("ignoring malformed content block: {err}");
        T::default()
    }))
}

/// Fields of the content document read by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteContent {
    #[serde(deserialize_with = "text")]
    pub site_name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "text")]
    pub phone_formatted: Option<String>,
    #[serde(deserialize_with = "text")]
    pub phone2: Option<String>,
    #[serde(deserialize_with = "text")]
    pub phone2_formatted: Option<String>,
    #[serde(deserialize_with = "text")]
    pub whatsapp_link: Option<String>,
    #[serde(deserialize_with = "text")]
    pub whatsapp_link2: Option<String>,
    #[serde(deserialize_with = "text")]
    pub maps_link: Option<String>,
    #[serde(deserialize_with = "text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub social: Social,
    #[serde(deserialize_with = "lenient")]
    pub seo: Seo,
    #[serde(deserialize_with = "lenient")]
    pub flags: BTreeMap<String, Value>,
    #[serde(deserialize_with = "lenient")]
    pub lead: LeadCopy,
    #[serde(deserialize_with = "lenient")]
    pub contact: ContactCopy,
    #[serde(deserialize_with = "lenient")]
    pub cta: CtaCopy,
    #[serde(deserialize_with = "lenient")]
    pub membership: MembershipCopy,
    #[serde(deserialize_with = "lenient")]
    pub schedule: ScheduleCopy,
    #[serde(deserialize_with = "lenient")]
    pub auth: AuthCopy,
}

impl SiteContent {
    /// Formatted phone, falling back to the raw one.
    pub fn display_phone(&self) -> Option<&str> {
        present(&self.phone_formatted).or(present(&self.phone))
    }

    pub fn display_phone2(&self) -> Option<&str> {
        present(&self.phone2_formatted).or(present(&self.phone2))
    }

    /// A flag is on only when it is literally `true`.
    pub fn flag_enabled(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(Value::Bool(true)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Social {
    #[serde(deserialize_with = "text")]
    pub instagram: Option<String>,
    #[serde(deserialize_with = "text")]
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seo {
    #[serde(deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "text")]
    pub og_url: Option<String>,
    #[serde(deserialize_with = "text")]
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadCopy {
    #[serde(deserialize_with = "text")]
    pub whatsapp_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactCopy {
    #[serde(deserialize_with = "text")]
    pub whatsapp_message: Option<String>,
    #[serde(deserialize_with = "text")]
    pub success_toast: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CtaCopy {
    #[serde(deserialize_with = "text")]
    pub copied: Option<String>,
    #[serde(deserialize_with = "text")]
    pub details: Option<String>,
    #[serde(deserialize_with = "text")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MembershipCopy {
    #[serde(deserialize_with = "text")]
    pub badge: Option<String>,
    #[serde(deserialize_with = "text")]
    pub now: Option<String>,
    #[serde(deserialize_with = "text")]
    pub egp: Option<String>,
    #[serde(deserialize_with = "text")]
    pub instead_of: Option<String>,
    #[serde(deserialize_with = "text")]
    pub guest_invitations: Option<String>,
    #[serde(deserialize_with = "text")]
    pub pt_session: Option<String>,
    #[serde(deserialize_with = "text")]
    pub freeze: Option<String>,
    #[serde(deserialize_with = "text")]
    pub upgrade: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub request_form: RequestFormCopy,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestFormCopy {
    #[serde(deserialize_with = "text")]
    pub success_toast: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleCopy {
    #[serde(deserialize_with = "text")]
    pub coming_soon: Option<String>,
    #[serde(deserialize_with = "text")]
    pub whatsapp_message: Option<String>,
    /// Localized weekday names keyed by lowercase English day.
    #[serde(deserialize_with = "lenient")]
    pub days: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthCopy {
    #[serde(deserialize_with = "lenient")]
    pub signin: SigninCopy,
    #[serde(deserialize_with = "lenient")]
    pub signup: SignupCopy,
    #[serde(deserialize_with = "lenient")]
    pub errors: AuthErrors,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SigninCopy {
    #[serde(deserialize_with = "text")]
    pub whatsapp_message: Option<String>,
    #[serde(deserialize_with = "text")]
    pub show_password: Option<String>,
    #[serde(deserialize_with = "text")]
    pub hide_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupCopy {
    #[serde(deserialize_with = "text")]
    pub whatsapp_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthErrors {
    #[serde(deserialize_with = "text")]
    pub name_min: Option<String>,
    #[serde(deserialize_with = "text")]
    pub phone_invalid: Option<String>,
    #[serde(deserialize_with = "text")]
    pub password_min: Option<String>,
    #[serde(deserialize_with = "text")]
    pub password_match: Option<String>,
    #[serde(deserialize_with = "text")]
    pub terms_required: Option<String>,
}
