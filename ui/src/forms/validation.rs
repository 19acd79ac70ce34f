//! Field rules and the errors they produce.

use crate::content::{present, SiteContent};
use crate::core::format::is_egyptian_mobile;
use crate::i18n::Lang;
use crate::t;

/// Why a field failed. Rendered through [`FieldError::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    NameRequired,
    NameMin(usize),
    PhoneInvalid,
    PlanRequired,
    IdentifierRequired,
    PasswordMin(usize),
    PasswordMatch,
    TermsRequired,
}

impl FieldError {
    /// The site's own wording (`auth.errors.*`) when it has one, otherwise
    /// the built-in catalogue.
    pub fn message(&self, site: &SiteContent, lang: Lang) -> String {
        let errors = &site.auth.errors;
        let custom = match self {
            Self::NameMin(_) => present(&errors.name_min),
            Self::PhoneInvalid => present(&errors.phone_invalid),
            Self::PasswordMin(_) => present(&errors.password_min),
            Self::PasswordMatch => present(&errors.password_match),
            Self::TermsRequired => present(&errors.terms_required),
            _ => None,
        };
        if let Some(custom) = custom {
            return custom.to_string();
        }
        match *self {
            Self::Required => t!(lang, "field-required"),
            Self::NameRequired => t!(lang, "name-required"),
            Self::NameMin(min) => t!(lang, "name-min", min = (min as i64)),
            Self::PhoneInvalid => t!(lang, "phone-invalid"),
            Self::PlanRequired => t!(lang, "plan-required"),
            Self::IdentifierRequired => t!(lang, "identifier-required"),
            Self::PasswordMin(min) => t!(lang, "password-min", min = (min as i64)),
            Self::PasswordMatch => t!(lang, "password-match"),
            Self::TermsRequired => t!(lang, "terms-required"),
        }
    }
}

/// Constraints for one input, addressed by element id.
///
/// Checks run in a fixed order and stop at the first failure: required,
/// then the phone pattern or the minimum length, then equality with
/// another field. A checkbox rule only checks `checked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub id: &'static str,
    pub required: Option<FieldError>,
    pub egypt_phone: bool,
    pub min_length: Option<usize>,
    pub matches: Option<&'static str>,
    pub checkbox: bool,
    /// Password input: taken as typed, and length errors use the password
    /// wording.
    pub secret: bool,
}

impl FieldRule {
    pub const fn text(id: &'static str) -> Self {
        Self {
            id,
            required: None,
            egypt_phone: false,
            min_length: None,
            matches: None,
            checkbox: false,
            secret: false,
        }
    }

    pub const fn password(id: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::text(id)
        }
    }

    pub const fn checkbox(id: &'static str) -> Self {
        Self {
            checkbox: true,
            ..Self::text(id)
        }
    }

    pub const fn required(self, error: FieldError) -> Self {
        Self {
            required: Some(error),
            ..self
        }
    }

    pub const fn egypt_phone(self) -> Self {
        Self {
            egypt_phone: true,
            ..self
        }
    }

    pub const fn min_length(self, min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..self
        }
    }

    pub const fn matches(self, other: &'static str) -> Self {
        Self {
            matches: Some(other),
            ..self
        }
    }

    fn min_error(&self, min: usize) -> FieldError {
        if self.secret {
            FieldError::PasswordMin(min)
        } else {
            FieldError::NameMin(min)
        }
    }

    /// Value as the form submits it.
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        if self.secret {
            raw
        } else {
            raw.trim()
        }
    }

    /// `other` is the current value of the [`matches`](Self::matches) field.
    pub fn check(&self, raw: &str, checked: bool, other: Option<&str>) -> Result<(), FieldError> {
        if self.checkbox {
            return if checked {
                Ok(())
            } else {
                Err(self.required.unwrap_or(FieldError::TermsRequired))
            };
        }
        let value = self.normalize(raw);
        match self.required {
            Some(error) if value.is_empty() => return Err(error),
            _ => {}
        }
        if self.egypt_phone {
            if !is_egyptian_mobile(value) {
                return Err(FieldError::PhoneInvalid);
            }
        } else if let Some(min) = self.min_length {
            if value.chars().count() < min {
                return Err(self.min_error(min));
            }
        }
        match (self.matches, other) {
            (Some(_), Some(other)) if value != self.normalize(other) => {
                Err(FieldError::PasswordMatch)
            }
            _ => Ok(()),
        }
    }
}
