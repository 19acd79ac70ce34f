//! Lead forms: inline validation and WhatsApp hand-off.
//!
//! Every form works the same way. [`prepare`] adds an error slot after each
//! validated input, [`validate_field`] runs on every `input` event, and a
//! submit validates everything before [`submit::submit_form`] builds the
//! message.

pub mod password;
pub mod submit;
pub mod validation;

use crate::content::SiteContent;
use crate::core::{Document, Selector};
use crate::i18n::Lang;

pub use submit::{submit_form, SubmitContext};
pub use validation::{FieldError, FieldRule};

use validation::FieldError::{IdentifierRequired, NameRequired, PlanRequired, Required};

const INVALID_CLASS: &str = "is-invalid";

const CONTACT_RULES: &[FieldRule] = &[
    FieldRule::text("name").required(NameRequired).min_length(2),
    FieldRule::text("phone").required(Required).egypt_phone(),
];

const MEMBERSHIP_RULES: &[FieldRule] = &[
    FieldRule::text("req-name").required(NameRequired).min_length(2),
    FieldRule::text("req-phone").required(Required).egypt_phone(),
    FieldRule::text("req-plan").required(PlanRequired),
];

const SIGNIN_RULES: &[FieldRule] = &[
    FieldRule::text("identifier").required(IdentifierRequired),
    FieldRule::password("password").min_length(8),
];

const SIGNUP_RULES: &[FieldRule] = &[
    FieldRule::text("fullname").required(NameRequired).min_length(2),
    FieldRule::text("phone").required(Required).egypt_phone(),
    FieldRule::password("password").min_length(8),
    FieldRule::password("confirm-password").matches("password"),
    FieldRule::checkbox("terms"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Contact,
    Membership,
    Signin,
    Signup,
}

impl FormKind {
    pub const ALL: [FormKind; 4] = [Self::Contact, Self::Membership, Self::Signin, Self::Signup];

    pub fn form_id(self) -> &'static str {
        match self {
            Self::Contact => "contactForm",
            Self::Membership => "membershipForm",
            Self::Signin => "signinForm",
            Self::Signup => "signupForm",
        }
    }

    pub fn rules(self) -> &'static [FieldRule] {
        match self {
            Self::Contact => CONTACT_RULES,
            Self::Membership => MEMBERSHIP_RULES,
            Self::Signin => SIGNIN_RULES,
            Self::Signup => SIGNUP_RULES,
        }
    }

    pub fn rule_for(self, input_id: &str) -> Option<&'static FieldRule> {
        self.rules().iter().find(|rule| rule.id == input_id)
    }
}

fn error_id(field_id: &str) -> String {
    format!("error-{field_id}")
}

/// Adds the `.field-error` slots for a form present on the page and returns
/// the form element.
pub fn prepare<D: Document>(doc: &D, kind: FormKind) -> Option<D::Node> {
    let form = doc.by_id(kind.form_id())?;
    for rule in kind.rules() {
        let Some(input) = doc.by_id(rule.id) else {
            continue;
        };
        let id = error_id(rule.id);
        if doc.by_id(&id).is_some() {
            continue;
        }
        let Some(slot) = doc.create_element("div") else {
            continue;
        };
        doc.set_attribute(&slot, "id", &id);
        doc.set_attribute(&slot, "class", "field-error");
        doc.set_attribute(&slot, "role", "alert");
        doc.insert_after(&input, &slot);
    }
    Some(form)
}

/// Checks one field and reflects the outcome on the page. Fields missing
/// from the page count as valid.
pub fn validate_field<D: Document>(
    doc: &D,
    rule: &FieldRule,
    site: &SiteContent,
    lang: Lang,
) -> bool {
    let Some(input) = doc.by_id(rule.id) else {
        return true;
    };
    let other = rule
        .matches
        .and_then(|id| doc.by_id(id))
        .map(|node| doc.value(&node));
    let outcome = rule.check(&doc.value(&input), doc.checked(&input), other.as_deref());
    let valid = outcome.is_ok();

    doc.set_class(&input, INVALID_CLASS, !valid);
    doc.set_attribute(&input, "aria-invalid", if valid { "false" } else { "true" });
    if let Some(slot) = doc.by_id(&error_id(rule.id)) {
        let message = outcome
            .err()
            .map(|error| error.message(site, lang))
            .unwrap_or_default();
        doc.set_text(&slot, &message);
        doc.set_class(&slot, "show", !valid);
        if valid {
            doc.remove_attribute(&input, "aria-describedby");
        } else {
            doc.set_attribute(&input, "aria-describedby", &error_id(rule.id));
        }
    }
    valid
}

/// Validates every field (all of them, so each shows its error).
pub fn validate_all<D: Document>(doc: &D, kind: FormKind, site: &SiteContent, lang: Lang) -> bool {
    kind.rules()
        .iter()
        .map(|rule| validate_field(doc, rule, site, lang))
        .fold(true, |all, valid| all && valid)
}

/// First field of `form` currently marked invalid.
pub fn first_invalid<D: Document>(doc: &D, form: &D::Node) -> Option<D::Node> {
    doc.query_all(&Selector::class(INVALID_CLASS))
        .into_iter()
        .find(|node| doc.contains(form, node))
}
