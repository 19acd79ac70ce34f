use crate::config::SiteConfig;
use crate::content::{present, PlanCard, SiteContent};
use crate::core::format::{fill_template, strip_whitespace, whatsapp_url};
use crate::core::{Browser, Document, Toaster};
use crate::i18n::Lang;
use crate::t;

use super::{first_invalid, validate_all, FormKind};

const CONTACT_TEMPLATE: &str =
    "Hi Force Gym, I want to join.\nName: {name}\nPhone: {phone}\nGoal: {goal}";
const MEMBERSHIP_TEMPLATE: &str = "Hi Force Gym, I'm interested in the membership offer.\nName: {name}\nPhone: {phone}\nPlan: {plan}\nNote: {note}";
const SIGNIN_TEMPLATE: &str = "Hi Force Gym, I'd like to sign in.\nPhone/Email: {identifier}";
const SIGNUP_TEMPLATE: &str =
    "Hi Force Gym, I'd like to create an account.\nName: {name}\nPhone: {phone}";

/// Everything a submit needs besides the page itself.
pub struct SubmitContext<'a> {
    pub site: &'a SiteContent,
    pub lang: Lang,
    pub config: &'a SiteConfig,
    /// Plans behind the `#req-plan` option values.
    pub plans: &'a [PlanCard],
}

fn field<D: Document>(doc: &D, id: &str) -> String {
    doc.by_id(id).map(|node| doc.value(&node)).unwrap_or_default()
}

fn trimmed<D: Document>(doc: &D, id: &str) -> String {
    field(doc, id).trim().to_string()
}

fn template<'a>(candidates: &[&'a Option<String>], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .find_map(|value| present(*value))
        .unwrap_or(fallback)
}

fn or_default(value: String, fallback: impl FnOnce() -> String) -> String {
    if value.is_empty() {
        fallback()
    } else {
        value
    }
}

/// WhatsApp message for a validated form.
pub fn compose_message<D: Document>(doc: &D, kind: FormKind, ctx: &SubmitContext<'_>) -> String {
    let site = ctx.site;
    match kind {
        FormKind::Contact => {
            let name = trimmed(doc, "name");
            let phone = strip_whitespace(&field(doc, "phone"));
            let goal = or_default(trimmed(doc, "goal"), || t!(ctx.lang, "goal-not-specified"));
            let tpl = template(
                &[&site.contact.whatsapp_message, &site.lead.whatsapp_message],
                CONTACT_TEMPLATE,
            );
            fill_template(
                tpl,
                &[("name", name.as_str()), ("phone", phone.as_str()), ("goal", goal.as_str())],
            )
        }
        FormKind::Membership => {
            let name = trimmed(doc, "req-name");
            let phone = strip_whitespace(&field(doc, "req-phone"));
            let plan = trimmed(doc, "req-plan")
                .parse::<usize>()
                .ok()
                .and_then(|idx| ctx.plans.get(idx))
                .map(|plan| plan.title.clone())
                .unwrap_or_default();
            let note = or_default(trimmed(doc, "req-note"), || t!(ctx.lang, "note-none"));
            fill_template(
                MEMBERSHIP_TEMPLATE,
                &[
                    ("name", name.as_str()),
                    ("phone", phone.as_str()),
                    ("plan", plan.as_str()),
                    ("note", note.as_str()),
                ],
            )
        }
        FormKind::Signin => {
            let identifier = trimmed(doc, "identifier");
            let password = field(doc, "password");
            let tpl = template(&[&site.auth.signin.whatsapp_message], SIGNIN_TEMPLATE);
            fill_template(
                tpl,
                &[("identifier", identifier.as_str()), ("password", password.as_str())],
            )
        }
        FormKind::Signup => {
            let name = trimmed(doc, "fullname");
            let phone = strip_whitespace(&field(doc, "phone"));
            let password = field(doc, "password");
            let tpl = template(&[&site.auth.signup.whatsapp_message], SIGNUP_TEMPLATE);
            fill_template(
                tpl,
                &[
                    ("name", name.as_str()),
                    ("phone", phone.as_str()),
                    ("password", password.as_str()),
                ],
            )
        }
    }
}

pub fn success_toast(kind: FormKind, site: &SiteContent, lang: Lang) -> String {
    let own = match kind {
        FormKind::Membership => present(&site.membership.request_form.success_toast),
        _ => present(&site.contact.success_toast),
    };
    own.map(str::to_string)
        .unwrap_or_else(|| t!(lang, "toast-opening-whatsapp"))
}

/// Handles a submit event. Returns whether WhatsApp was opened.
///
/// An invalid form gets a toast and focus on its first invalid field.
pub fn submit_form<D: Document>(
    doc: &D,
    kind: FormKind,
    ctx: &SubmitContext<'_>,
    browser: &dyn Browser,
    toaster: &dyn Toaster,
) -> bool {
    let Some(form) = doc.by_id(kind.form_id()) else {
        return false;
    };
    if !validate_all(doc, kind, ctx.site, ctx.lang) {
        toaster.show(&t!(ctx.lang, "toast-fix-fields"));
        if let Some(field) = first_invalid(doc, &form) {
            doc.focus(&field);
        }
        tracing::debug!("{} rejected: invalid fields", kind.form_id());
        return false;
    }

    let link = present(&ctx.site.whatsapp_link).unwrap_or(&ctx.config.default_whatsapp_link);
    let message = compose_message(doc, kind, ctx);
    browser.open_in_new_tab(&whatsapp_url(link, &message));
    toaster.show(&success_toast(kind, ctx.site, ctx.lang));
    tracing::info!("{} handed off to WhatsApp", kind.form_id());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentDocument;
    use crate::core::format::encode_uri_component;
    use crate::core::memory::{MemoryBrowser, MemoryDocument, MemoryToaster, NodeId, BODY};
    use crate::forms::prepare;
    use serde_json::json;

    fn form(doc: &MemoryDocument, kind: FormKind, fields: &[(&str, &str)]) -> NodeId {
        let form = doc.add(BODY, "form", &[("id", kind.form_id())], "");
        for (id, value) in fields {
            let input = doc.add(form, "input", &[("id", *id)], "");
            doc.set_value(input, value);
        }
        prepare(doc, kind);
        form
    }

    fn plans() -> Vec<PlanCard> {
        vec![PlanCard {
            title: "1 Month".into(),
            now: "500".into(),
            was: "600".into(),
            benefits: vec![],
        }]
    }

    #[test]
    fn contact_uses_builtin_template_and_defaults_goal() {
        let doc = MemoryDocument::new();
        form(&doc, FormKind::Contact, &[("name", " Sara "), ("phone", "010 1234 5678"), ("goal", "")]);
        let site = SiteContent::default();
        let config = SiteConfig::default();
        let ctx = SubmitContext { site: &site, lang: Lang::En, config: &config, plans: &[] };

        assert_eq!(
            compose_message(&doc, FormKind::Contact, &ctx),
            "Hi Force Gym, I want to join.\nName: Sara\nPhone: 01012345678\nGoal: Not specified"
        );
    }

    #[test]
    fn membership_submit_opens_whatsapp_with_plan_title() {
        let doc = MemoryDocument::new();
        form(
            &doc,
            FormKind::Membership,
            &[("req-name", "Omar"), ("req-phone", "01112622236"), ("req-plan", "0"), ("req-note", "")],
        );
        let content = ContentDocument::from_value(json!({
            "whatsappLink": "https://wa.me/201000000000",
            "membership": { "requestForm": { "successToast": "Request sent" } }
        }))
        .unwrap();
        let config = SiteConfig::default();
        let plans = plans();
        let ctx = SubmitContext { site: content.site(), lang: Lang::En, config: &config, plans: &plans };
        let browser = MemoryBrowser::default();
        let toaster = MemoryToaster::default();

        assert!(submit_form(&doc, FormKind::Membership, &ctx, &browser, &toaster));

        let message = "Hi Force Gym, I'm interested in the membership offer.\nName: Omar\nPhone: 01112622236\nPlan: 1 Month\nNote: None";
        assert_eq!(
            browser.opened.borrow().as_slice(),
            [format!("https://wa.me/201000000000?text={}", encode_uri_component(message))]
        );
        assert_eq!(toaster.last().as_deref(), Some("Request sent"));
    }

    #[test]
    fn empty_membership_name_blocks_submit() {
        let doc = MemoryDocument::new();
        form(
            &doc,
            FormKind::Membership,
            &[("req-name", ""), ("req-phone", "01112622236"), ("req-plan", "0")],
        );
        let site = SiteContent::default();
        let config = SiteConfig::default();
        let ctx = SubmitContext { site: &site, lang: Lang::En, config: &config, plans: &[] };
        let browser = MemoryBrowser::default();
        let toaster = MemoryToaster::default();

        assert!(!submit_form(&doc, FormKind::Membership, &ctx, &browser, &toaster));
        assert!(browser.opened.borrow().is_empty());
        assert_eq!(toaster.last().as_deref(), Some("Please fix the highlighted fields"));

        let name = doc.by_id("req-name").unwrap();
        assert_eq!(doc.active_element(), Some(name));
        assert_eq!(doc.attribute(&name, "aria-invalid").as_deref(), Some("true"));
        let slot = doc.by_id("error-req-name").unwrap();
        assert_eq!(doc.text(&slot), "Name is required");
        assert!(doc.has_class(&slot, "show"));
    }

    #[test]
    fn signup_template_fills_every_placeholder() {
        let doc = MemoryDocument::new();
        form(
            &doc,
            FormKind::Signup,
            &[
                ("fullname", "Mona"),
                ("phone", "0111 262 2236"),
                ("password", "hunter22"),
                ("confirm-password", "hunter22"),
                ("terms", "on"),
            ],
        );
        let content = ContentDocument::from_value(json!({
            "auth": { "signup": { "whatsappMessage": "{name}/{phone}/{password}/{name}" } }
        }))
        .unwrap();
        let config = SiteConfig::default();
        let ctx = SubmitContext { site: content.site(), lang: Lang::En, config: &config, plans: &[] };

        assert_eq!(
            compose_message(&doc, FormKind::Signup, &ctx),
            "Mona/01112622236/hunter22/Mona"
        );
    }

    #[test]
    fn signup_requires_terms() {
        let doc = MemoryDocument::new();
        form(
            &doc,
            FormKind::Signup,
            &[
                ("fullname", "Mona"),
                ("phone", "01112622236"),
                ("password", "hunter22"),
                ("confirm-password", "hunter22"),
                ("terms", "on"),
            ],
        );
        let site = SiteContent::default();
        let config = SiteConfig::default();
        let ctx = SubmitContext { site: &site, lang: Lang::En, config: &config, plans: &[] };
        let browser = MemoryBrowser::default();
        let toaster = MemoryToaster::default();

        assert!(!submit_form(&doc, FormKind::Signup, &ctx, &browser, &toaster));
        let terms = doc.by_id("terms").unwrap();
        assert_eq!(doc.active_element(), Some(terms));

        doc.set_checked(terms, true);
        assert!(submit_form(&doc, FormKind::Signup, &ctx, &browser, &toaster));
        assert_eq!(toaster.last().as_deref(), Some("Opening WhatsApp..."));
    }

    #[test]
    fn fixed_field_clears_its_error() {
        let doc = MemoryDocument::new();
        form(&doc, FormKind::Contact, &[("name", "A"), ("phone", "01112622236")]);
        let site = SiteContent::default();
        let rule = FormKind::Contact.rule_for("name").unwrap();
        let name = doc.by_id("name").unwrap();

        assert!(!crate::forms::validate_field(&doc, rule, &site, Lang::En));
        assert_eq!(doc.attribute(&name, "aria-describedby").as_deref(), Some("error-name"));

        doc.set_value(name, "Ali");
        assert!(crate::forms::validate_field(&doc, rule, &site, Lang::En));
        assert!(!doc.has_class(&name, "is-invalid"));
        assert_eq!(doc.attribute(&name, "aria-describedby"), None);
        assert_eq!(doc.text(&doc.by_id("error-name").unwrap()), "");
    }
}
