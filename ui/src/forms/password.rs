use crate::content::{present, SiteContent};
use crate::core::{Document, Selector};
use crate::i18n::Lang;
use crate::t;

pub fn toggles() -> Selector {
    Selector::class("password-toggle")
}

/// Flips the password input next to `button` between hidden and shown and
/// relabels the button for the next click.
pub fn toggle_visibility<D: Document>(doc: &D, button: &D::Node, site: &SiteContent, lang: Lang) {
    let Some(wrapper) = doc.closest(button, &Selector::class("password-input-wrapper")) else {
        return;
    };
    let Some(input) = doc
        .query_all(&Selector::tag("input"))
        .into_iter()
        .find(|node| doc.contains(&wrapper, node))
    else {
        return;
    };
    let hidden = doc.attribute(&input, "type").as_deref() == Some("password");
    let signin = &site.auth.signin;
    if hidden {
        doc.set_attribute(&input, "type", "text");
        let label = present(&signin.hide_password)
            .map(str::to_string)
            .unwrap_or_else(|| t!(lang, "hide-password"));
        doc.set_text(button, &label);
    } else {
        doc.set_attribute(&input, "type", "password");
        let label = present(&signin.show_password)
            .map(str::to_string)
            .unwrap_or_else(|| t!(lang, "show-password"));
        doc.set_text(button, &label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, BODY};

    #[test]
    fn toggle_round_trips_type_and_label() {
        let doc = MemoryDocument::new();
        let wrapper = doc.add(BODY, "div", &[("class", "password-input-wrapper")], "");
        let input = doc.add(wrapper, "input", &[("type", "password")], "");
        let button = doc.add(wrapper, "button", &[("class", "password-toggle")], "Show");
        let site = SiteContent::default();

        toggle_visibility(&doc, &button, &site, Lang::En);
        assert_eq!(doc.attribute(&input, "type").as_deref(), Some("text"));
        assert_eq!(doc.text(&button), "Hide");

        toggle_visibility(&doc, &button, &site, Lang::En);
        assert_eq!(doc.attribute(&input, "type").as_deref(), Some("password"));
        assert_eq!(doc.text(&button), "Show");
    }

    #[test]
    fn stray_toggle_is_ignored() {
        let doc = MemoryDocument::new();
        let button = doc.add(BODY, "button", &[("class", "password-toggle")], "Show");
        toggle_visibility(&doc, &button, &SiteContent::default(), Lang::Ar);
        assert_eq!(doc.text(&button), "Show");
    }
}
