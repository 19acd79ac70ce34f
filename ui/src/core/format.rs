//! Formatting helpers for phone numbers, outbound links and message templates.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

/// Characters `encodeURIComponent` escapes: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static EGYPT_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[0-9]{9}$").expect("valid mobile pattern"));
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid placeholder pattern"));

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Drops every whitespace character (`"010 1234 5678"` → `"01012345678"`).
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Eleven digits starting with `01`, after whitespace removal.
pub fn is_egyptian_mobile(value: &str) -> bool {
    EGYPT_MOBILE.is_match(&strip_whitespace(value))
}

/// Local number with its trunk prefix removed: `"01112622236"` → `"1112622236"`.
pub fn national_digits(phone: &str) -> &str {
    let mut chars = phone.char_indices();
    match chars.nth(1) {
        Some((idx, _)) => &phone[idx..],
        None => "",
    }
}

/// `tel:` target in international form.
pub fn tel_href(phone: &str, country_code: &str) -> String {
    format!("tel:+{country_code}{}", national_digits(phone))
}

/// International form without the plus, as used by `wa.me`.
pub fn international_digits(phone: &str, country_code: &str) -> String {
    format!("{country_code}{}", national_digits(phone))
}

pub fn whatsapp_link_for(phone: &str, country_code: &str) -> String {
    format!("https://wa.me/{}", international_digits(phone, country_code))
}

/// `<link>?text=<message>` with the message percent-encoded.
pub fn whatsapp_url(link: &str, message: &str) -> String {
    format!("{link}?text={}", encode_uri_component(message))
}

/// Replaces every `{key}` token with its value. Unknown tokens stay as written.
/// Tokens inside substituted values are not expanded.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01012345678", true)]
    #[case("010 1234 5678", true)]
    #[case("0201234567", false)]
    #[case("01234", false)]
    #[case("011234567890", false)]
    #[case("", false)]
    #[case("0101234567a", false)]
    fn egyptian_mobile_pattern(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_egyptian_mobile(input), expected);
    }

    #[test]
    fn uri_component_matches_browser_encoding() {
        assert_eq!(
            encode_uri_component("Hi Force Gym!\nName: Ali (PT)"),
            "Hi%20Force%20Gym!%0AName%3A%20Ali%20(PT)"
        );
        assert_eq!(encode_uri_component("مرحبا"), "%D9%85%D8%B1%D8%AD%D8%A8%D8%A7");
    }

    #[test]
    fn phone_targets() {
        assert_eq!(tel_href("01112622236", "20"), "tel:+201112622236");
        assert_eq!(whatsapp_link_for("01112622236", "20"), "https://wa.me/201112622236");
        assert_eq!(national_digits(""), "");
    }

    #[test]
    fn template_replaces_every_occurrence() {
        let filled = fill_template(
            "{name} / {phone} / {name} / {other}",
            &[("name", "Mona"), ("phone", "010")],
        );
        assert_eq!(filled, "Mona / 010 / Mona / {other}");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let filled = fill_template(
            "Name: {name}\nPhone: {phone}\nGoal: {goal}",
            &[("name", "{phone}"), ("phone", "010"), ("goal", "{name} {goal}")],
        );
        assert_eq!(filled, "Name: {phone}\nPhone: 010\nGoal: {name} {goal}");
    }
}
