use dioxus::prelude::*;

use super::render_html;
use crate::features::theme::Theme;
use crate::i18n::Lang;
use crate::t;

#[component]
pub fn ThemeLabel(icon: String, name: String) -> Element {
    rsx! {
        span { class: "icon", "{icon}" }
        " {name}"
    }
}

/// Inner HTML of the theme toggle button for `theme`.
pub fn theme_label_html(theme: Theme, lang: Lang) -> String {
    let (icon, name) = match theme {
        Theme::Force => ("🔥", t!(lang, "theme-force")),
        Theme::Carbon => ("🌊", t!(lang, "theme-carbon")),
    };
    render_html(
        ThemeLabel,
        ThemeLabelProps {
            icon: icon.to_string(),
            name,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_carries_icon_and_name() {
        let force = theme_label_html(Theme::Force, Lang::En);
        assert!(force.contains("<span class=\"icon\">🔥</span>"));
        assert!(force.ends_with(" Force"));
        assert!(theme_label_html(Theme::Carbon, Lang::En).ends_with(" Carbon"));
    }
}
