//! Colour theme: persisted choice, root attributes and the navbar toggle.

use crate::core::{Document, KeyValueStore, Selector};
use crate::i18n::Lang;
use crate::t;
use crate::views::theme::theme_label_html;

pub const TOGGLE_CLASS: &str = "theme-toggle";
const TOGGLE_ITEM_CLASS: &str = "theme-toggle-item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Force,
    Carbon,
}

impl Theme {
    pub fn code(self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Carbon => "carbon",
        }
    }

    /// Reads a stored value. Legacy `light` maps to carbon; anything else,
    /// including the old `dark`, maps to force.
    pub fn migrate(stored: Option<&str>) -> Self {
        match stored {
            Some("carbon") | Some("light") => Self::Carbon,
            _ => Self::Force,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Force => Self::Carbon,
            Self::Carbon => Self::Force,
        }
    }
}

pub fn apply_theme<D: Document>(doc: &D, theme: Theme) {
    let root = doc.root();
    doc.set_attribute(&root, "data-theme", theme.code());
    doc.set_style(&root, "color-scheme", "dark");
}

/// Loads (and normalises) the stored theme and applies it to the root.
pub fn init_theme<D: Document>(doc: &D, store: &dyn KeyValueStore, key: &str) -> Theme {
    let stored = store.get(key);
    let theme = Theme::migrate(stored.as_deref());
    if stored.as_deref() != Some(theme.code()) {
        store.set(key, theme.code());
    }
    apply_theme(doc, theme);
    theme
}

/// Persists, applies and relabels after a toggle click.
pub fn set_theme<D: Document>(
    doc: &D,
    store: &dyn KeyValueStore,
    key: &str,
    button: &D::Node,
    theme: Theme,
    lang: Lang,
) {
    store.set(key, theme.code());
    apply_theme(doc, theme);
    doc.set_inner_html(button, &theme_label_html(theme, lang));
    tracing::debug!("theme set to {}", theme.code());
}

/// Inserts the toggle into `.navbar-menu`, before the language item when
/// there is one. Returns the new button; `None` when there is no menu or a
/// toggle already exists.
pub fn ensure_toggle<D: Document>(doc: &D, theme: Theme, lang: Lang) -> Option<D::Node> {
    if doc.query(&Selector::class(TOGGLE_CLASS)).is_some() {
        return None;
    }
    let menu = doc.query(&Selector::class("navbar-menu"))?;
    let item = doc.create_element("li")?;
    let button = doc.create_element("button")?;
    doc.set_attribute(&item, "class", TOGGLE_ITEM_CLASS);
    doc.set_attribute(&button, "type", "button");
    doc.set_attribute(&button, "class", TOGGLE_CLASS);
    doc.set_attribute(&button, "aria-label", &t!(lang, "theme-toggle-label"));
    doc.set_inner_html(&button, &theme_label_html(theme, lang));
    doc.append_child(&item, &button);

    let lang_item = doc
        .query_all(&Selector::class("lang-item"))
        .into_iter()
        .find(|node| doc.contains(&menu, node));
    match lang_item {
        Some(reference) => doc.insert_before(&menu, &item, &reference),
        None => doc.append_child(&menu, &item),
    }
    Some(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, MemoryStore, BODY, ROOT};
    use rstest::rstest;

    const KEY: &str = "force-gym-theme";

    #[rstest]
    #[case(None, Theme::Force)]
    #[case(Some("dark"), Theme::Force)]
    #[case(Some("light"), Theme::Carbon)]
    #[case(Some("carbon"), Theme::Carbon)]
    #[case(Some("force"), Theme::Force)]
    #[case(Some("neon"), Theme::Force)]
    fn legacy_values_migrate(#[case] stored: Option<&str>, #[case] expected: Theme) {
        assert_eq!(Theme::migrate(stored), expected);
    }

    #[test]
    fn init_writes_back_the_migrated_value() {
        let doc = MemoryDocument::new();
        let store = MemoryStore::with(&[(KEY, "light")]);

        assert_eq!(init_theme(&doc, &store, KEY), Theme::Carbon);
        assert_eq!(store.get(KEY).as_deref(), Some("carbon"));
        assert_eq!(doc.attribute(&ROOT, "data-theme").as_deref(), Some("carbon"));
        assert_eq!(doc.style(ROOT, "color-scheme").as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_is_inserted_once_and_flips() {
        let doc = MemoryDocument::new();
        let menu = doc.add(BODY, "ul", &[("class", "navbar-menu")], "");
        doc.add(menu, "li", &[("class", "lang-item")], "");
        let store = MemoryStore::new();

        let button = ensure_toggle(&doc, Theme::Force, Lang::En).unwrap();
        assert!(ensure_toggle(&doc, Theme::Force, Lang::En).is_none());
        assert!(doc.contains(&menu, &button));
        assert_eq!(doc.attribute(&button, "aria-label").as_deref(), Some("Toggle theme"));

        set_theme(&doc, &store, KEY, &button, Theme::Force.flip(), Lang::En);
        assert_eq!(store.get(KEY).as_deref(), Some("carbon"));
        assert!(doc.inner_html(button).unwrap_or_default().contains("🌊"));
    }

    #[test]
    fn no_menu_no_toggle() {
        let doc = MemoryDocument::new();
        assert!(ensure_toggle(&doc, Theme::Force, Lang::En).is_none());
    }
}
