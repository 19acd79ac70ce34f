//! Languages, language state and the built-in string catalogue.
//!
//! Site copy lives in the per-language content documents. This module covers
//! the rest: the two supported languages, the persisted [`LanguageState`], and
//! the Fluent catalogue for strings the runtime itself produces (toasts,
//! validation errors, fallback labels).
//!
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/forcegym-ui.ftl   (fallback/reference)
//!   ar-EG/forcegym-ui.ftl
//! ```
//!
//! Each language has its own loader, so lookups never depend on a global
//! "current" locale:
//! ```ignore
//! use crate::t;
//! let label = t!(Lang::Ar, "schedule-col-day");
//! let error = t!(lang, "name-min", min = 2_i64);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

use crate::core::{KeyValueStore, RootAttributes};

pub use i18n_embed_fl::fl;

/// Translation lookup against the catalogue of an explicit [`Lang`].
///
/// ```ignore
/// t!(lang, "copied")
/// t!(lang, "name-min", min = 2_i64)
/// ```
#[macro_export]
macro_rules! t {
    ($lang:expr, $key:literal) => {
        $crate::i18n::fl!($crate::i18n::loader($lang), $key)
    };
    ($lang:expr, $key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!($crate::i18n::loader($lang), $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain; the catalogue file is `i18n/<locale>/{DOMAIN}.ftl`.
const DOMAIN: &str = "forcegym-ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

static EN_LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| build_loader(Lang::En));
static AR_LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| build_loader(Lang::Ar));

fn build_loader(lang: Lang) -> FluentLanguageLoader {
    let fallback: LanguageIdentifier = Lang::DEFAULT.locale();
    let loader = FluentLanguageLoader::new(DOMAIN, fallback);
    if let Err(err) = i18n_embed::select(&loader, &Localizations, &[lang.locale()]) {
        tracing::warn!("failed loading {} catalogue ({err}); using fallback", lang.code());
    }
    // Only affects bundles that are already loaded, so this must follow `select`.
    // Messages are spliced into plain text and URLs where isolation marks would leak.
    loader.set_use_isolating(false);
    loader
}

/// The loader backing [`t!`] for `lang`.
pub fn loader(lang: Lang) -> &'static FluentLanguageLoader {
    match lang {
        Lang::En => &*EN_LOADER,
        Lang::Ar => &*AR_LOADER,
    }
}

/// Locale folders embedded in the binary.
pub fn available_locales() -> Vec<String> {
    let mut locales = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    locales.sort();
    locales.dedup();
    locales
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    pub const DEFAULT: Lang = Lang::En;

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    pub fn parse(code: &str) -> Option<Lang> {
        match code.trim() {
            "en" => Some(Lang::En),
            "ar" => Some(Lang::Ar),
            _ => None,
        }
    }

    /// Value for the root `dir` attribute.
    pub fn direction(self) -> &'static str {
        match self {
            Lang::En => "ltr",
            Lang::Ar => "rtl",
        }
    }

    pub fn other(self) -> Lang {
        match self {
            Lang::En => Lang::Ar,
            Lang::Ar => Lang::En,
        }
    }

    pub fn locale_tag(self) -> &'static str {
        match self {
            Lang::En => "en-US",
            Lang::Ar => "ar-EG",
        }
    }

    pub fn locale(self) -> LanguageIdentifier {
        self.locale_tag().parse().unwrap_or_default()
    }

    /// Label of the language toggle while `self` is active: it names the
    /// language the toggle switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Lang::En => "عربي",
            Lang::Ar => "EN",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Subscriber = Box<dyn Fn(Lang)>;

/// The active language: persisted, reflected on the root element, observable.
pub struct LanguageState {
    current: Cell<Lang>,
    storage_key: String,
    store: Rc<dyn KeyValueStore>,
    root: Rc<dyn RootAttributes>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl LanguageState {
    /// Reads the persisted code (unknown or missing → default) and applies
    /// `lang`/`dir` to the root element right away.
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        root: Rc<dyn RootAttributes>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let current = store
            .get(&storage_key)
            .and_then(|code| Lang::parse(&code))
            .unwrap_or(Lang::DEFAULT);
        root.apply_language(current.code(), current.direction());
        Self {
            current: Cell::new(current),
            storage_key,
            store,
            root,
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Lang {
        self.current.get()
    }

    /// No-op when `lang` is already active. Otherwise persists, updates the
    /// root attributes and notifies subscribers in subscription order.
    pub fn set_language(&self, lang: Lang) {
        if lang == self.current.get() {
            return;
        }
        self.current.set(lang);
        self.store.set(&self.storage_key, lang.code());
        self.root.apply_language(lang.code(), lang.direction());
        tracing::info!("language switched to {lang}");
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(lang);
        }
    }

    pub fn toggle(&self) {
        self.set_language(self.current().other());
    }

    pub fn subscribe(&self, callback: impl Fn(Lang) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{MemoryDocument, MemoryStore, ROOT};
    use crate::core::Document;

    fn state_with(stored: Option<&str>) -> (Rc<MemoryStore>, Rc<MemoryDocument>, LanguageState) {
        let store = Rc::new(MemoryStore::new());
        if let Some(code) = stored {
            store.set("force-gym-lang", code);
        }
        let doc = Rc::new(MemoryDocument::new());
        let state = LanguageState::new(store.clone(), doc.clone(), "force-gym-lang");
        (store, doc, state)
    }

    #[test]
    fn fallback_locale_is_embedded() {
        let locales = available_locales();
        assert!(locales.iter().any(|l| l == "en-US"));
        assert!(locales.iter().any(|l| l == "ar-EG"));
    }

    #[test]
    fn lookups_are_per_language() {
        assert_eq!(t!(Lang::En, "schedule-col-day"), "Day");
        assert_eq!(t!(Lang::Ar, "schedule-col-day"), "اليوم");
        assert_eq!(t!(Lang::En, "name-min", min = 2_i64), "Name must be at least 2 characters");
    }

    #[test]
    fn english_durations_pluralize() {
        assert_eq!(t!(Lang::En, "duration-months", count = 1_i64), "1 Month");
        assert_eq!(t!(Lang::En, "duration-months", count = 3_i64), "3 Months");
        assert_eq!(t!(Lang::Ar, "duration-months", count = 3_i64), "3 شهر");
    }

    #[test]
    fn construction_applies_persisted_language() {
        let (_, doc, state) = state_with(Some("ar"));
        assert_eq!(state.current(), Lang::Ar);
        assert_eq!(doc.attribute(&ROOT, "dir").as_deref(), Some("rtl"));
        assert_eq!(doc.attribute(&ROOT, "lang").as_deref(), Some("ar"));
    }

    #[test]
    fn unknown_persisted_code_uses_default() {
        let (_, doc, state) = state_with(Some("fr"));
        assert_eq!(state.current(), Lang::En);
        assert_eq!(doc.attribute(&ROOT, "dir").as_deref(), Some("ltr"));
    }

    #[test]
    fn repeated_set_language_notifies_once() {
        let (store, doc, state) = state_with(None);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = calls.clone();
        state.subscribe(move |lang| seen.borrow_mut().push(lang));

        state.set_language(Lang::Ar);
        state.set_language(Lang::Ar);

        assert_eq!(*calls.borrow(), vec![Lang::Ar]);
        assert_eq!(store.get("force-gym-lang").as_deref(), Some("ar"));
        assert_eq!(doc.attribute(&ROOT, "dir").as_deref(), Some("rtl"));
    }

    #[test]
    fn subscribers_run_in_order() {
        let (_, _, state) = state_with(None);
        let order = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let order = order.clone();
            state.subscribe(move |_| order.borrow_mut().push(id));
        }
        state.toggle();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        assert_eq!(state.current(), Lang::Ar);
    }

    #[test]
    fn toggle_label_names_the_other_language() {
        assert_eq!(Lang::En.toggle_label(), "عربي");
        assert_eq!(Lang::Ar.toggle_label(), "EN");
    }
}
