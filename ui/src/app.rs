//! Site runtime: shared context, boot sequence and language-change pipeline.
//!
//! [`SiteContext`] owns everything the page features share. [`boot`] runs the
//! startup steps in a fixed order, handing event registration to a
//! [`Wiring`] so the same sequence drives the browser and the native tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::binder::{copy_from_trigger, update_ui};
use crate::config::SiteConfig;
use crate::content::{ContentDocument, ContentStore, PlanCard, SiteContent};
use crate::core::{spawn_future, Browser, Document, Fetcher, KeyValueStore, Selector, Toaster};
use crate::features::menu::MobileMenu;
use crate::features::reveal::RevealRegistry;
use crate::features::theme::{self, Theme};
use crate::features::{hero, nav, scroll, seo, transitions};
use crate::forms::{self, FormKind, SubmitContext};
use crate::i18n::{Lang, LanguageState};
use crate::partials::{inject_partials, PreloadedPartials};
use crate::views::membership::{paint_membership, MembershipLabels};
use crate::views::schedule::{paint_schedule, SCHEDULE_CONTAINER};
use crate::views::theme::theme_label_html;

/// Host services the runtime talks to.
pub struct Platform<D: Document> {
    pub doc: Rc<D>,
    pub fetcher: Rc<dyn Fetcher>,
    pub storage: Rc<dyn KeyValueStore>,
    pub browser: Rc<dyn Browser>,
    pub toaster: Rc<dyn Toaster>,
}

/// Data embedded in the page ahead of the runtime.
#[derive(Debug, Clone, Default)]
pub struct Preloaded {
    pub content: HashMap<Lang, Value>,
    pub schedule: Option<Value>,
    pub membership: Option<Value>,
    pub partials: PreloadedPartials,
}

pub struct SiteContext<D: Document> {
    pub config: SiteConfig,
    pub doc: Rc<D>,
    pub fetcher: Rc<dyn Fetcher>,
    pub storage: Rc<dyn KeyValueStore>,
    pub browser: Rc<dyn Browser>,
    pub toaster: Rc<dyn Toaster>,
    pub store: ContentStore,
    pub language: LanguageState,
    pub reveal: RevealRegistry<D>,
    partials: PreloadedPartials,
    active: RefCell<Option<Rc<ContentDocument>>>,
    /// Bumped by every content load; a load only paints if it is still the
    /// latest when its fetch resolves.
    generation: Cell<u64>,
    plans: RefCell<Vec<PlanCard>>,
    theme: Cell<Theme>,
}

impl<D: Document + 'static> SiteContext<D> {
    pub fn new(platform: Platform<D>, config: SiteConfig, preloaded: Preloaded) -> Rc<Self> {
        let store = ContentStore::new(platform.fetcher.clone(), &config);
        for (lang, raw) in preloaded.content {
            store.seed_content(lang, raw);
        }
        if let Some(raw) = preloaded.schedule {
            store.seed_schedule(raw);
        }
        if let Some(raw) = preloaded.membership {
            store.seed_membership(raw);
        }
        let language = LanguageState::new(
            platform.storage.clone(),
            platform.doc.clone(),
            config.lang_storage_key.clone(),
        );
        Rc::new(Self {
            doc: platform.doc,
            fetcher: platform.fetcher,
            storage: platform.storage,
            browser: platform.browser,
            toaster: platform.toaster,
            store,
            language,
            reveal: RevealRegistry::new(),
            partials: preloaded.partials,
            active: RefCell::new(None),
            generation: Cell::new(0),
            plans: RefCell::new(Vec::new()),
            theme: Cell::new(Theme::default()),
            config,
        })
    }

    pub fn lang(&self) -> Lang {
        self.language.current()
    }

    /// The content document currently painted, if any loaded.
    pub fn content(&self) -> Option<Rc<ContentDocument>> {
        self.active.borrow().clone()
    }

    /// Starts a load and returns its generation.
    pub fn begin_load(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Adopts a finished load unless a newer one started meanwhile. A load
    /// that produced nothing keeps the previous document.
    pub fn finish_load(&self, generation: u64, doc: Option<Rc<ContentDocument>>) -> bool {
        if !self.is_current(generation) {
            tracing::debug!("discarding stale content load #{generation}");
            return false;
        }
        if let Some(doc) = doc {
            *self.active.borrow_mut() = Some(doc);
        }
        true
    }

    /// Loads content for the current language. Returns the generation when
    /// the result was adopted.
    pub async fn load_content(&self) -> Option<u64> {
        let generation = self.begin_load();
        let doc = self.store.get_content(self.lang()).await;
        self.finish_load(generation, doc).then_some(generation)
    }

    /// Binder pass plus everything else that depends on the language.
    pub fn paint(&self) {
        let doc = &*self.doc;
        let lang = self.lang();
        if let Some(content) = self.content() {
            update_ui(doc, &content, lang, &self.config, &*self.browser);
        }
        nav::set_active_nav(doc, &self.browser.page_name());
        if let Some(button) = doc.query(&Selector::class(theme::TOGGLE_CLASS)) {
            doc.set_inner_html(&button, &theme_label_html(self.theme.get(), lang));
        }
    }

    fn site_or_default<R>(&self, f: impl FnOnce(&SiteContent) -> R) -> R {
        match self.content() {
            Some(content) => f(content.site()),
            None => f(&SiteContent::default()),
        }
    }

    /// Renders the pricing grid, benefit cards and plan selector on the
    /// membership page.
    pub async fn render_membership_if_needed(&self, generation: u64) {
        if self.browser.page_name().to_ascii_lowercase() != self.config.membership_page {
            return;
        }
        let Some(content) = self.content() else {
            return;
        };
        let Some(membership) = self.store.get_membership().await else {
            return;
        };
        if !self.is_current(generation) {
            return;
        }
        let lang = self.lang();
        let Some(cards) = membership.cards(content.site(), lang) else {
            tracing::warn!("membership document has no recognisable plans");
            return;
        };
        paint_membership(&*self.doc, &cards, &MembershipLabels::new(content.site(), lang));
        *self.plans.borrow_mut() = cards;
    }

    pub async fn render_schedule_if_needed(&self, generation: u64) {
        if self.doc.by_id(SCHEDULE_CONTAINER).is_none() {
            return;
        }
        let entries = self.store.get_schedule().await;
        if !self.is_current(generation) {
            return;
        }
        let lang = self.lang();
        self.site_or_default(|site| {
            paint_schedule(&*self.doc, &entries, site, lang, &self.config);
        });
    }

    /// Tags reveal targets and returns the ones still to observe.
    pub fn register_reveal(&self) -> Vec<D::Node> {
        self.reveal
            .register(&self.doc, self.browser.prefers_reduced_motion())
    }

    pub fn submit(&self, kind: FormKind) -> bool {
        let plans = self.plans.borrow();
        self.site_or_default(|site| {
            let ctx = SubmitContext {
                site,
                lang: self.lang(),
                config: &self.config,
                plans: &plans,
            };
            forms::submit_form(&*self.doc, kind, &ctx, &*self.browser, &*self.toaster)
        })
    }

    /// `input` event on a form control.
    pub fn revalidate(&self, kind: FormKind, input_id: &str) {
        if let Some(rule) = kind.rule_for(input_id) {
            let lang = self.lang();
            self.site_or_default(|site| forms::validate_field(&*self.doc, rule, site, lang));
        }
    }

    pub fn toggle_password(&self, button: &D::Node) {
        let lang = self.lang();
        self.site_or_default(|site| {
            forms::password::toggle_visibility(&*self.doc, button, site, lang)
        });
    }

    pub async fn copy(&self, trigger: &D::Node) {
        let content = self.content();
        copy_from_trigger(
            &*self.doc,
            trigger,
            content.as_deref(),
            self.lang(),
            &*self.browser,
            &*self.toaster,
        )
        .await;
    }

    pub fn flip_theme(&self, button: &D::Node) {
        let next = self.theme.get().flip();
        theme::set_theme(
            &*self.doc,
            &*self.storage,
            &self.config.theme_storage_key,
            button,
            next,
            self.lang(),
        );
        self.theme.set(next);
    }
}

/// Event registration for the browser.
///
/// Every hook receives DOM state [`boot`] has already prepared; the default
/// implementations register nothing.
#[allow(unused_variables)]
pub trait Wiring<D: Document + 'static> {
    fn mobile_menu(&self, ctx: &Rc<SiteContext<D>>, menu: MobileMenu<D>) {}
    /// Document-level delegated clicks: language toggle, copy buttons and
    /// password toggles.
    fn delegated_clicks(&self, ctx: &Rc<SiteContext<D>>) {}
    /// Starts playback; a rejected `play()` should fall back to the image.
    fn hero_video(&self, ctx: &Rc<SiteContext<D>>, video: D::Node) {}
    fn form(&self, ctx: &Rc<SiteContext<D>>, kind: FormKind, form: D::Node) {}
    fn back_to_top(&self, ctx: &Rc<SiteContext<D>>, button: D::Node) {}
    fn scroll_spy(&self, ctx: &Rc<SiteContext<D>>, sections: Vec<D::Node>) {}
    fn observe_reveal(&self, ctx: &Rc<SiteContext<D>>, nodes: Vec<D::Node>) {}
    /// The single throttled scroll listener, plus one initial update.
    fn scroll(&self, ctx: &Rc<SiteContext<D>>) {}
    fn theme_toggle(&self, ctx: &Rc<SiteContext<D>>, button: D::Node) {}
    fn smooth_scroll(&self, ctx: &Rc<SiteContext<D>>, anchors: Vec<D::Node>) {}
    /// Link interception, the ready frames and `pageshow` restores.
    fn page_transitions(&self, ctx: &Rc<SiteContext<D>>) {}
}

/// Wiring that registers no events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWiring;

impl<D: Document + 'static> Wiring<D> for NoWiring {}

/// Brings a page to life.
pub async fn boot<D: Document + 'static>(ctx: Rc<SiteContext<D>>, wiring: Rc<dyn Wiring<D>>) {
    let doc = &*ctx.doc;
    inject_partials(
        doc,
        &*ctx.fetcher,
        &*ctx.browser,
        &ctx.config,
        &ctx.partials,
    )
    .await;

    if let Some(menu) = MobileMenu::find(doc) {
        wiring.mobile_menu(&ctx, menu);
    }

    let generation = ctx.load_content().await.unwrap_or_default();
    wiring.delegated_clicks(&ctx);
    ctx.paint();
    ctx.render_membership_if_needed(generation).await;

    if let Some(video) = hero::hero_video(doc) {
        if hero::should_use_fallback(ctx.browser.prefers_reduced_motion(), ctx.browser.save_data()) {
            hero::show_fallback(doc);
        } else {
            wiring.hero_video(&ctx, video);
        }
    }

    for kind in FormKind::ALL {
        if let Some(form) = forms::prepare(doc, kind) {
            wiring.form(&ctx, kind, form);
        }
    }

    if let Some(button) = scroll::ensure_back_to_top(doc, ctx.lang()) {
        wiring.back_to_top(&ctx, button);
    }
    scroll::ensure_scroll_progress(doc);
    let sections = nav::spy_sections(doc);
    if !sections.is_empty() {
        wiring.scroll_spy(&ctx, sections);
    }

    ctx.render_schedule_if_needed(generation).await;

    let fresh = ctx.register_reveal();
    wiring.observe_reveal(&ctx, fresh);
    wiring.scroll(&ctx);

    let current = theme::init_theme(doc, &*ctx.storage, &ctx.config.theme_storage_key);
    ctx.theme.set(current);
    if let Some(button) = theme::ensure_toggle(doc, current, ctx.lang()) {
        wiring.theme_toggle(&ctx, button);
    }

    if ctx.browser.prefers_reduced_motion() {
        nav::disable_smooth_scrolling(doc);
    } else {
        wiring.smooth_scroll(&ctx, nav::smooth_scroll_anchors(doc));
    }

    transitions::mark_loading(doc);
    wiring.page_transitions(&ctx);

    if let Some(content) = ctx.content() {
        seo::inject_json_ld(doc, content.site(), &ctx.config, &ctx.browser.page_name());
    }

    let weak = Rc::downgrade(&ctx);
    let hooks = wiring.clone();
    ctx.language.subscribe(move |lang| {
        if let Some(ctx) = weak.upgrade() {
            spawn_future(on_language_changed(ctx, hooks.clone(), lang));
        }
    });
    tracing::info!("site runtime ready ({})", ctx.lang());
}

/// Reload and repaint after a language switch. A switch that is overtaken
/// by a newer one stops without painting.
pub async fn on_language_changed<D: Document + 'static>(
    ctx: Rc<SiteContext<D>>,
    wiring: Rc<dyn Wiring<D>>,
    lang: Lang,
) {
    let generation = ctx.begin_load();
    let doc = ctx.store.get_content(lang).await;
    if !ctx.finish_load(generation, doc) {
        return;
    }
    ctx.paint();
    ctx.render_membership_if_needed(generation).await;
    ctx.render_schedule_if_needed(generation).await;
    if ctx.is_current(generation) {
        let fresh = ctx.register_reveal();
        wiring.observe_reveal(&ctx, fresh);
    }
}
