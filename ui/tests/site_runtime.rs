//! Boot and language-switch pipeline against the in-memory platform.

use std::rc::Rc;

use futures::executor::block_on;
use serde_json::json;

use ui::app::{boot, NoWiring, Platform, Preloaded, SiteContext, Wiring};
use ui::config::SiteConfig;
use ui::content::ContentDocument;
use ui::core::memory::{
    MemoryBrowser, MemoryDocument, MemoryFetcher, MemoryStore, MemoryToaster, NodeId, BODY, ROOT,
};
use ui::core::platform::run_until_stalled;
use ui::core::{Document, KeyValueStore};
use ui::features::seo::JSON_LD_ID;
use ui::i18n::Lang;

const EN_URL: &str = "data/site.en.json";
const AR_URL: &str = "data/site.ar.json";

struct Site {
    doc: Rc<MemoryDocument>,
    fetcher: Rc<MemoryFetcher>,
    storage: Rc<MemoryStore>,
    browser: Rc<MemoryBrowser>,
    toaster: Rc<MemoryToaster>,
    headline: NodeId,
}

impl Site {
    fn at(pathname: &str) -> Self {
        let doc = Rc::new(MemoryDocument::new());
        let headline = doc.add(BODY, "h1", &[("data-i18n", "hero.title")], "Placeholder");
        let fetcher = Rc::new(MemoryFetcher::new());
        fetcher.respond(
            EN_URL,
            json!({ "siteName": "Force Gym", "phone": "01012345678", "hero": { "title": "Train hard" } })
                .to_string(),
        );
        Self {
            doc,
            fetcher,
            storage: Rc::new(MemoryStore::new()),
            browser: Rc::new(MemoryBrowser::at(pathname)),
            toaster: Rc::new(MemoryToaster::default()),
            headline,
        }
    }

    fn with_arabic(self) -> Self {
        self.fetcher.respond(
            AR_URL,
            json!({ "siteName": "فورس جيم", "hero": { "title": "تمرن بقوة" } }).to_string(),
        );
        self
    }

    fn context(&self) -> Rc<SiteContext<MemoryDocument>> {
        let platform = Platform {
            doc: self.doc.clone(),
            fetcher: self.fetcher.clone(),
            storage: self.storage.clone(),
            browser: self.browser.clone(),
            toaster: self.toaster.clone(),
        };
        SiteContext::new(platform, SiteConfig::default(), Preloaded::default())
    }

    fn boot(&self) -> Rc<SiteContext<MemoryDocument>> {
        let ctx = self.context();
        let wiring: Rc<dyn Wiring<MemoryDocument>> = Rc::new(NoWiring);
        block_on(boot(ctx.clone(), wiring));
        run_until_stalled();
        ctx
    }

    fn headline(&self) -> String {
        self.doc.text(&self.headline)
    }

    fn root_attr(&self, name: &str) -> Option<String> {
        self.doc.attribute(&ROOT, name)
    }
}

#[test]
fn boot_paints_the_home_page() {
    let site = Site::at("/");
    let navbar = site.doc.add(BODY, "div", &[("id", "site-navbar")], "");
    site.fetcher
        .respond("partials/navbar.html", "<nav class=\"navbar\"></nav>");

    let ctx = site.boot();

    assert_eq!(site.doc.inner_html(navbar).as_deref(), Some("<nav class=\"navbar\"></nav>"));
    assert_eq!(site.headline(), "Train hard");
    assert_eq!(site.doc.title(), "Force Gym");
    assert_eq!(site.root_attr("lang").as_deref(), Some("en"));
    assert_eq!(site.root_attr("dir").as_deref(), Some("ltr"));
    assert_eq!(site.root_attr("data-theme").as_deref(), Some("force"));
    assert!(site.doc.by_id(JSON_LD_ID).is_some());
    assert!(site.doc.has_class(&BODY, "page-transition"));
    assert_eq!(ctx.lang(), Lang::En);
}

#[test]
fn missing_partials_leave_placeholders_alone() {
    let site = Site::at("/index.html");
    let footer = site.doc.add(BODY, "div", &[("id", "site-footer")], "Footer");

    site.boot();

    assert_eq!(site.doc.inner_html(footer), None);
    assert_eq!(site.doc.text(&footer), "Footer");
    assert_eq!(site.headline(), "Train hard");
}

#[test]
fn switching_language_repaints_and_persists() {
    let site = Site::at("/index.html").with_arabic();
    let ctx = site.boot();

    ctx.language.set_language(Lang::Ar);
    run_until_stalled();

    assert_eq!(site.headline(), "تمرن بقوة");
    assert_eq!(site.root_attr("lang").as_deref(), Some("ar"));
    assert_eq!(site.root_attr("dir").as_deref(), Some("rtl"));
    assert_eq!(site.storage.get("force-gym-lang").as_deref(), Some("ar"));

    ctx.language.toggle();
    run_until_stalled();
    assert_eq!(site.headline(), "Train hard");
    assert_eq!(site.fetcher.request_count(EN_URL), 1, "English comes from the cache");
}

#[test]
fn same_language_is_a_no_op() {
    let site = Site::at("/index.html");
    let ctx = site.boot();
    let before = site.fetcher.requests().len();

    ctx.language.set_language(Lang::En);
    run_until_stalled();

    assert_eq!(site.fetcher.requests().len(), before);
    assert_eq!(site.storage.get("force-gym-lang"), None);
}

#[test]
fn unavailable_language_falls_back_to_english() {
    let site = Site::at("/index.html");
    site.storage.set("force-gym-lang", "ar");

    let ctx = site.boot();

    assert_eq!(ctx.lang(), Lang::Ar);
    assert_eq!(site.root_attr("dir").as_deref(), Some("rtl"));
    assert_eq!(site.headline(), "Train hard");
    assert!(ctx.store.cached_content(Lang::Ar).is_none());
    assert!(ctx.store.cached_content(Lang::En).is_some());
}

#[test]
fn nothing_loads_without_any_content() {
    let site = Site::at("/index.html");
    site.fetcher.fail(EN_URL);

    let ctx = site.boot();

    assert!(ctx.content().is_none());
    assert_eq!(site.headline(), "Placeholder");
    assert!(site.doc.by_id(JSON_LD_ID).is_none());
}

#[test]
fn stale_loads_are_discarded() {
    let site = Site::at("/index.html");
    let ctx = site.context();
    let first = Rc::new(ContentDocument::parse(r#"{ "siteName": "First" }"#).unwrap());
    let second = Rc::new(ContentDocument::parse(r#"{ "siteName": "Second" }"#).unwrap());

    let older = ctx.begin_load();
    let newer = ctx.begin_load();
    assert!(!ctx.finish_load(older, Some(first)));
    assert!(ctx.content().is_none());

    assert!(ctx.finish_load(newer, Some(second)));
    assert_eq!(
        ctx.content().and_then(|c| c.site().site_name.clone()).as_deref(),
        Some("Second")
    );
}

#[test]
fn missing_social_links_are_tolerated() {
    let site = Site::at("/index.html");
    let instagram = site.doc.add(
        BODY,
        "a",
        &[("href", "https://instagram.com/placeholder")],
        "Instagram",
    );

    site.boot();

    assert_eq!(
        site.doc.attribute(&instagram, "href").as_deref(),
        Some("https://instagram.com/placeholder")
    );
}

#[test]
fn membership_page_renders_plans() {
    let site = Site::at("/membership.html");
    let grid = site.doc.add(BODY, "div", &[("id", "pricing-grid")], "");
    let select = site.doc.add(BODY, "select", &[("id", "req-plan")], "");
    site.fetcher.respond(
        "data/membership.json",
        json!({ "plans": [
            { "duration": { "months": 1 }, "pricing": { "now": 500, "was": 600 } },
            { "duration": { "months": 3 }, "pricing": { "now": 1350, "was": 1800 } }
        ] })
        .to_string(),
    );

    site.boot();

    let cards = site.doc.inner_html(grid).unwrap_or_default();
    assert!(cards.contains("<h3>1 Month</h3>"), "{cards}");
    assert!(cards.contains("<h3>3 Months</h3>"), "{cards}");
    assert!(cards.contains("<strong>500</strong>"), "{cards}");

    let options = site.doc.inner_html(select).unwrap_or_default();
    assert!(options.contains(">1 Month - 500 EGP<"), "{options}");
    assert!(options.contains(">3 Months - 1350 EGP<"), "{options}");
    assert!(
        !cards.contains(['\u{2068}', '\u{2069}']) && !options.contains(['\u{2068}', '\u{2069}']),
        "bidi isolation marks leaked"
    );
}

#[test]
fn content_with_null_blocks_still_paints() {
    let site = Site::at("/index.html");
    site.fetcher.respond(
        EN_URL,
        json!({ "siteName": "Force Gym", "phone": 1012345678, "social": null, "hero": { "title": "Train hard" } })
            .to_string(),
    );

    let ctx = site.boot();

    assert_eq!(site.headline(), "Train hard");
    assert_eq!(
        ctx.content().and_then(|c| c.site().phone.clone()).as_deref(),
        Some("1012345678")
    );
}

#[test]
fn membership_grid_is_ignored_elsewhere() {
    let site = Site::at("/index.html");
    let grid = site.doc.add(BODY, "div", &[("id", "pricing-grid")], "");

    site.boot();

    assert_eq!(site.doc.inner_html(grid), None);
    assert_eq!(site.fetcher.request_count("data/membership.json"), 0);
}

#[test]
fn schedule_renders_one_row_per_session() {
    let site = Site::at("/schedule.html");
    let container = site.doc.add(BODY, "div", &[("id", "schedule-display")], "");
    site.fetcher.respond(
        "data/schedule.json",
        json!([ { "day": "Monday", "time": "6pm", "class": "Boxing", "instructor": "Ali" } ])
            .to_string(),
    );

    site.boot();

    let html = site.doc.inner_html(container).unwrap_or_default();
    assert_eq!(html.matches("<td").count(), 4, "{html}");
    assert!(html.contains("Boxing"));
    assert!(html.contains("Monday"));
}

#[test]
fn failed_schedule_shows_the_whatsapp_placeholder() {
    let site = Site::at("/schedule.html");
    let container = site.doc.add(BODY, "div", &[("id", "schedule-display")], "");

    site.boot();

    let html = site.doc.inner_html(container).unwrap_or_default();
    assert!(html.contains("https://wa.me/201012345678"), "{html}");
    assert!(html.contains("Schedule will be updated soon."));
}
