//! DOM event registration for the browser build.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, HtmlMediaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    MouseEvent, PageTransitionEvent, ScrollBehavior, ScrollToOptions,
};

use super::document::WebDocument;
use crate::app::{SiteContext, Wiring};
use crate::binder::{copy_buttons, LANGUAGE_TOGGLE_ID};
use crate::core::timing::{next_frame, sleep_ms};
use crate::core::{spawn_future, Document, Selector};
use crate::features::menu::MobileMenu;
use crate::features::scroll::{apply_scroll_ui, ScrollMetrics};
use crate::features::transitions::{self, LinkClick};
use crate::features::{hero, nav, reveal};
use crate::forms::{password, FormKind};

type Ctx = Rc<SiteContext<WebDocument>>;

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::warn!("could not listen for {event}");
    }
    closure.forget();
}

fn listen_passive(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    if target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .is_err()
    {
        tracing::warn!("could not listen for {event}");
    }
    closure.forget();
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// An observer that calls `on_visible` for every entry that starts
/// intersecting.
fn intersection_observer(
    threshold: f64,
    root_margin: Option<&str>,
    mut on_visible: impl FnMut(&Element, &IntersectionObserver) + 'static,
) -> Option<IntersectionObserver> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    on_visible(&entry.target(), &observer);
                }
            }
        },
    );
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            callback.forget();
            Some(observer)
        }
        Err(_) => {
            tracing::warn!("IntersectionObserver unavailable");
            None
        }
    }
}

fn scroll_metrics() -> Option<ScrollMetrics> {
    let window = web_sys::window()?;
    let root = window.document()?.document_element()?;
    Some(ScrollMetrics {
        scroll_y: window.scroll_y().unwrap_or(0.0),
        scroll_height: f64::from(root.scroll_height()),
        client_height: f64::from(root.client_height()),
    })
}

fn scroll_window_to(top: f64, smooth: bool) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(if smooth {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Auto
    });
    window.scroll_to_with_scroll_to_options(&options);
}

/// Registers the real listeners and observers.
#[derive(Default)]
pub struct WebWiring {
    reveal_observer: RefCell<Option<IntersectionObserver>>,
    spy_observer: RefCell<Option<IntersectionObserver>>,
}

impl Wiring<WebDocument> for WebWiring {
    fn mobile_menu(&self, ctx: &Ctx, menu: MobileMenu<WebDocument>) {
        let menu = Rc::new(menu);
        let toggler: EventTarget = menu.toggler.clone().into();
        let panel: EventTarget = menu.menu.clone().into();

        let (doc, m) = (ctx.doc.clone(), menu.clone());
        listen(&toggler, "click", move |_| m.toggle(&*doc));

        let (doc, m) = (ctx.doc.clone(), menu.clone());
        listen(&panel, "click", move |event| {
            if let Some(target) = event_element(&event) {
                m.on_menu_click(&*doc, &target);
            }
        });

        let (doc, m) = (ctx.doc.clone(), menu.clone());
        listen(ctx.doc.raw(), "click", move |event| {
            if let Some(target) = event_element(&event) {
                m.on_document_click(&*doc, &target);
            }
        });

        let (doc, m) = (ctx.doc.clone(), menu);
        listen(ctx.doc.raw(), "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            match key.key().as_str() {
                "Escape" => m.on_escape(&*doc),
                "Tab" => {
                    if m.on_tab(&*doc, key.shift_key()) {
                        event.prevent_default();
                    }
                }
                _ => {}
            }
        });
    }

    fn delegated_clicks(&self, ctx: &Ctx) {
        let ctx = ctx.clone();
        let raw = ctx.doc.raw().clone();
        listen(&raw, "click", move |event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let doc = &*ctx.doc;
            if doc.closest(&target, &Selector::id(LANGUAGE_TOGGLE_ID)).is_some() {
                ctx.language.toggle();
            } else if let Some(button) = doc.closest(&target, &copy_buttons()) {
                let ctx = ctx.clone();
                spawn_future(async move { ctx.copy(&button).await });
            } else if let Some(button) = doc.closest(&target, &password::toggles()) {
                event.prevent_default();
                ctx.toggle_password(&button);
            }
        });
    }

    fn hero_video(&self, ctx: &Ctx, video: Element) {
        let Some(media) = video.dyn_ref::<HtmlMediaElement>() else {
            return;
        };
        match media.play() {
            Ok(promise) => {
                let doc = ctx.doc.clone();
                spawn_future(async move {
                    if JsFuture::from(promise).await.is_err() {
                        tracing::debug!("hero autoplay rejected");
                        hero::show_fallback(&*doc);
                    }
                });
            }
            Err(_) => hero::show_fallback(&*ctx.doc),
        }
    }

    fn form(&self, ctx: &Ctx, kind: FormKind, form: Element) {
        let target: EventTarget = form.into();

        let c = ctx.clone();
        listen(&target, "input", move |event| {
            if let Some(input) = event_element(&event) {
                c.revalidate(kind, &input.id());
            }
        });

        let c = ctx.clone();
        listen(&target, "submit", move |event| {
            event.prevent_default();
            c.submit(kind);
        });
    }

    fn back_to_top(&self, ctx: &Ctx, button: Element) {
        let browser = ctx.browser.clone();
        listen(&button, "click", move |_| {
            scroll_window_to(0.0, !browser.prefers_reduced_motion());
        });
    }

    fn scroll_spy(&self, ctx: &Ctx, sections: Vec<Element>) {
        let doc = ctx.doc.clone();
        let Some(observer) =
            intersection_observer(ctx.config.scroll_spy_threshold, None, move |section, _| {
                nav::mark_spy_active(&*doc, section);
            })
        else {
            return;
        };
        for section in &sections {
            observer.observe(section);
        }
        *self.spy_observer.borrow_mut() = Some(observer);
    }

    fn observe_reveal(&self, ctx: &Ctx, nodes: Vec<Element>) {
        if nodes.is_empty() {
            return;
        }
        let mut slot = self.reveal_observer.borrow_mut();
        if slot.is_none() {
            let doc = ctx.doc.clone();
            *slot = intersection_observer(
                ctx.config.reveal_threshold,
                Some(ctx.config.reveal_root_margin.as_str()),
                move |node, observer| {
                    reveal::reveal(&*doc, node);
                    observer.unobserve(node);
                },
            );
        }
        match slot.as_ref() {
            Some(observer) => nodes.iter().for_each(|node| observer.observe(node)),
            // Without an observer nothing would ever appear.
            None => nodes.iter().for_each(|node| reveal::reveal(&*ctx.doc, node)),
        }
    }

    fn scroll(&self, ctx: &Ctx) {
        let update = {
            let ctx = ctx.clone();
            move || {
                if let Some(metrics) = scroll_metrics() {
                    apply_scroll_ui(&*ctx.doc, metrics, &ctx.config);
                }
            }
        };
        update();

        let Some(window) = web_sys::window() else {
            return;
        };
        let ticking = Rc::new(Cell::new(false));
        listen_passive(&window, "scroll", move |_| {
            if ticking.replace(true) {
                return;
            }
            let ticking = ticking.clone();
            let update = update.clone();
            next_frame(move || {
                ticking.set(false);
                update();
            });
        });
    }

    fn theme_toggle(&self, ctx: &Ctx, button: Element) {
        let ctx = ctx.clone();
        let target = button.clone();
        listen(&target, "click", move |_| ctx.flip_theme(&button));
    }

    fn smooth_scroll(&self, ctx: &Ctx, anchors: Vec<Element>) {
        for anchor in anchors {
            let ctx = ctx.clone();
            let link = anchor.clone();
            listen(&anchor, "click", move |event| {
                let doc = &*ctx.doc;
                let Some(target) = nav::anchor_target(doc, &link) else {
                    return;
                };
                event.prevent_default();
                let nav_height = doc
                    .query(&Selector::class("navbar"))
                    .and_then(|navbar| navbar.dyn_into::<HtmlElement>().ok())
                    .map(|navbar| f64::from(navbar.offset_height()));
                let scroll_y = web_sys::window()
                    .and_then(|w| w.scroll_y().ok())
                    .unwrap_or(0.0);
                let top = nav::scroll_offset(
                    target.get_bounding_client_rect().top(),
                    scroll_y,
                    nav_height,
                    &ctx.config,
                );
                scroll_window_to(top, true);
                if let (Some(window), Some(href)) = (web_sys::window(), link.get_attribute("href")) {
                    if let Ok(history) = window.history() {
                        history.push_state_with_url(&JsValue::NULL, "", Some(&href)).ok();
                    }
                }
            });
        }
    }

    fn page_transitions(&self, ctx: &Ctx) {
        let doc = ctx.doc.clone();
        next_frame(move || next_frame(move || transitions::mark_ready(&*doc)));

        let c = ctx.clone();
        listen(ctx.doc.raw(), "click", move |event| {
            if event.default_prevented() {
                return;
            }
            let Some(target) = event_element(&event) else {
                return;
            };
            let anchors = Selector::tag("a").and(Selector::attr("href"));
            let Some(anchor) = c.doc.closest(&target, &anchors) else {
                return;
            };
            let href = anchor.get_attribute("href").unwrap_or_default();
            let modified = event
                .dyn_ref::<MouseEvent>()
                .is_some_and(|mouse| mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key());
            let click = LinkClick {
                href: &href,
                new_tab: modified || anchor.get_attribute("target").as_deref() == Some("_blank"),
                download: anchor.has_attribute("download"),
            };
            let Some(url) = transitions::navigation_target(click, &*c.browser) else {
                return;
            };
            event.prevent_default();
            if c.browser.prefers_reduced_motion() {
                c.browser.navigate(&url);
                return;
            }
            transitions::mark_navigating(&*c.doc);
            let browser = c.browser.clone();
            let delay = c.config.navigate_delay_ms;
            spawn_future(async move {
                sleep_ms(delay).await;
                browser.navigate(&url);
            });
        });

        let Some(window) = web_sys::window() else {
            return;
        };
        let doc = ctx.doc.clone();
        listen(&window, "pageshow", move |event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            if persisted {
                transitions::restore(&*doc);
            }
        });
    }
}
