//! Browser bindings: the live DOM, window services and event wiring.

mod document;
mod preload;
mod services;
mod wiring;

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub use document::WebDocument;
pub use services::{LocalStore, WebBrowser, WebFetcher, WebToaster};
pub use wiring::WebWiring;

use crate::app::{boot, Platform, SiteContext, Wiring};
use crate::config::SiteConfig;
use crate::core::spawn_future;

/// Boots the runtime once the document has been parsed.
pub fn start() {
    let Some(window) = web_sys::window() else {
        tracing::error!("no window; runtime not started");
        return;
    };
    let Some(document) = window.document() else {
        tracing::error!("no document; runtime not started");
        return;
    };
    if document.ready_state() != "loading" {
        launch();
        return;
    }
    let on_ready = Closure::once_into_js(launch);
    if document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .is_err()
    {
        tracing::error!("could not wait for DOMContentLoaded");
    }
}

fn launch() {
    let Some(doc) = WebDocument::from_window() else {
        tracing::error!("document unavailable");
        return;
    };
    let doc = Rc::new(doc);
    let config = SiteConfig::from_document(&*doc);
    let platform = Platform {
        doc: doc.clone(),
        fetcher: Rc::new(WebFetcher),
        storage: Rc::new(LocalStore),
        browser: Rc::new(WebBrowser),
        toaster: Rc::new(WebToaster::new(doc, &config)),
    };
    let ctx = SiteContext::new(platform, config, preload::read());
    let wiring: Rc<dyn Wiring<WebDocument>> = Rc::new(WebWiring::default());
    spawn_future(boot(ctx, wiring));
}
