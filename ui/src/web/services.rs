//! Browser implementations of the platform traits.

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::document::WebDocument;
use crate::config::SiteConfig;
use crate::core::timing::sleep_ms;
use crate::core::{
    spawn_future, Browser, FetchError, Fetcher, KeyValueStore, ResolvedUrl, Toaster,
};
use crate::features::toast;

fn describe(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

/// `window.fetch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebFetcher;

impl WebFetcher {
    async fn get(url: &str) -> Result<String, FetchError> {
        let network = |reason: String| FetchError::Network {
            url: url.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| network("window unavailable".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|err| network(describe(err)))?
            .dyn_into()
            .map_err(|_| network("unexpected fetch result".into()))?;
        if !response.ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let body = |reason: String| FetchError::Body {
            url: url.to_string(),
            reason,
        };
        let text = response.text().map_err(|err| body(describe(err)))?;
        JsFuture::from(text)
            .await
            .map_err(|err| body(describe(err)))?
            .as_string()
            .ok_or_else(|| body("body is not text".into()))
    }
}

impl Fetcher for WebFetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        Self::get(url).boxed_local()
    }
}

/// `localStorage`; silently forgets when storage is blocked.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::debug!("localStorage rejected {key}");
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WebBrowser;

impl Browser for WebBrowser {
    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn origin(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }

    fn resolve(&self, href: &str) -> Option<ResolvedUrl> {
        let url = web_sys::Url::new_with_base(href, &self.origin()).ok()?;
        Some(ResolvedUrl {
            origin: url.origin(),
            pathname: url.pathname(),
        })
    }

    fn open_in_new_tab(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            window.open_with_url_and_target(url, "_blank").ok();
        }
    }

    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            window.location().set_href(url).ok();
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|query| query.matches())
    }

    fn save_data(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        Reflect::get(&window.navigator(), &JsValue::from_str("connection"))
            .ok()
            .filter(|connection| connection.is_object())
            .and_then(|connection| Reflect::get(&connection, &JsValue::from_str("saveData")).ok())
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false)
    }

    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), String>> {
        let payload = text.to_string();
        async move {
            match clipboard_api(&payload).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    tracing::debug!("async clipboard unavailable ({err}), using execCommand");
                    copy_with_textarea(&payload)
                }
            }
        }
        .boxed_local()
    }
}

/// `navigator.clipboard.writeText`, looked up dynamically since older
/// browsers and insecure origins lack it.
async fn clipboard_api(payload: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("window unavailable")?;
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))
        .map_err(describe)?;
    if !clipboard.is_object() {
        return Err("navigator.clipboard missing".into());
    }
    let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "writeText is not callable")?;
    let promise: Promise = write
        .call1(&clipboard, &JsValue::from_str(payload))
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "writeText did not return a promise")?;
    JsFuture::from(promise).await.map_err(describe)?;
    Ok(())
}

fn copy_with_textarea(payload: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("window unavailable")?;
    let document = window
        .document()
        .ok_or("document unavailable")?
        .dyn_into::<web_sys::HtmlDocument>()
        .map_err(|_| "not an HTML document")?;
    let body = document.body().ok_or("missing body")?;

    let textarea = document
        .create_element("textarea")
        .map_err(|_| "Unable to create textarea")?
        .dyn_into::<web_sys::HtmlTextAreaElement>()
        .map_err(|_| "Textarea cast failed")?;
    textarea.set_value(payload);
    let style = textarea.style();
    style.set_property("position", "fixed").ok();
    style.set_property("top", "0").ok();
    style.set_property("left", "0").ok();
    style.set_property("opacity", "0").ok();

    body.append_child(&textarea).ok();
    textarea.select();
    let copied = document.exec_command("copy").unwrap_or(false);
    textarea.remove();
    if copied {
        Ok(())
    } else {
        Err("Clipboard copy blocked".into())
    }
}

/// Shows messages in the shared `#toast-region`. A newer message restarts
/// the timers; stale timers find a different sequence number and stop.
pub struct WebToaster {
    doc: Rc<WebDocument>,
    sequence: Rc<Cell<u64>>,
    visible_ms: u32,
    fade_ms: u32,
}

impl WebToaster {
    pub fn new(doc: Rc<WebDocument>, config: &SiteConfig) -> Self {
        Self {
            doc,
            sequence: Rc::new(Cell::new(0)),
            visible_ms: config.toast_visible_ms,
            fade_ms: config.toast_fade_ms,
        }
    }
}

impl Toaster for WebToaster {
    fn show(&self, message: &str) {
        let Some(region) = toast::ensure_region(&*self.doc) else {
            return;
        };
        toast::show(&*self.doc, &region, message);

        let ticket = self.sequence.get() + 1;
        self.sequence.set(ticket);
        let sequence = self.sequence.clone();
        let doc = self.doc.clone();
        let (visible_ms, fade_ms) = (self.visible_ms, self.fade_ms);
        spawn_future(async move {
            sleep_ms(visible_ms).await;
            if sequence.get() != ticket {
                return;
            }
            toast::fade(&*doc, &region);
            sleep_ms(fade_ms).await;
            if sequence.get() == ticket {
                toast::hide(&*doc, &region);
            }
        });
    }
}
