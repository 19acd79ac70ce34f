//! Documents a page embeds ahead of the runtime as `window` globals.

use js_sys::{Reflect, JSON};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::app::Preloaded;
use crate::i18n::Lang;

const CONTENT_GLOBAL: &str = "__FORCE_GYM_CONTENT__";
const SCHEDULE_GLOBAL: &str = "__FORCE_GYM_SCHEDULE__";
const MEMBERSHIP_GLOBAL: &str = "__FORCE_GYM_MEMBERSHIP__";
const PARTIALS_GLOBAL: &str = "__FORCE_GYM_PARTIALS__";

fn global(window: &web_sys::Window, name: &str) -> Option<Value> {
    let raw = Reflect::get(window, &JsValue::from_str(name)).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    let text = JSON::stringify(&raw).ok()?.as_string()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring {name}: {err}");
            None
        }
    }
}

pub fn read() -> Preloaded {
    let Some(window) = web_sys::window() else {
        return Preloaded::default();
    };
    let mut preloaded = Preloaded {
        schedule: global(&window, SCHEDULE_GLOBAL),
        membership: global(&window, MEMBERSHIP_GLOBAL),
        ..Preloaded::default()
    };

    if let Some(Value::Object(by_lang)) = global(&window, CONTENT_GLOBAL) {
        for (code, raw) in by_lang {
            if let Some(lang) = Lang::parse(&code) {
                preloaded.content.insert(lang, raw);
            }
        }
    }

    if let Some(Value::Object(fragments)) = global(&window, PARTIALS_GLOBAL) {
        for (name, html) in fragments {
            if let Value::String(html) = html {
                preloaded.partials.insert(name, html);
            }
        }
    }
    preloaded
}
