//! Client runtime for the Force Gym marketing site.
//!
//! The crate is split the same way the page works: content and language
//! state feed the binder and the rendered views, page features add
//! behaviour, and forms hand leads over to WhatsApp. All of it is written
//! against the [`core::Document`] seam; `web` binds that seam to the browser.

pub mod app;
pub mod binder;
pub mod config;
pub mod content;
pub mod core;
pub mod features;
pub mod forms;
pub mod i18n;
pub mod partials;
pub mod views;

#[cfg(target_arch = "wasm32")]
pub mod web;
