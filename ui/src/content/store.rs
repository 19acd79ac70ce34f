//! Cache-then-fetch access to the site's JSON documents.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::membership::MembershipDocument;
use super::schedule::{parse_schedule, ScheduleEntry};
use super::{ContentDocument, ContentError};
use crate::config::SiteConfig;
use crate::core::Fetcher;
use crate::i18n::Lang;

/// Holds at most one content document per language, one schedule and one
/// membership document. Failures never reach callers: they are logged and
/// turned into `None` (content, membership) or an empty schedule.
pub struct ContentStore {
    fetcher: Rc<dyn Fetcher>,
    content_url: String,
    schedule_url: String,
    membership_urls: Vec<String>,
    content: RefCell<HashMap<Lang, Rc<ContentDocument>>>,
    schedule: RefCell<Option<Rc<Vec<ScheduleEntry>>>>,
    membership: RefCell<Option<Rc<MembershipDocument>>>,
}

impl ContentStore {
    pub fn new(fetcher: Rc<dyn Fetcher>, config: &SiteConfig) -> Self {
        Self {
            fetcher,
            content_url: config.content_url.clone(),
            schedule_url: config.schedule_url.clone(),
            membership_urls: config.membership_urls.clone(),
            content: RefCell::new(HashMap::new()),
            schedule: RefCell::new(None),
            membership: RefCell::new(None),
        }
    }

    /// Seeds the cache with a document embedded in the page.
    pub fn seed_content(&self, lang: Lang, raw: Value) {
        match ContentDocument::from_value(raw) {
            Ok(doc) => {
                self.content.borrow_mut().insert(lang, Rc::new(doc));
            }
            Err(err) => tracing::warn!("ignoring preloaded {lang} content: {err}"),
        }
    }

    pub fn seed_schedule(&self, raw: Value) {
        match serde_json::from_value::<Vec<ScheduleEntry>>(raw) {
            Ok(entries) => *self.schedule.borrow_mut() = Some(Rc::new(entries)),
            Err(err) => tracing::warn!("ignoring preloaded schedule: {err}"),
        }
    }

    pub fn seed_membership(&self, raw: Value) {
        match serde_json::from_value::<MembershipDocument>(raw) {
            Ok(doc) => *self.membership.borrow_mut() = Some(Rc::new(doc)),
            Err(err) => tracing::warn!("ignoring preloaded membership: {err}"),
        }
    }

    pub fn cached_content(&self, lang: Lang) -> Option<Rc<ContentDocument>> {
        self.content.borrow().get(&lang).cloned()
    }

    /// Content for `lang`, falling back to the default language when it
    /// cannot be loaded. The fallback is cached only under the default key,
    /// so a later request for `lang` tries the network again.
    pub async fn get_content(&self, lang: Lang) -> Option<Rc<ContentDocument>> {
        let mut lang = lang;
        loop {
            if let Some(hit) = self.cached_content(lang) {
                return Some(hit);
            }
            match self.fetch_content(lang).await {
                Ok(doc) => {
                    let doc = Rc::new(doc);
                    self.content.borrow_mut().insert(lang, doc.clone());
                    return Some(doc);
                }
                Err(err) => {
                    tracing::warn!("content for {lang} unavailable: {err}");
                    if lang == Lang::DEFAULT {
                        return None;
                    }
                    lang = Lang::DEFAULT;
                }
            }
        }
    }

    async fn fetch_content(&self, lang: Lang) -> Result<ContentDocument, ContentError> {
        let url = self.content_url.replace("{lang}", lang.code());
        let body = self.fetcher.fetch_text(&url).await?;
        ContentDocument::parse(&body).map_err(|err| ContentError::parse(&url, err))
    }

    /// The class schedule; empty when it cannot be loaded. The empty result
    /// is cached as well.
    pub async fn get_schedule(&self) -> Rc<Vec<ScheduleEntry>> {
        if let Some(hit) = self.schedule.borrow().clone() {
            return hit;
        }
        let entries = match self.fetch_schedule().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("schedule unavailable: {err}");
                Vec::new()
            }
        };
        let entries = Rc::new(entries);
        *self.schedule.borrow_mut() = Some(entries.clone());
        entries
    }

    async fn fetch_schedule(&self) -> Result<Vec<ScheduleEntry>, ContentError> {
        let body = self.fetcher.fetch_text(&self.schedule_url).await?;
        parse_schedule(&body).map_err(|err| ContentError::parse(&self.schedule_url, err))
    }

    /// The membership document from the first URL that yields one. A total
    /// failure is not cached.
    pub async fn get_membership(&self) -> Option<Rc<MembershipDocument>> {
        if let Some(hit) = self.membership.borrow().clone() {
            return Some(hit);
        }
        for url in &self.membership_urls {
            match self.fetch_membership(url).await {
                Ok(doc) => {
                    let doc = Rc::new(doc);
                    *self.membership.borrow_mut() = Some(doc.clone());
                    return Some(doc);
                }
                Err(err) => tracing::debug!("membership candidate skipped: {err}"),
            }
        }
        tracing::warn!("membership document unavailable");
        None
    }

    async fn fetch_membership(&self, url: &str) -> Result<MembershipDocument, ContentError> {
        let body = self.fetcher.fetch_text(url).await?;
        MembershipDocument::parse(&body).map_err(|err| ContentError::parse(url, err))
    }
}
