//! Browser services and task spawning.

use std::future::Future;

use futures::future::LocalBoxFuture;
use time::OffsetDateTime;

/// The parts of a resolved link that navigation decisions look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Serialized origin; `null` for opaque schemes such as `javascript:`.
    pub origin: String,
    pub pathname: String,
}

/// Window-level services that are not part of the document tree.
pub trait Browser {
    /// `location.pathname`.
    fn pathname(&self) -> String;
    /// `location.origin`, e.g. `https://forcegym.example`.
    fn origin(&self) -> String;

    /// `new URL(href, location.origin)`; `None` when `href` does not parse.
    fn resolve(&self, href: &str) -> Option<ResolvedUrl>;

    fn open_in_new_tab(&self, url: &str);
    fn navigate(&self, url: &str);

    fn prefers_reduced_motion(&self) -> bool;
    /// `navigator.connection.saveData`; false when unsupported.
    fn save_data(&self) -> bool;

    fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), String>>;

    fn current_year(&self) -> i32 {
        OffsetDateTime::now_utc().year()
    }

    /// Last path segment, `index.html` for the site root.
    fn page_name(&self) -> String {
        page_name(&self.pathname())
    }
}

/// Transient status messages.
pub trait Toaster {
    fn show(&self, message: &str);
}

pub fn page_name(pathname: &str) -> String {
    match pathname.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "index.html".to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static POOL: std::cell::RefCell<futures::executor::LocalPool> =
        std::cell::RefCell::new(futures::executor::LocalPool::new());
    static SPAWNER: futures::executor::LocalSpawner =
        POOL.with(|pool| pool.borrow().spawner());
}

/// Natively, tasks queue on a thread-local pool drained by [`run_until_stalled`].
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    use futures::task::LocalSpawnExt;

    SPAWNER.with(|spawner| {
        if let Err(err) = spawner.spawn_local(future) {
            tracing::error!("failed to queue local task: {err}");
        }
    });
}

/// Runs queued tasks until none can make progress. Must not be called from
/// inside another executor.
#[cfg(not(target_arch = "wasm32"))]
pub fn run_until_stalled() {
    POOL.with(|pool| pool.borrow_mut().run_until_stalled());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_name_defaults_to_index() {
        assert_eq!(page_name("/"), "index.html");
        assert_eq!(page_name(""), "index.html");
        assert_eq!(page_name("/membership.html"), "membership.html");
        assert_eq!(page_name("/site/schedule.html"), "schedule.html");
    }
}
