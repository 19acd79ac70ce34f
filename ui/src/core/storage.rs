//! Local persistence for the handful of settings the site remembers.

/// String key/value persistence (browser `localStorage` on the web).
///
/// Writes are best effort; a blocked storage just forgets.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
