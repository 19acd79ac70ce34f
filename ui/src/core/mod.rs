pub mod dom;
pub mod fetch;
pub mod format;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod platform;
pub mod storage;
pub mod timing;

pub use dom::{Document, RootAttributes, Selector};
pub use fetch::{FetchError, Fetcher};
pub use platform::{spawn_future, Browser, ResolvedUrl, Toaster};
pub use storage::KeyValueStore;
