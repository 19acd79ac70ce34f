//! Resource fetching seam.

use futures::future::LocalBoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not read body of {url}: {reason}")]
    Body { url: String, reason: String },
}

/// GETs a same-site resource as text.
///
/// Non-success statuses are errors. Implementations never retry.
pub trait Fetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>>;
}
