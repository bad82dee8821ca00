//! Crawler error types.

/// Errors from fetching search result pages.
///
/// All of these are fatal to the crawl: there is no retry, and an
/// aborted crawl leaves the registry untouched.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The search site returned a non-success status code.
    #[error("search site returned {status} for page {page}")]
    BadStatus { page: u32, status: u16 },
}
