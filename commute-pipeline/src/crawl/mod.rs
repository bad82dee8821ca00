//! Pagination crawler for the listing search site.
//!
//! Fetches successive result pages of a fixed search query and
//! extracts candidate listing identifiers from anchor targets. The
//! crawl has no page cap: it stops when a page yields nothing new
//! (empty, or a subset of everything seen so far).
//!
//! Any fetch failure aborts the whole crawl; discovery is atomic and
//! the registry is only touched once the full identifier set is in
//! hand.

mod client;
mod crawler;
mod error;
mod extract;

pub use client::{PageSource, SearchClient, SearchClientConfig};
pub use crawler::crawl;
pub use error::CrawlError;
pub use extract::extract_listing_ids;
