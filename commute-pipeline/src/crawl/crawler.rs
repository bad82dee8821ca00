//! The pagination crawl loop.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::info;

use super::client::PageSource;
use super::error::CrawlError;
use super::extract::extract_listing_ids;

/// Crawl successive result pages, accumulating listing identifiers.
///
/// Termination rule: stop when a fetched page yields zero identifiers,
/// or when the page's identifier set is already a subset of everything
/// accumulated so far (the search site repeats pages past the end of
/// the result set). There is no page cap.
///
/// `page_delay` is observed between fetches as self-imposed rate
/// limiting. Any fetch error propagates and aborts the crawl; partial
/// results are discarded.
pub async fn crawl<P: PageSource>(
    source: &P,
    page_delay: Duration,
) -> Result<BTreeSet<String>, CrawlError> {
    let mut all_ids = BTreeSet::new();
    let mut page = 1u32;

    loop {
        info!(page, "fetching search page");
        let html = source.fetch_page(page).await?;
        let ids = extract_listing_ids(&html);
        info!(page, found = ids.len(), "extracted listing IDs");

        if ids.is_empty() {
            break;
        }

        if ids.is_subset(&all_ids) {
            info!(page, "page repeated, stopping crawl");
            break;
        }

        all_ids.extend(ids);
        page += 1;
        tokio::time::sleep(page_delay).await;
    }

    Ok(all_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves pre-built pages; pages past the end repeat the last one.
    struct CannedPages {
        pages: Vec<String>,
        fail_at: Option<u32>,
    }

    impl CannedPages {
        fn new(pages: Vec<&str>) -> Self {
            Self {
                pages: pages.into_iter().map(String::from).collect(),
                fail_at: None,
            }
        }

        fn failing_at(mut self, page: u32) -> Self {
            self.fail_at = Some(page);
            self
        }
    }

    impl PageSource for CannedPages {
        async fn fetch_page(&self, page: u32) -> Result<String, CrawlError> {
            if self.fail_at == Some(page) {
                return Err(CrawlError::BadStatus { page, status: 500 });
            }
            let idx = (page as usize - 1).min(self.pages.len() - 1);
            Ok(self.pages[idx].clone())
        }
    }

    fn page(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| format!(r#"<a href="/listing-{id}">x</a>"#))
            .collect()
    }

    #[tokio::test]
    async fn accumulates_across_pages_until_empty() {
        let source = CannedPages::new(vec![
            &page(&["2019500001", "2019500002"]),
            &page(&["2019500003"]),
            &page(&[]),
        ]);

        let ids = crawl(&source, Duration::ZERO).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("2019500003"));
    }

    #[tokio::test]
    async fn repeated_page_halts_crawl() {
        // Page 3 onwards repeats page 2's IDs: a non-empty subset of
        // the accumulated set must stop the loop.
        let source = CannedPages::new(vec![
            &page(&["2019500001", "2019500002"]),
            &page(&["2019500002", "2019500003"]),
        ]);

        let ids = crawl(&source, Duration::ZERO).await.unwrap();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn partial_overlap_continues() {
        let source = CannedPages::new(vec![
            &page(&["2019500001", "2019500002"]),
            &page(&["2019500002", "2019500003"]),
            &page(&["2019500004"]),
            &page(&[]),
        ]);

        let ids = crawl(&source, Duration::ZERO).await.unwrap();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_whole_crawl() {
        let source =
            CannedPages::new(vec![&page(&["2019500001"]), &page(&["2019500002"])]).failing_at(2);

        let result = crawl(&source, Duration::ZERO).await;
        assert!(matches!(
            result,
            Err(CrawlError::BadStatus { page: 2, .. })
        ));
    }
}
