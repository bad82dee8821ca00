//! Top-level discovery run: crawl, reconcile, persist.

use chrono::Local;
use tracing::info;

use crate::crawl::{CrawlError, PageSource, crawl};
use crate::registry::{RegistryError, RegistryStore, load_rejected_ids, reconcile};
use crate::storage::DataPaths;
use crate::summary::{RunSummary, SummaryError};

/// Errors from a discovery run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Run one discovery pass.
///
/// The crawl completes (or fails) before the registry is touched, so a
/// failed crawl leaves all state files exactly as they were. On
/// success the registry and the run summary are rewritten.
pub async fn run_discovery<P: PageSource>(
    source: &P,
    areas: &[String],
    page_delay: std::time::Duration,
    paths: &DataPaths,
) -> Result<RunSummary, PipelineError> {
    let discovered = crawl(source, page_delay).await?;
    info!(discovered = discovered.len(), "crawl complete");

    let today = Local::now().date_naive();
    let store = RegistryStore::new(paths.registry());
    let mut doc = store.load(today)?;
    let rejected = load_rejected_ids(&paths.votes())?;
    if !rejected.is_empty() {
        info!(rejected = rejected.len(), "applying rejection exclusions");
    }

    let outcome = reconcile(&mut doc, &discovered, &rejected, today);
    store.save(&doc)?;

    let summary = RunSummary::from_outcome(&outcome, areas, Local::now());
    summary.save(&paths.run_summary())?;
    info!(
        run_id = summary.run_id,
        total = summary.total_listings,
        new = summary.new_listings,
        active = summary.active_listings,
        missing = summary.missing_listings,
        "discovery run complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::SearchClientConfig;
    use std::cell::RefCell;
    use std::time::Duration;

    /// Serves canned pages and records how many fetches happened.
    struct CannedPages {
        pages: Vec<String>,
        fetched: RefCell<u32>,
        fail_at: Option<u32>,
    }

    impl CannedPages {
        fn new(pages: Vec<String>) -> Self {
            Self {
                pages,
                fetched: RefCell::new(0),
                fail_at: None,
            }
        }
    }

    impl PageSource for CannedPages {
        async fn fetch_page(&self, page: u32) -> Result<String, CrawlError> {
            *self.fetched.borrow_mut() += 1;
            if self.fail_at == Some(page) {
                return Err(CrawlError::BadStatus { page, status: 503 });
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

    fn areas() -> Vec<String> {
        SearchClientConfig::default().areas
    }

    #[tokio::test]
    async fn discovery_writes_registry_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        let source = CannedPages::new(vec![
            page(&["2019500001", "2019500002"]),
            page(&[]),
        ]);

        let summary = run_discovery(&source, &areas(), Duration::ZERO, &paths)
            .await
            .unwrap();

        assert_eq!(summary.total_listings, 2);
        assert_eq!(summary.new_listings, 2);
        assert_eq!(summary.active_listings, 2);
        assert_eq!(
            summary.new_listing_ids,
            vec!["2019500001".to_string(), "2019500002".to_string()]
        );

        assert!(paths.registry().is_file());
        assert!(paths.run_summary().is_file());
    }

    #[tokio::test]
    async fn failed_crawl_leaves_registry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());

        // Seed the registry with one record.
        let seed = CannedPages::new(vec![page(&["2019500001"]), page(&[])]);
        run_discovery(&seed, &areas(), Duration::ZERO, &paths)
            .await
            .unwrap();
        let before = std::fs::read_to_string(paths.registry()).unwrap();

        let mut failing = CannedPages::new(vec![page(&["2019500002"]), page(&[])]);
        failing.fail_at = Some(1);
        let result = run_discovery(&failing, &areas(), Duration::ZERO, &paths).await;

        assert!(matches!(result, Err(PipelineError::Crawl(_))));
        let after = std::fs::read_to_string(paths.registry()).unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn rejected_ids_are_excluded_from_summary_counts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(
            paths.votes(),
            r#"{"2019500002": {"workflow_status": "rejected"}}"#,
        )
        .unwrap();

        let source = CannedPages::new(vec![
            page(&["2019500001", "2019500002"]),
            page(&[]),
        ]);
        let summary = run_discovery(&source, &areas(), Duration::ZERO, &paths)
            .await
            .unwrap();

        assert_eq!(summary.total_listings, 1);
        assert_eq!(summary.new_listing_ids, vec!["2019500001".to_string()]);
    }
}
