//! HTTP client for the listing search site.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use super::error::CrawlError;

/// Default search host.
const DEFAULT_BASE_URL: &str = "https://www.domain.com.au";

/// Search areas targeted by the default query, as URL slugs.
const DEFAULT_AREAS: &[&str] = &[
    "cheltenham-nsw-2119",
    "epping-nsw-2121",
    "eastwood-nsw-2122",
    "marsfield-nsw-2122",
    "denistone-nsw-2114",
    "north-ryde-nsw-2113",
    "ryde-nsw-2112",
    "west-ryde-nsw-2114",
    "meadowbank-nsw-2114",
    "carlingford-nsw-2118",
    "telopea-nsw-2117",
    "beecroft-nsw-2119",
    "pennant-hills-nsw-2120",
    "hurstville-nsw-2220",
    "kogarah-nsw-2217",
    "penshurst-nsw-2222",
    "mortdale-nsw-2223",
    "oatley-nsw-2223",
];

/// Default filter tail appended to the search query.
const DEFAULT_FILTERS: &str = "&ptype=free-standing&bedrooms=4-any&price=0-2750000&excludeunderoffer=1";

/// Default inter-page delay in milliseconds.
const DEFAULT_PAGE_DELAY_MS: u64 = 300;

/// Browser-like User-Agent; the search site blocks obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Configuration for the search-site client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Scheme + host of the search site.
    pub base_url: String,
    /// Area slugs to include in the search query.
    pub areas: Vec<String>,
    /// Extra query-string filters appended verbatim.
    pub filters: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Delay between page fetches in milliseconds.
    pub page_delay_ms: u64,
}

impl SearchClientConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the targeted areas.
    pub fn with_areas(mut self, areas: Vec<String>) -> Self {
        self.areas = areas;
        self
    }

    /// Set the inter-page delay.
    pub fn with_page_delay_ms(mut self, ms: u64) -> Self {
        self.page_delay_ms = ms;
        self
    }
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            areas: DEFAULT_AREAS.iter().map(|s| s.to_string()).collect(),
            filters: DEFAULT_FILTERS.to_string(),
            timeout_secs: 15,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
        }
    }
}

/// A source of search result pages.
///
/// This abstraction allows the crawl loop to be tested with canned
/// HTML instead of live fetches.
pub trait PageSource {
    /// Fetch result page `page` (1-indexed) as raw HTML.
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<String, CrawlError>>;
}

/// HTTP client for the listing search site.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: String,
    areas: Vec<String>,
    page_delay: Duration,
}

impl SearchClient {
    /// Create a client from the given configuration.
    pub fn new(config: SearchClientConfig) -> Result<Self, CrawlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let search_url = format!(
            "{}/sale/?suburb={}{}",
            config.base_url,
            config.areas.join(","),
            config.filters
        );

        Ok(Self {
            http,
            search_url,
            areas: config.areas,
            page_delay: Duration::from_millis(config.page_delay_ms),
        })
    }

    /// The area slugs this client searches, for run summaries.
    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    /// Delay to observe between page fetches.
    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }
}

impl PageSource for SearchClient {
    async fn fetch_page(&self, page: u32) -> Result<String, CrawlError> {
        let url = format!("{}&page={page}", self.search_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::BadStatus {
                page,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SearchClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_delay_ms, 300);
        assert!(!config.areas.is_empty());
    }

    #[test]
    fn search_url_includes_areas_and_filters() {
        let config = SearchClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_areas(vec!["epping-nsw-2121".into(), "ryde-nsw-2112".into()]);
        let client = SearchClient::new(config).unwrap();

        assert_eq!(
            client.search_url,
            format!("http://localhost:8080/sale/?suburb=epping-nsw-2121,ryde-nsw-2112{DEFAULT_FILTERS}")
        );
    }
}
