//! Listing identifier extraction from search result HTML.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Listing URLs end in a hyphen followed by a fixed-width numeric
/// identifier, e.g. `/123-example-st-suburb-nsw-2000-2019543218`.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([0-9]{10})").expect("listing ID pattern is valid"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Extract the set of listing identifiers linked from a result page.
///
/// Scans every anchor's `href` for the canonical numeric suffix.
/// Duplicate links to the same listing collapse into one identifier.
pub fn extract_listing_ids(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut ids = BTreeSet::new();

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(captures) = ID_PATTERN.captures(href) {
            ids.insert(captures[1].to_string());
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ids_from_anchor_hrefs() {
        let html = r#"
            <html><body>
                <a href="/123-smith-st-epping-nsw-2121-2019543218">Listing</a>
                <a href="https://example.com/45-jones-ave-ryde-nsw-2112-2019600001?from=search">Other</a>
                <a href="/about-us">About</a>
            </body></html>
        "#;

        let ids = extract_listing_ids(html);
        assert_eq!(
            ids,
            ["2019543218", "2019600001"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
    }

    #[test]
    fn duplicate_links_collapse() {
        let html = r#"
            <a href="/x-2019543218">photo</a>
            <a href="/x-2019543218">title</a>
        "#;

        let ids = extract_listing_ids(html);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn short_numeric_suffixes_are_ignored() {
        let html = r#"<a href="/epping-nsw-2121">Suburb page</a>"#;
        assert!(extract_listing_ids(html).is_empty());
    }

    #[test]
    fn empty_page_yields_no_ids() {
        assert!(extract_listing_ids("<html><body></body></html>").is_empty());
    }
}
