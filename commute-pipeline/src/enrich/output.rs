//! Per-listing enrichment output and the tabular summary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commute::TravelMode;
use crate::maps::{NearestStation, RouteQueryResult};
use crate::storage::write_atomic;

use super::error::EnrichError;

/// One per-destination query outcome.
///
/// A failed query is recorded with `result: null`, never omitted, so
/// the output always shows which destinations were attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuteOutcome {
    /// Destination label from config.
    pub name: String,

    /// Destination address as queried.
    pub destination: String,

    pub mode: TravelMode,

    pub arrival_timestamp: i64,

    pub result: Option<RouteQueryResult>,
}

/// The per-listing enrichment document, `commute/<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEnrichment {
    pub id: String,

    /// Whitespace-normalized origin address.
    pub address: String,

    /// When this document was produced (RFC 3339 local time).
    pub queried_at: String,

    pub commutes: Vec<CommuteOutcome>,

    /// The single listing-level nearest station; per-destination
    /// stations are cleared in its favor.
    pub nearest_station: Option<NearestStation>,
}

impl ListingEnrichment {
    /// Whether this document satisfies the idempotent-skip rule.
    ///
    /// With a configured destination count, the persisted count must
    /// match and every result must be non-null. Without one, any
    /// non-empty set of all-successful results counts as complete.
    pub fn is_complete(&self, configured_count: Option<usize>) -> bool {
        let all_succeeded = self.commutes.iter().all(|c| c.result.is_some());
        match configured_count {
            Some(expected) => self.commutes.len() == expected && all_succeeded,
            None => !self.commutes.is_empty() && all_succeeded,
        }
    }
}

/// Load a listing's enrichment document if a usable one exists.
///
/// Missing and unparseable files both yield `None`: either way the
/// listing is simply not yet enriched and will be reprocessed.
pub fn load_enrichment(path: &Path) -> Option<ListingEnrichment> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Overwrite a listing's enrichment document.
pub fn write_enrichment(path: &Path, enrichment: &ListingEnrichment) -> Result<(), EnrichError> {
    let bytes =
        serde_json::to_vec_pretty(enrichment).map_err(|e| EnrichError::json(path, e))?;
    write_atomic(path, &bytes).map_err(|e| EnrichError::io(path, e))
}

/// One row of the travel-times CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub id: String,
    pub address: Option<String>,
    pub travel_duration_text: Option<String>,
    pub travel_duration_seconds: Option<i64>,
    pub google_maps_url: Option<String>,
}

impl SummaryRow {
    /// A row for a listing that produced no usable result.
    pub fn empty(id: impl Into<String>, address: Option<String>) -> Self {
        Self {
            id: id.into(),
            address,
            travel_duration_text: None,
            travel_duration_seconds: None,
            google_maps_url: None,
        }
    }
}

/// Rewrite the CSV summary from scratch, header included even when
/// there are no rows.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<(), EnrichError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record([
            "id",
            "address",
            "travel_duration_text",
            "travel_duration_seconds",
            "google_maps_url",
        ])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EnrichError::Csv(e.into_error().into()))?;
    write_atomic(path, &bytes).map_err(|e| EnrichError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::RouteSummary;

    fn outcome(result: Option<RouteQueryResult>) -> CommuteOutcome {
        CommuteOutcome {
            name: "Work".into(),
            destination: "10 Castlereagh St".into(),
            mode: TravelMode::Transit,
            arrival_timestamp: 1_790_000_000,
            result,
        }
    }

    fn success() -> RouteQueryResult {
        RouteQueryResult {
            summary: RouteSummary {
                duration_text: "42 mins".into(),
                duration_seconds: 2520,
            },
            arrival_timestamp: 1_790_000_000,
            raw_response: serde_json::json!({"status": "OK"}),
            candidates: Vec::new(),
            nearest_station: None,
        }
    }

    fn enrichment(commutes: Vec<CommuteOutcome>) -> ListingEnrichment {
        ListingEnrichment {
            id: "2019543218".into(),
            address: "1 Smith St".into(),
            queried_at: "2026-08-25T10:00:00+10:00".into(),
            commutes,
            nearest_station: None,
        }
    }

    #[test]
    fn complete_requires_matching_count_and_all_results() {
        let doc = enrichment(vec![outcome(Some(success()))]);

        assert!(doc.is_complete(Some(1)));
        assert!(!doc.is_complete(Some(2)));

        let doc = enrichment(vec![outcome(Some(success())), outcome(None)]);
        assert!(!doc.is_complete(Some(2)));
    }

    #[test]
    fn complete_without_config_requires_nonempty_success() {
        let doc = enrichment(vec![outcome(Some(success()))]);
        assert!(doc.is_complete(None));

        let doc = enrichment(vec![]);
        assert!(!doc.is_complete(None));

        let doc = enrichment(vec![outcome(None)]);
        assert!(!doc.is_complete(None));
    }

    #[test]
    fn load_missing_or_corrupt_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2019543218.json");

        assert!(load_enrichment(&path).is_none());

        std::fs::write(&path, "{broken").unwrap();
        assert!(load_enrichment(&path).is_none());
    }

    #[test]
    fn enrichment_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2019543218.json");
        let doc = enrichment(vec![outcome(Some(success())), outcome(None)]);

        write_enrichment(&path, &doc).unwrap();
        let back = load_enrichment(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn csv_has_fixed_columns_and_null_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("travel_times.csv");
        let rows = vec![
            SummaryRow {
                id: "111".into(),
                address: Some("1 Smith St".into()),
                travel_duration_text: Some("42 mins".into()),
                travel_duration_seconds: Some(2520),
                google_maps_url: Some("https://maps.example/dir".into()),
            },
            SummaryRow::empty("222", None),
        ];

        write_summary_csv(&path, &rows).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,address,travel_duration_text,travel_duration_seconds,google_maps_url")
        );
        assert_eq!(
            lines.next(),
            Some("111,1 Smith St,42 mins,2520,https://maps.example/dir")
        );
        assert_eq!(lines.next(), Some("222,,,,"));
    }

    #[test]
    fn empty_csv_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("travel_times.csv");

        write_summary_csv(&path, &[]).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("id,address,"));
    }
}
