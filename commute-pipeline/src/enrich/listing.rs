//! The listing record: an opaque JSON object with a few known fields.
//!
//! Detail-page extraction owns the shape of these files; enrichment
//! only reads `id` and `address` and mirrors convenience fields back
//! for backward-compatible consumers. Unknown fields are preserved
//! verbatim across a save.

use std::path::Path;

use serde_json::{Map, Value, json};

use crate::commute::TravelMode;
use crate::maps::RouteQueryResult;
use crate::storage::write_atomic;

use super::error::EnrichError;

/// One listing record as read from `listings/<id>.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    fields: Map<String, Value>,
}

impl ListingRecord {
    /// Load a listing record, requiring a JSON object at the top level.
    pub fn load(path: &Path) -> Result<Self, EnrichError> {
        let raw = std::fs::read_to_string(path).map_err(|e| EnrichError::io(path, e))?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| EnrichError::json(path, e))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(EnrichError::json(path, "listing record is not an object")),
        }
    }

    /// Overwrite the listing record wholesale.
    pub fn save(&self, path: &Path) -> Result<(), EnrichError> {
        let bytes = serde_json::to_vec_pretty(&Value::Object(self.fields.clone()))
            .map_err(|e| EnrichError::json(path, e))?;
        write_atomic(path, &bytes).map_err(|e| EnrichError::io(path, e))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The listing identifier, if the record carries one.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// The listing's raw street address.
    pub fn address(&self) -> Option<&str> {
        self.str_field("address")
    }

    /// Previously mirrored travel duration text, for skipped listings.
    pub fn travel_duration_text(&self) -> Option<&str> {
        self.str_field("travel_duration_text")
    }

    /// Previously mirrored travel duration in seconds.
    pub fn travel_duration_seconds(&self) -> Option<i64> {
        self.fields.get("travel_duration_seconds").and_then(Value::as_i64)
    }

    /// Previously mirrored maps link.
    pub fn maps_url(&self) -> Option<&str> {
        self.str_field("google_maps_url")
    }

    /// Mirror the first successful commute onto the record.
    ///
    /// These top-level fields duplicate the enrichment file for
    /// consumers that predate it.
    pub fn apply_commute(
        &mut self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        result: &RouteQueryResult,
        maps_url: &str,
        queried_at: &str,
    ) {
        self.fields.insert(
            "travel_duration_text".into(),
            Value::String(result.summary.duration_text.clone()),
        );
        self.fields.insert(
            "travel_duration_seconds".into(),
            Value::from(result.summary.duration_seconds),
        );
        self.fields.insert(
            "travel_arrival_timestamp".into(),
            Value::from(result.arrival_timestamp),
        );
        self.fields
            .insert("google_maps_url".into(), Value::String(maps_url.into()));
        self.fields.insert(
            "google_transit".into(),
            json!({
                "queried_at": queried_at,
                "arrival_timestamp": result.arrival_timestamp,
                "request": {
                    "origin": origin,
                    "destination": destination,
                    "mode": mode,
                },
                "response": result.raw_response,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::RouteSummary;

    fn record(json: &str) -> ListingRecord {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(&path, json).unwrap();
        ListingRecord::load(&path).unwrap()
    }

    #[test]
    fn reads_known_fields() {
        let listing = record(
            r#"{"id": "2019543218", "address": "1 Smith St", "price": 1900000, "images": []}"#,
        );

        assert_eq!(listing.id(), Some("2019543218"));
        assert_eq!(listing.address(), Some("1 Smith St"));
        assert!(listing.travel_duration_text().is_none());
    }

    #[test]
    fn non_object_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            ListingRecord::load(&path),
            Err(EnrichError::Json { .. })
        ));
    }

    #[test]
    fn apply_commute_preserves_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(
            &path,
            r#"{"id": "2019543218", "address": "1 Smith St", "agent": "Jane"}"#,
        )
        .unwrap();

        let mut listing = ListingRecord::load(&path).unwrap();
        let result = RouteQueryResult {
            summary: RouteSummary {
                duration_text: "42 mins".into(),
                duration_seconds: 2520,
            },
            arrival_timestamp: 1_790_000_000,
            raw_response: serde_json::json!({"status": "OK"}),
            candidates: Vec::new(),
            nearest_station: None,
        };
        listing.apply_commute(
            "1 Smith St",
            "10 Castlereagh St",
            TravelMode::Transit,
            &result,
            "https://maps.example/dir",
            "2026-08-25T10:00:00+10:00",
        );
        listing.save(&path).unwrap();

        let reloaded = ListingRecord::load(&path).unwrap();
        assert_eq!(reloaded.travel_duration_text(), Some("42 mins"));
        assert_eq!(reloaded.travel_duration_seconds(), Some(2520));
        assert_eq!(reloaded.maps_url(), Some("https://maps.example/dir"));
        // Fields enrichment doesn't know about survive the round trip
        assert_eq!(reloaded.fields["agent"], "Jane");
        assert_eq!(reloaded.fields["google_transit"]["request"]["mode"], "transit");
    }
}
