//! Load/save for the registry document.
//!
//! The on-disk file has two recognized shapes: a legacy bare array of
//! identifiers, and the current identifier → record map. Legacy files
//! are upgraded transparently on load.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::storage::write_atomic;

use super::error::RegistryError;
use super::types::{IdentifierRecord, ListingStatus, RegistryDocument};

/// The two serialized registry shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRegistry {
    Current(BTreeMap<String, IdentifierRecord>),
    Legacy(Vec<String>),
}

/// Reads and writes the registry document at a fixed path.
///
/// Single-writer assumption: saves are full-document overwrites via
/// temp-file-then-rename, with no locking.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Create a store for the given registry file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the registry, upgrading the legacy shape if found.
    ///
    /// A missing file yields an empty document. A file that is valid
    /// JSON but matches neither shape also yields an empty document
    /// (logged), so a corrupt registry never aborts a run. Legacy
    /// entries are stamped `added_date = updated_date = today` with
    /// status missing; the next reconciliation decides whether they
    /// are still live.
    pub fn load(&self, today: NaiveDate) -> Result<RegistryDocument, RegistryError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RegistryDocument::new());
            }
            Err(e) => {
                return Err(RegistryError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| RegistryError::Json {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        match serde_json::from_value::<StoredRegistry>(value) {
            Ok(StoredRegistry::Current(records)) => Ok(RegistryDocument { records }),
            Ok(StoredRegistry::Legacy(ids)) => {
                warn!(
                    count = ids.len(),
                    "legacy identifier list detected, migrating registry format"
                );
                let records = ids
                    .into_iter()
                    .map(|id| {
                        let record = IdentifierRecord {
                            id: id.clone(),
                            added_date: today,
                            updated_date: today,
                            status: ListingStatus::Missing,
                        };
                        (id, record)
                    })
                    .collect();
                Ok(RegistryDocument { records })
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unrecognized registry shape, starting fresh"
                );
                Ok(RegistryDocument::new())
            }
        }
    }

    /// Overwrite the registry document wholesale.
    pub fn save(&self, doc: &RegistryDocument) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| RegistryError::Json {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, &bytes).map_err(|e| RegistryError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn missing_file_yields_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("listing_ids.json"));

        let doc = store.load(date("2026-08-25")).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn legacy_list_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing_ids.json");
        std::fs::write(&path, r#"["111", "222"]"#).unwrap();

        let today = date("2026-08-25");
        let doc = RegistryStore::new(&path).load(today).unwrap();

        assert_eq!(doc.len(), 2);
        for id in ["111", "222"] {
            let rec = doc.get(id).unwrap();
            assert_eq!(rec.id, id);
            assert_eq!(rec.status, ListingStatus::Missing);
            assert_eq!(rec.added_date, today);
            assert_eq!(rec.updated_date, today);
        }
    }

    #[test]
    fn current_shape_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("listing_ids.json"));
        let today = date("2026-08-25");

        let mut doc = RegistryDocument::new();
        doc.records.insert(
            "1234567890".into(),
            IdentifierRecord::discovered("1234567890", today),
        );

        store.save(&doc).unwrap();
        let loaded = store.load(today).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn unknown_shape_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing_ids.json");
        std::fs::write(&path, r#"{"oops": 42}"#).unwrap();

        let doc = RegistryStore::new(&path).load(date("2026-08-25")).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing_ids.json");
        std::fs::write(&path, "not json").unwrap();

        let result = RegistryStore::new(&path).load(date("2026-08-25"));
        assert!(matches!(result, Err(RegistryError::Json { .. })));
    }
}
