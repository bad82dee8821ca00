//! Registry document and record types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked identifier.
///
/// Reflects only the most recent crawl: `Active` means the identifier
/// was observed (and not rejected) in the last reconciliation,
/// `Missing` means it was not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Missing,
}

/// One tracked listing identifier with its lifecycle dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRecord {
    /// Opaque stable key, as embedded in the listing's source URL.
    pub id: String,

    /// Date the identifier was first discovered.
    pub added_date: NaiveDate,

    /// Date of the most recent reconciliation that touched this record.
    pub updated_date: NaiveDate,

    /// Outcome of the most recent crawl for this identifier.
    pub status: ListingStatus,
}

impl IdentifierRecord {
    /// Create a freshly-discovered record.
    pub fn discovered(id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: id.into(),
            added_date: today,
            updated_date: today,
            status: ListingStatus::Active,
        }
    }
}

/// The registry document: identifier → lifecycle record.
///
/// Serializes as a bare JSON object keyed by identifier, and is always
/// persisted as a whole (no partial writes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryDocument {
    pub records: BTreeMap<String, IdentifierRecord>,
}

impl RegistryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the document tracks no identifiers.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&IdentifierRecord> {
        self.records.get(id)
    }

    /// Number of records with the given status.
    pub fn count_status(&self, status: ListingStatus) -> usize {
        self.records.values().filter(|r| r.status == status).count()
    }
}
