//! Lifecycle reconciliation of a crawl against the registry.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::types::{IdentifierRecord, ListingStatus, RegistryDocument};

/// Counts and new-identifier list from one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Identifiers inserted for the first time this run.
    pub new_ids: Vec<String>,

    /// Total identifiers tracked after reconciliation.
    pub total: usize,

    /// Records left active after reconciliation.
    pub active: usize,

    /// Records left missing after reconciliation.
    pub missing: usize,
}

/// Merge one crawl's discovered identifiers into the registry.
///
/// Every existing record is first marked missing with `updated_date =
/// today`; each discovered identifier not in `rejected` is then
/// re-activated or inserted as a new active record. Rejected
/// identifiers never transition to active, but pre-existing records
/// for them are kept (they simply stay missing).
///
/// This is a full pass over existing + discovered, re-run from scratch
/// on every invocation.
pub fn reconcile(
    doc: &mut RegistryDocument,
    discovered: &BTreeSet<String>,
    rejected: &BTreeSet<String>,
    today: NaiveDate,
) -> ReconcileOutcome {
    for record in doc.records.values_mut() {
        record.status = ListingStatus::Missing;
        record.updated_date = today;
    }

    let mut new_ids = Vec::new();
    for id in discovered {
        if rejected.contains(id) {
            continue;
        }
        match doc.records.get_mut(id) {
            Some(record) => {
                record.status = ListingStatus::Active;
                record.updated_date = today;
            }
            None => {
                doc.records
                    .insert(id.clone(), IdentifierRecord::discovered(id, today));
                new_ids.push(id.clone());
            }
        }
    }

    ReconcileOutcome {
        new_ids,
        total: doc.len(),
        active: doc.count_status(ListingStatus::Active),
        missing: doc.count_status(ListingStatus::Missing),
    }
}
