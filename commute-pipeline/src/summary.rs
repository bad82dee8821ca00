//! The per-run discovery summary document.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::registry::ReconcileOutcome;
use crate::storage::write_atomic;

/// Errors from summary persistence.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("could not write run summary to {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What one discovery run did, written to `discover_summary.json`.
///
/// Each run overwrites the previous summary; the registry itself is
/// the durable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique id for this run, e.g. `run_20260825_103000_a1b2c3d4`.
    pub run_id: String,

    /// When the run finished, RFC 3339 local time.
    pub timestamp: String,

    pub total_listings: usize,
    pub new_listings: usize,
    pub active_listings: usize,
    pub missing_listings: usize,

    /// The area slugs the search covered.
    pub areas_targeted: Vec<String>,

    /// Identifiers first seen this run, sorted.
    pub new_listing_ids: Vec<String>,
}

impl RunSummary {
    /// Build a summary from a reconcile outcome.
    pub fn from_outcome(
        outcome: &ReconcileOutcome,
        areas: &[String],
        finished_at: DateTime<Local>,
    ) -> Self {
        let run_id = format!(
            "run_{}_{}",
            finished_at.format("%Y%m%d_%H%M%S"),
            &uuid::Uuid::new_v4().simple().to_string()[..8],
        );
        Self {
            run_id,
            timestamp: finished_at.to_rfc3339(),
            total_listings: outcome.total,
            new_listings: outcome.new_ids.len(),
            active_listings: outcome.active,
            missing_listings: outcome.missing,
            areas_targeted: areas.to_vec(),
            new_listing_ids: outcome.new_ids.clone(),
        }
    }

    /// Persist the summary, replacing any previous run's.
    pub fn save(&self, path: &Path) -> Result<(), SummaryError> {
        // Serializing a struct of strings and counts cannot fail.
        let bytes = serde_json::to_vec_pretty(self).unwrap_or_default();
        write_atomic(path, &bytes).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
