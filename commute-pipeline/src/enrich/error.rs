//! Enrichment error types.

use std::path::PathBuf;

/// Errors from enrichment I/O.
///
/// Per-listing read/write failures are logged and skipped inside the
/// orchestrator loop; these errors only surface for run-level output
/// like the CSV summary.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("enrichment I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("enrichment JSON error at {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EnrichError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, e: impl std::fmt::Display) -> Self {
        Self::Json {
            path: path.into(),
            message: e.to_string(),
        }
    }
}
