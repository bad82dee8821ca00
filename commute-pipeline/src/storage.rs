//! Data-directory layout and atomic file writes.
//!
//! Everything the pipeline persists lives under a single data directory
//! as whole-document JSON files (plus one CSV). Writes go through
//! [`write_atomic`] so a crashed run never leaves a half-written file:
//! the previous document survives intact until the rename.

use std::io;
use std::path::{Path, PathBuf};

/// Well-known file locations under the pipeline's data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create paths rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The identifier-lifecycle registry document.
    pub fn registry(&self) -> PathBuf {
        self.root.join("listing_ids.json")
    }

    /// The external votes document (rejection signal).
    pub fn votes(&self) -> PathBuf {
        self.root.join("votes.json")
    }

    /// Directory of per-listing records, one `<id>.json` each.
    pub fn listings_dir(&self) -> PathBuf {
        self.root.join("listings")
    }

    /// Directory of per-listing enrichment output, one `<id>.json` each.
    pub fn commute_dir(&self) -> PathBuf {
        self.root.join("commute")
    }

    /// Enrichment output file for a single listing.
    pub fn commute_file(&self, listing_id: &str) -> PathBuf {
        self.commute_dir().join(format!("{listing_id}.json"))
    }

    /// The commute destinations config document.
    pub fn commute_config(&self) -> PathBuf {
        self.root.join("commute_config.json")
    }

    /// The tabular travel-time summary, rewritten every enrichment run.
    pub fn travel_csv(&self) -> PathBuf {
        self.root.join("travel_times.csv")
    }

    /// The discovery run summary, for external publication.
    pub fn run_summary(&self) -> PathBuf {
        self.root.join("discover_summary.json")
    }
}

/// Write `bytes` to `path` via a sibling temp file and rename.
///
/// Creates parent directories as needed. The rename replaces any
/// existing file wholesale, so readers only ever see a complete
/// document.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
