//! External rejection signal.
//!
//! The voting front end maintains a votes document keyed by listing
//! identifier; a scanner stamps `workflow_status` on each entry. The
//! pipeline only consumes the result: identifiers whose status is
//! `rejected` are excluded from ever transitioning to active.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use super::error::RegistryError;

const REJECTED: &str = "rejected";

/// The slice of a vote entry the pipeline cares about.
#[derive(Debug, Deserialize)]
struct VoteEntry {
    workflow_status: Option<String>,
}

/// Load the set of rejected identifiers from the votes document.
///
/// A missing file yields an empty set; the rejection signal is
/// optional input.
pub fn load_rejected_ids(path: &Path) -> Result<BTreeSet<String>, RegistryError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => {
            return Err(RegistryError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let votes: BTreeMap<String, VoteEntry> =
        serde_json::from_str(&raw).map_err(|e| RegistryError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(votes
        .into_iter()
        .filter(|(_, entry)| entry.workflow_status.as_deref() == Some(REJECTED))
        .map(|(id, _)| id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let rejected = load_rejected_ids(&dir.path().join("votes.json")).unwrap();
        assert!(rejected.is_empty());
    }

    #[test]
    fn only_rejected_entries_are_returned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        std::fs::write(
            &path,
            r#"{
                "111": {"tom": false, "mq": false, "workflow_status": "rejected"},
                "222": {"tom": true, "mq": true, "workflow_status": "reviewed"},
                "333": {"tom": true},
                "444": {"workflow_status": "rejected"}
            }"#,
        )
        .unwrap();

        let rejected = load_rejected_ids(&path).unwrap();
        assert_eq!(
            rejected,
            ["111", "444"].iter().map(|s| s.to_string()).collect()
        );
    }
}
