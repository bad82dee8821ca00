//! Commute config loading with built-in default bootstrap.

use std::path::Path;

use tracing::{info, warn};

use crate::storage::write_atomic;

use super::{CommuteConfig, CommuteDestination, DayKind, TravelMode};

/// Errors from loading or bootstrapping the commute config.
#[derive(Debug, thiserror::Error)]
pub enum CommuteConfigError {
    #[error("commute config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("commute config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The destination synthesized when no config file exists.
fn default_config() -> CommuteConfig {
    CommuteConfig {
        commutes: vec![CommuteDestination {
            name: "Work".to_string(),
            address: "10 Castlereagh St, Sydney NSW 2000".to_string(),
            mode: TravelMode::Transit,
            day: DayKind::Weekday,
            time: "09:00".to_string(),
        }],
    }
}

/// Load the commute config, bootstrapping a default if absent.
///
/// A missing file is not an error: the built-in single-destination
/// default is written to `path` for later editing and returned. A
/// present-but-malformed file falls back to the default without
/// overwriting the user's file.
pub fn load_or_init(path: &Path) -> Result<CommuteConfig, CommuteConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "malformed commute config, using built-in default"
                );
                Ok(default_config())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let config = default_config();
            let bytes = serde_json::to_vec_pretty(&config)?;
            write_atomic(path, &bytes)?;
            info!(path = %path.display(), "wrote default commute config");
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}
