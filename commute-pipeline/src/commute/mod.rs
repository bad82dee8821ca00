//! Commute destinations: config entities and arrival-time computation.

mod arrival;
mod config;

pub use arrival::{next_occurrence, parse_time};
pub use config::{CommuteConfigError, load_or_init};

use serde::{Deserialize, Serialize};

/// Travel mode for a directions query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Transit,
    Driving,
    Walking,
}

impl TravelMode {
    /// The lowercase form used in API query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Transit => "transit",
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }
}

/// Which kind of day an arrival-time query should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    /// The next Monday–Friday.
    Weekday,
    /// The next Saturday.
    Weekend,
    /// Tomorrow, whatever day it is.
    #[default]
    Any,
}

/// One named commute destination from the config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteDestination {
    /// Display label, e.g. "Work".
    pub name: String,

    /// Destination address as passed to the directions API.
    pub address: String,

    #[serde(default)]
    pub mode: TravelMode,

    #[serde(default)]
    pub day: DayKind,

    /// Target arrival time as `hh:mm` local; malformed values fall
    /// back to 09:00 at query time.
    #[serde(default = "default_time")]
    pub time: String,
}

fn default_time() -> String {
    "09:00".to_string()
}

/// The commute config document: a list of destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteConfig {
    #[serde(default)]
    pub commutes: Vec<CommuteDestination>,
}
