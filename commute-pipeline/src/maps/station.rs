//! Nearest-station resolution.
//!
//! Two-tier lookup: a ranked-by-distance places search first, then the
//! legacy nearby-search endpoint as fallback. Either way the chosen
//! candidate is quantified with a walking-mode directions query.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commute::TravelMode;

use super::client::MapsClient;
use super::error::MapsError;
use super::types::DirectionsResponse;

const TRAIN_STATION: &str = "train_station";
const BUS_STATION: &str = "bus_station";

/// The single nearest station attached to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestStation {
    pub name: String,

    pub walking_seconds: i64,

    pub walking_distance_m: Option<i64>,
}

/// A station candidate from either search tier, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCandidate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub types: Vec<String>,
}

impl StationCandidate {
    /// A usable candidate is a train station that is not also flagged
    /// as a bus station (bus interchanges pollute the ranked search).
    pub fn is_usable(&self) -> bool {
        self.types.iter().any(|t| t == TRAIN_STATION)
            && !self.types.iter().any(|t| t == BUS_STATION)
    }
}

/// Walking time/distance from an origin to a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkingAccess {
    pub seconds: i64,
    pub distance_m: Option<i64>,
}

/// Station search backend.
///
/// This abstraction allows the two-tier fallback logic to be tested
/// without live API access.
pub trait StationSearch {
    /// Ranked-by-distance search around a point.
    fn search_ranked(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Result<Vec<StationCandidate>, MapsError>>;

    /// Legacy nearby search around a point (upstream order).
    fn search_legacy(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Result<Vec<StationCandidate>, MapsError>>;

    /// Walking route from origin to a candidate's coordinates.
    ///
    /// `None` covers both transport failure and an unusable response;
    /// the caller just moves on to the next candidate.
    fn walking_access(
        &self,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
    ) -> impl Future<Output = Option<WalkingAccess>>;
}

impl StationSearch for MapsClient {
    async fn search_ranked(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<StationCandidate>, MapsError> {
        let response = self.search_nearby_ranked(lat, lng).await?;
        Ok(response
            .places
            .into_iter()
            .filter_map(|place| {
                let name = place.display_name.and_then(|d| d.text)?;
                let location = place.location?;
                Some(StationCandidate {
                    name,
                    lat: location.latitude,
                    lng: location.longitude,
                    types: place.types,
                })
            })
            .collect())
    }

    async fn search_legacy(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<StationCandidate>, MapsError> {
        let response = self.search_nearby_legacy(lat, lng).await?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|place| {
                let name = place.name.or(place.vicinity)?;
                let location = place.geometry.and_then(|g| g.location)?;
                Some(StationCandidate {
                    name,
                    lat: location.lat,
                    lng: location.lng,
                    types: place.types,
                })
            })
            .collect())
    }

    async fn walking_access(
        &self,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
    ) -> Option<WalkingAccess> {
        let origin = format!("{from_lat},{from_lng}");
        let destination = format!("{to_lat},{to_lng}");
        let now_ts = Utc::now().timestamp();

        let raw = match self
            .directions(&origin, &destination, now_ts, TravelMode::Walking)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                debug!(destination, error = %e, "walking directions request failed");
                return None;
            }
        };

        let parsed: DirectionsResponse = serde_json::from_value(raw).ok()?;
        if parsed.status != "OK" {
            debug!(destination, status = %parsed.status, "walking directions non-OK");
            return None;
        }

        let leg = parsed.routes.first()?.legs.first()?;
        let seconds = leg.duration.as_ref()?.value?;
        let distance_m = leg.distance.as_ref().and_then(|d| d.value);

        Some(WalkingAccess {
            seconds,
            distance_m,
        })
    }
}

/// Resolves a listing's nearest train station.
#[derive(Debug, Clone)]
pub struct NearestStationResolver<'a, S: StationSearch> {
    search: &'a S,
}

impl<'a, S: StationSearch> NearestStationResolver<'a, S> {
    /// Create a resolver backed by the given search.
    pub fn new(search: &'a S) -> Self {
        Self { search }
    }

    /// Find the nearest usable station to a point.
    ///
    /// Tier 1 is the ranked search; on transport failure, empty
    /// result, or no usable candidate, tier 2 repeats the same
    /// selection against the legacy search. Returns `None` when
    /// neither tier produces a candidate whose walking query succeeds.
    pub async fn resolve(&self, lat: f64, lng: f64) -> Option<NearestStation> {
        match self.search.search_ranked(lat, lng).await {
            Ok(candidates) => {
                if candidates.is_empty() {
                    debug!("ranked station search returned no places");
                } else if let Some(station) = self.walk_candidates(lat, lng, &candidates).await {
                    return Some(station);
                }
            }
            Err(e) => warn!(error = %e, "ranked station search failed"),
        }

        match self.search.search_legacy(lat, lng).await {
            Ok(candidates) => self.walk_candidates(lat, lng, &candidates).await,
            Err(e) => {
                warn!(error = %e, "legacy station search failed");
                None
            }
        }
    }

    /// Walk the candidate list in order, returning the first usable
    /// station with a successful walking query.
    async fn walk_candidates(
        &self,
        lat: f64,
        lng: f64,
        candidates: &[StationCandidate],
    ) -> Option<NearestStation> {
        for candidate in candidates {
            if !candidate.is_usable() {
                continue;
            }
            let Some(access) = self
                .search
                .walking_access(lat, lng, candidate.lat, candidate.lng)
                .await
            else {
                continue;
            };
            return Some(NearestStation {
                name: candidate.name.clone(),
                walking_seconds: access.seconds,
                walking_distance_m: access.distance_m,
            });
        }
        None
    }
}
