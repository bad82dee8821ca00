//! Route resolution: query directions and pick the best candidate.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commute::TravelMode;

use super::client::MapsClient;
use super::station::NearestStation;
use super::types::DirectionsResponse;

/// Upstream application status indicating a usable response.
const STATUS_OK: &str = "OK";

/// Duration totals for one candidate route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Sum of leg durations in seconds.
    pub total_seconds: i64,

    /// Joined leg duration texts, if the legs carried any.
    pub duration_text: Option<String>,

    /// Seconds spent in walking sub-segments, for access-walk
    /// diagnostics.
    pub walking_seconds: i64,
}

/// The minimum-duration candidate plus per-candidate diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestRoute {
    pub total_seconds: i64,
    pub duration_text: String,
    pub candidates: Vec<RouteCandidate>,
}

/// Duration summary persisted in enrichment output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub duration_text: String,
    pub duration_seconds: i64,
}

/// One resolved directions query, as persisted per destination.
///
/// `raw_response` keeps the upstream payload opaquely; the enrichment
/// stage reads origin coordinates out of it. `nearest_station` is only
/// ever populated in older output files and is cleared in favor of the
/// listing-level station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQueryResult {
    pub summary: RouteSummary,

    pub arrival_timestamp: i64,

    pub raw_response: serde_json::Value,

    /// Per-candidate duration diagnostics, best first not guaranteed;
    /// older output files carry none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<RouteCandidate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_station: Option<NearestStation>,
}

/// Sum up one candidate route's legs.
fn candidate_totals(route: &super::types::Route) -> RouteCandidate {
    let mut total_seconds = 0i64;
    let mut walking_seconds = 0i64;
    let mut texts = Vec::new();

    for leg in &route.legs {
        if let Some(duration) = &leg.duration {
            total_seconds += duration.value.unwrap_or(0);
            if let Some(text) = &duration.text {
                texts.push(text.clone());
            }
        }
        for step in &leg.steps {
            if step.travel_mode.as_deref() == Some("WALKING") {
                walking_seconds += step.duration.as_ref().and_then(|d| d.value).unwrap_or(0);
            }
        }
    }

    RouteCandidate {
        total_seconds,
        duration_text: if texts.is_empty() {
            None
        } else {
            Some(texts.join(", "))
        },
        walking_seconds,
    }
}

/// Pick the minimum-total-duration candidate (tie-break: first seen).
///
/// Returns `None` when the response carries no routes.
pub fn select_best_route(response: &DirectionsResponse) -> Option<BestRoute> {
    let candidates: Vec<RouteCandidate> = response.routes.iter().map(candidate_totals).collect();

    let best = candidates
        .iter()
        .min_by_key(|c| c.total_seconds)?
        .clone();

    let duration_text = best
        .duration_text
        .clone()
        .unwrap_or_else(|| format!("{} mins", best.total_seconds / 60));

    Some(BestRoute {
        total_seconds: best.total_seconds,
        duration_text,
        candidates,
    })
}

/// Resolves a single origin/destination/arrival-time query.
#[derive(Debug, Clone)]
pub struct RouteResolver<'a> {
    client: &'a MapsClient,
}

impl<'a> RouteResolver<'a> {
    /// Create a resolver backed by the given client.
    pub fn new(client: &'a MapsClient) -> Self {
        Self { client }
    }

    /// Query directions and select the best candidate route.
    ///
    /// Non-OK upstream status, transport failure, parse failure, and
    /// an empty routes list all yield `None`: logged, not retried, and
    /// never fatal to the caller.
    pub async fn resolve(
        &self,
        origin: &str,
        destination: &str,
        arrival_ts: i64,
        mode: TravelMode,
    ) -> Option<RouteQueryResult> {
        let raw = match self
            .client
            .directions(origin, destination, arrival_ts, mode)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(origin, destination, error = %e, "directions request failed");
                return None;
            }
        };

        let parsed: DirectionsResponse = match serde_json::from_value(raw.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(origin, destination, error = %e, "unparseable directions response");
                return None;
            }
        };

        if parsed.status != STATUS_OK {
            warn!(
                origin,
                destination,
                status = %parsed.status,
                detail = parsed.error_message.as_deref().unwrap_or(""),
                "directions query returned non-OK status"
            );
            return None;
        }

        let best = select_best_route(&parsed)?;

        Some(RouteQueryResult {
            summary: RouteSummary {
                duration_text: best.duration_text,
                duration_seconds: best.total_seconds,
            },
            arrival_timestamp: arrival_ts,
            raw_response: raw,
            candidates: best.candidates,
            nearest_station: None,
        })
    }
}
