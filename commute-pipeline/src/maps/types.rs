//! Directions and places API response DTOs.
//!
//! These map directly to the upstream JSON. `Option` and `default`
//! are used liberally because the APIs omit fields freely; the
//! resolvers decide what a missing field means.

use serde::Deserialize;

/// Response from the directions API.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// Application status: "OK" on success, otherwise an error code
    /// like "ZERO_RESULTS" or "REQUEST_DENIED".
    pub status: String,

    /// Human-readable detail accompanying a non-OK status.
    pub error_message: Option<String>,

    /// Candidate routes; may legitimately be empty.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One leg of a route.
#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub duration: Option<TextValue>,

    pub distance: Option<TextValue>,

    /// Geocoded origin of this leg; the enrichment stage reads the
    /// first leg's start location to seed the nearest-station lookup.
    pub start_location: Option<LatLng>,

    /// Transit/walking sub-segments of this leg.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step within a leg.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub travel_mode: Option<String>,
    pub duration: Option<TextValue>,
}

/// The API's text + numeric value pair, e.g. `{"text": "42 mins",
/// "value": 2520}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: Option<String>,
    pub value: Option<i64>,
}

/// A latitude/longitude pair in directions responses.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Response from the ranked (v1) nearby-places search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

/// One place from the ranked search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub display_name: Option<DisplayName>,

    pub location: Option<PlaceLatLng>,

    #[serde(default)]
    pub types: Vec<String>,
}

/// Localized display name wrapper used by the v1 places API.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayName {
    pub text: Option<String>,
}

/// A latitude/longitude pair in v1 places responses (long field names).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlaceLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response from the legacy nearby-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}

/// One place from the legacy search. Results come in upstream order,
/// not ranked by distance.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyPlace {
    pub name: Option<String>,

    /// Approximate address, used as a name fallback.
    pub vicinity: Option<String>,

    #[serde(default)]
    pub types: Vec<String>,

    pub geometry: Option<Geometry>,
}

/// Geometry wrapper in legacy places responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
}
