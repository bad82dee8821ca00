//! HTTP client for the directions and places APIs.

use std::time::Duration;

use serde_json::json;

use crate::commute::TravelMode;

use super::error::MapsError;
use super::types::{NearbySearchResponse, SearchNearbyResponse};

/// Default base URL for the directions API.
const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default base URL for the ranked (v1) places search.
const DEFAULT_PLACES_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";

/// Default base URL for the legacy nearby search.
const DEFAULT_LEGACY_PLACES_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Default search radius for station lookups, in metres.
const DEFAULT_PLACES_RADIUS_M: u32 = 2000;

/// Configuration for the maps client.
#[derive(Debug, Clone)]
pub struct MapsConfig {
    /// API key, sent as a query parameter (directions, legacy places)
    /// or header (v1 places).
    pub api_key: String,
    /// Base URL for the directions API.
    pub directions_url: String,
    /// Base URL for the ranked places search.
    pub places_url: String,
    /// Base URL for the legacy nearby search.
    pub legacy_places_url: String,
    /// Station search radius in metres.
    pub places_radius_m: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            legacy_places_url: DEFAULT_LEGACY_PLACES_URL.to_string(),
            places_radius_m: DEFAULT_PLACES_RADIUS_M,
            timeout_secs: 15,
        }
    }

    /// Point every endpoint at the same base (for testing against a
    /// local server).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.directions_url = format!("{base}/directions");
        self.places_url = format!("{base}/places:searchNearby");
        self.legacy_places_url = format!("{base}/nearbysearch");
        self
    }

    /// Set the station search radius.
    pub fn with_places_radius(mut self, metres: u32) -> Self {
        self.places_radius_m = metres;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the directions and places APIs.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    config: MapsConfig,
}

impl MapsClient {
    /// Create a new client from the given configuration.
    pub fn new(config: MapsConfig) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// The configured station search radius in metres.
    pub fn places_radius_m(&self) -> u32 {
        self.config.places_radius_m
    }

    /// Query the directions API for routes arriving by `arrival_ts`.
    ///
    /// Returns the raw JSON body: callers parse it into typed DTOs and
    /// also retain it opaquely for downstream derivation.
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
        arrival_ts: i64,
        mode: TravelMode,
    ) -> Result<serde_json::Value, MapsError> {
        let response = self
            .http
            .get(&self.config.directions_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", mode.as_str()),
                ("arrival_time", &arrival_ts.to_string()),
                ("key", &self.config.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16(),
                message: body.chars().take(300).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
        })
    }

    /// Ranked-by-distance station search around a point (v1 places).
    pub async fn search_nearby_ranked(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<SearchNearbyResponse, MapsError> {
        let body = json!({
            "includedTypes": ["train_station"],
            "maxResultCount": 5,
            "rankPreference": "DISTANCE",
            "locationRestriction": {
                "circle": {
                    "center": {"latitude": lat, "longitude": lng},
                    "radius": self.config.places_radius_m,
                }
            },
        });

        let response = self
            .http
            .post(&self.config.places_url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header(
                "X-Goog-FieldMask",
                "places.displayName,places.location,places.types,places.name",
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16(),
                message: body.chars().take(300).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
        })
    }

    /// Legacy nearby station search; results are in upstream order.
    pub async fn search_nearby_legacy(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<NearbySearchResponse, MapsError> {
        let response = self
            .http
            .get(&self.config.legacy_places_url)
            .query(&[
                ("location", format!("{lat},{lng}")),
                ("radius", self.config.places_radius_m.to_string()),
                ("type", "train_station".to_string()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16(),
                message: body.chars().take(300).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
        })
    }
}
