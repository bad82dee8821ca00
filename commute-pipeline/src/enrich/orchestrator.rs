//! The per-listing enrichment loop.

use std::path::PathBuf;

use chrono::Local;
use tracing::{info, warn};

use crate::commute::{CommuteConfig, TravelMode, next_occurrence, parse_time};
use crate::maps::{
    DirectionsResponse, MapsClient, NearestStation, NearestStationResolver, RouteQueryResult,
    RouteResolver, share_link,
};
use crate::storage::DataPaths;

use super::error::EnrichError;
use super::listing::ListingRecord;
use super::output::{
    CommuteOutcome, ListingEnrichment, SummaryRow, load_enrichment, write_enrichment,
    write_summary_csv,
};

/// Upstream resolution as seen by the orchestrator.
///
/// This abstraction lets tests verify the idempotent-skip rule issues
/// zero upstream calls.
pub trait CommuteResolver {
    /// Resolve one origin/destination/arrival-time query.
    fn route(
        &self,
        origin: &str,
        destination: &str,
        arrival_ts: i64,
        mode: TravelMode,
    ) -> impl Future<Output = Option<RouteQueryResult>>;

    /// Resolve the nearest station to a point.
    fn station(&self, lat: f64, lng: f64) -> impl Future<Output = Option<NearestStation>>;
}

/// The live resolver, backed by the maps client.
#[derive(Debug, Clone)]
pub struct MapsCommuteResolver {
    client: MapsClient,
}

impl MapsCommuteResolver {
    pub fn new(client: MapsClient) -> Self {
        Self { client }
    }
}

impl CommuteResolver for MapsCommuteResolver {
    async fn route(
        &self,
        origin: &str,
        destination: &str,
        arrival_ts: i64,
        mode: TravelMode,
    ) -> Option<RouteQueryResult> {
        RouteResolver::new(&self.client)
            .resolve(origin, destination, arrival_ts, mode)
            .await
    }

    async fn station(&self, lat: f64, lng: f64) -> Option<NearestStation> {
        NearestStationResolver::new(&self.client).resolve(lat, lng).await
    }
}

/// Collapse runs of whitespace (and newlines) in a raw address.
fn normalize_address(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull the geocoded origin out of a retained directions response.
fn origin_coordinates(result: &RouteQueryResult) -> Option<(f64, f64)> {
    let parsed: DirectionsResponse = serde_json::from_value(result.raw_response.clone()).ok()?;
    let location = parsed.routes.first()?.legs.first()?.start_location?;
    Some((location.lat, location.lng))
}

/// Runs enrichment over every listing record.
pub struct Enricher<R: CommuteResolver> {
    resolver: R,
    paths: DataPaths,
    config: CommuteConfig,
}

impl<R: CommuteResolver> Enricher<R> {
    /// Create an enricher over the given data directory and config.
    pub fn new(resolver: R, paths: DataPaths, config: CommuteConfig) -> Self {
        Self {
            resolver,
            paths,
            config,
        }
    }

    /// The configured destination count for the idempotence rule, or
    /// `None` when the config carries no destinations.
    fn configured_count(&self) -> Option<usize> {
        match self.config.commutes.len() {
            0 => None,
            n => Some(n),
        }
    }

    /// Process every listing and rewrite the CSV summary.
    ///
    /// Listings are visited in sorted filename order so the summary
    /// rows come out deterministic. No per-listing failure aborts the
    /// loop; only CSV persistence errors propagate.
    pub async fn run(&self) -> Result<Vec<SummaryRow>, EnrichError> {
        let listings_dir = self.paths.listings_dir();
        if !listings_dir.is_dir() {
            warn!(dir = %listings_dir.display(), "listings directory not found");
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&listings_dir)
            .map_err(|e| EnrichError::io(&listings_dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();

        let mut rows = Vec::with_capacity(files.len());
        for path in files {
            let listing = match ListingRecord::load(&path) {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read listing record");
                    continue;
                }
            };

            let listing_id = listing
                .id()
                .map(str::to_string)
                .or_else(|| {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(str::to_string)
                })
                .unwrap_or_default();

            if let Some(existing) = load_enrichment(&self.paths.commute_file(&listing_id))
                && existing.is_complete(self.configured_count())
            {
                info!(listing_id, "already enriched, skipping");
                rows.push(SummaryRow {
                    id: listing_id,
                    address: listing.address().map(str::to_string),
                    travel_duration_text: listing.travel_duration_text().map(str::to_string),
                    travel_duration_seconds: listing.travel_duration_seconds(),
                    google_maps_url: listing.maps_url().map(str::to_string),
                });
                continue;
            }

            let address = listing.address().unwrap_or("").trim().to_string();
            if address.is_empty() {
                warn!(listing_id, "no address present, skipping listing");
                rows.push(SummaryRow::empty(listing_id, None));
                continue;
            }

            let row = self.enrich_listing(listing, &path, listing_id, &address).await;
            rows.push(row);
        }

        write_summary_csv(&self.paths.travel_csv(), &rows)?;
        info!(rows = rows.len(), csv = %self.paths.travel_csv().display(), "wrote travel summary");
        Ok(rows)
    }

    /// Enrich one listing: query every destination, derive the
    /// nearest station, persist the output, and mirror convenience
    /// fields back onto the record.
    async fn enrich_listing(
        &self,
        mut listing: ListingRecord,
        listing_path: &std::path::Path,
        listing_id: String,
        address: &str,
    ) -> SummaryRow {
        let origin = normalize_address(address);
        info!(listing_id, origin, "enriching listing");

        let now = Local::now();
        let queried_at = now.to_rfc3339();

        let mut outcomes = Vec::with_capacity(self.config.commutes.len());
        for destination in &self.config.commutes {
            let arrival_ts =
                next_occurrence(&now, destination.day, parse_time(&destination.time)).timestamp();
            let result = self
                .resolver
                .route(&origin, &destination.address, arrival_ts, destination.mode)
                .await;
            if result.is_none() {
                warn!(listing_id, destination = destination.name, "no route result");
            }
            outcomes.push(CommuteOutcome {
                name: destination.name.clone(),
                destination: destination.address.clone(),
                mode: destination.mode,
                arrival_timestamp: arrival_ts,
                result,
            });
        }

        let nearest_station = self.derive_nearest_station(&outcomes).await;
        // The station is a listing-level property; clear any
        // per-destination copies now that it is fixed.
        for outcome in &mut outcomes {
            if let Some(result) = &mut outcome.result {
                result.nearest_station = None;
            }
        }

        let enrichment = ListingEnrichment {
            id: listing_id.clone(),
            address: origin.clone(),
            queried_at: queried_at.clone(),
            commutes: outcomes,
            nearest_station,
        };
        let out_path = self.paths.commute_file(&listing_id);
        match write_enrichment(&out_path, &enrichment) {
            Ok(()) => info!(listing_id, path = %out_path.display(), "wrote enrichment"),
            Err(e) => warn!(listing_id, error = %e, "failed to write enrichment file"),
        }

        let first_success = enrichment
            .commutes
            .iter()
            .find_map(|o| o.result.as_ref().map(|r| (o, r)));

        match first_success {
            Some((outcome, result)) => {
                let maps_url = share_link(&origin, &outcome.destination, outcome.mode);
                listing.apply_commute(
                    &origin,
                    &outcome.destination,
                    outcome.mode,
                    result,
                    &maps_url,
                    &queried_at,
                );
                if let Err(e) = listing.save(listing_path) {
                    warn!(listing_id, error = %e, "failed to update listing record");
                }

                SummaryRow {
                    id: listing_id,
                    address: Some(origin),
                    travel_duration_text: Some(result.summary.duration_text.clone()),
                    travel_duration_seconds: Some(result.summary.duration_seconds),
                    google_maps_url: Some(maps_url),
                }
            }
            None => SummaryRow::empty(listing_id, Some(origin)),
        }
    }

    /// Derive the single listing-level nearest station.
    ///
    /// Prefer a station already embedded in a successful result (older
    /// output files carried one per destination). Otherwise take the
    /// first successful result whose raw response yields origin
    /// coordinates and query the station resolver exactly once.
    async fn derive_nearest_station(
        &self,
        outcomes: &[CommuteOutcome],
    ) -> Option<NearestStation> {
        for outcome in outcomes {
            if let Some(result) = &outcome.result
                && let Some(station) = &result.nearest_station
            {
                return Some(station.clone());
            }
        }

        for outcome in outcomes {
            let Some(result) = &outcome.result else {
                continue;
            };
            let Some((lat, lng)) = origin_coordinates(result) else {
                continue;
            };
            return self.resolver.station(lat, lng).await;
        }

        None
    }
}
