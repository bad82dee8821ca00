//! Directions and places API clients and resolvers.
//!
//! Typed DTOs live at the upstream boundary; anything unparseable is
//! treated as "no result" rather than propagating raw payloads. The
//! raw directions response is still retained opaquely inside a
//! [`RouteQueryResult`] because the enrichment stage derives origin
//! coordinates from it.

mod client;
mod error;
mod route;
mod station;
mod types;

pub use client::{MapsClient, MapsConfig};
pub use error::MapsError;
pub use route::{BestRoute, RouteCandidate, RouteQueryResult, RouteResolver, RouteSummary, select_best_route};
pub use station::{NearestStation, NearestStationResolver, StationCandidate, StationSearch, WalkingAccess};
pub use types::{DirectionsResponse, LatLng, Leg, Route, TextValue};

use url::Url;

/// Build a shareable maps link for a computed commute.
///
/// This goes into the listing record for human consumption; it is not
/// an API request.
pub fn share_link(origin: &str, destination: &str, mode: crate::commute::TravelMode) -> String {
    let mut url = match Url::parse("https://www.google.com/maps/dir/") {
        Ok(url) => url,
        // Static base URL; parse cannot fail at runtime.
        Err(_) => return String::new(),
    };
    url.query_pairs_mut()
        .append_pair("api", "1")
        .append_pair("origin", origin)
        .append_pair("destination", destination)
        .append_pair("travelmode", mode.as_str());
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commute::TravelMode;

    #[test]
    fn share_link_encodes_addresses() {
        let link = share_link(
            "1 Smith St, Epping NSW",
            "10 Castlereagh St, Sydney NSW 2000",
            TravelMode::Transit,
        );

        assert!(link.starts_with("https://www.google.com/maps/dir/?api=1"));
        assert!(link.contains("origin=1+Smith+St%2C+Epping+NSW"));
        assert!(link.contains("travelmode=transit"));
    }
}
