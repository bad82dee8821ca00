use std::path::PathBuf;

use commute_pipeline::commute::load_or_init;
use commute_pipeline::crawl::{SearchClient, SearchClientConfig};
use commute_pipeline::enrich::{Enricher, MapsCommuteResolver};
use commute_pipeline::maps::{MapsClient, MapsConfig};
use commute_pipeline::pipeline::run_discovery;
use commute_pipeline::storage::DataPaths;

fn usage() -> ! {
    eprintln!("usage: commute-pipeline <discover|enrich>");
    eprintln!();
    eprintln!("  discover  crawl the search site and reconcile the listing registry");
    eprintln!("  enrich    attach commute times and nearest stations to listings");
    eprintln!();
    eprintln!("environment:");
    eprintln!("  DATA_DIR         data directory (default: current directory)");
    eprintln!("  MAPS_API_KEY     Google Maps API key (required for enrich)");
    eprintln!("  PLACES_RADIUS_M  station search radius in metres (optional)");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commute_pipeline=info".into()),
        )
        .init();

    let command = match std::env::args().nth(1) {
        Some(command) => command,
        None => usage(),
    };

    let data_dir = std::env::var("DATA_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);
    let paths = DataPaths::new(data_dir);

    match command.as_str() {
        "discover" => discover(&paths).await,
        "enrich" => enrich(&paths).await,
        _ => usage(),
    }
}

async fn discover(paths: &DataPaths) {
    let config = SearchClientConfig::default();
    let client = SearchClient::new(config).expect("Failed to create search client");
    let areas = client.areas().to_vec();
    let page_delay = client.page_delay();

    match run_discovery(&client, &areas, page_delay, paths).await {
        Ok(summary) => {
            println!(
                "Discovery {} complete: {} tracked ({} new, {} active, {} missing)",
                summary.run_id,
                summary.total_listings,
                summary.new_listings,
                summary.active_listings,
                summary.missing_listings,
            );
        }
        Err(e) => {
            eprintln!("Discovery failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn enrich(paths: &DataPaths) {
    let api_key = match std::env::var("MAPS_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("MAPS_API_KEY is not set; enrichment needs a Google Maps API key.");
            std::process::exit(1);
        }
    };

    let mut config = MapsConfig::new(api_key);
    if let Ok(radius) = std::env::var("PLACES_RADIUS_M")
        && let Ok(metres) = radius.parse()
    {
        config = config.with_places_radius(metres);
    }
    let client = MapsClient::new(config).expect("Failed to create maps client");

    let commute_config = match load_or_init(&paths.commute_config()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load commute config: {e}");
            std::process::exit(1);
        }
    };

    let enricher = Enricher::new(MapsCommuteResolver::new(client), paths.clone(), commute_config);
    match enricher.run().await {
        Ok(rows) => println!("Enrichment complete: {} listings summarized", rows.len()),
        Err(e) => {
            eprintln!("Enrichment failed: {e}");
            std::process::exit(1);
        }
    }
}
