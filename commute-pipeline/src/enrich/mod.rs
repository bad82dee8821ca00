//! Enrichment orchestration: attach commute data to listing records.

mod error;
mod listing;
mod orchestrator;
mod output;

pub use error::EnrichError;
pub use listing::ListingRecord;
pub use orchestrator::{CommuteResolver, Enricher, MapsCommuteResolver};
pub use output::{
    CommuteOutcome, ListingEnrichment, SummaryRow, load_enrichment, write_enrichment,
    write_summary_csv,
};
