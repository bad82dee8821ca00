//! Listing discovery and commute-enrichment pipeline.
//!
//! Two decoupled batch runs:
//! - **discover**: crawl the search site for listing identifiers and
//!   reconcile them into the lifecycle registry.
//! - **enrich**: attach commute durations and a nearest-station lookup
//!   to each listing record via the directions/places APIs.

pub mod commute;
pub mod crawl;
pub mod enrich;
pub mod maps;
pub mod pipeline;
pub mod registry;
pub mod storage;
pub mod summary;
