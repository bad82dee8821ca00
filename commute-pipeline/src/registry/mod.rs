//! Identifier-lifecycle registry.
//!
//! The registry is the durable record of every listing identifier the
//! crawler has ever discovered, with an active/missing status that
//! reflects only the most recent crawl.

mod error;
mod reconcile;
mod rejection;
mod store;
mod types;

pub use error::RegistryError;
pub use reconcile::{ReconcileOutcome, reconcile};
pub use rejection::load_rejected_ids;
pub use store::RegistryStore;
pub use types::{IdentifierRecord, ListingStatus, RegistryDocument};
