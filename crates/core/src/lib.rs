//! Shared model for the sponsor register.
//!
//! Two record shapes live here and are never merged:
//! - [`Sponsor`]: the canonical, enriched record produced by ingestion and
//!   consumed by the query engine.
//! - [`SponsorData`]: the flat, display-oriented row used by the static
//!   fixture files (`all-data.json`, `recent-data.json`, `deleted-data.json`).

pub mod catalog;
pub mod dates;
pub mod envelope;
pub mod route;
pub mod sponsor;
pub mod table;

pub use envelope::ApiResponse;
pub use route::{SponsorRoute, SponsorType};
pub use sponsor::Sponsor;
pub use table::SponsorData;
