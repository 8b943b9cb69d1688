//! Register I/O: turning the published sponsor CSV into canonical
//! [`Sponsor`](sponsorgrid_core::Sponsor) records, loading the static
//! tabular datasets, and writing them back out as CSV.

pub mod error;
pub mod export;
pub mod fixtures;
pub mod headers;
pub mod ingest;
pub mod normalize;
pub mod rules;

pub use error::{ExportError, FixtureError, IngestError};
pub use fixtures::{load_section, section_counts, DataSection, SectionCounts};
pub use ingest::{decode_payload, parse_register_csv, IngestReport, SkipReason, SkippedRow};
pub use normalize::Normalizer;
