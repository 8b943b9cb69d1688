//! Register client.
//!
//! Blocking reqwest client (no Tokio runtime required); async callers run
//! [`ingest`] on a blocking thread. Ingestion never fails outright: any
//! fetch or document error is answered with the fixed fallback dataset,
//! and the [`IngestOutcome`] says which one the caller got.

pub mod client;
pub mod fallback;
pub mod ingestor;
pub mod source;
pub mod status;

pub use client::{FetchError, RegisterClient, DEFAULT_CSV_URL, DEFAULT_USER_AGENT, SOURCE_PAGE_URL};
pub use fallback::fallback_sponsors;
pub use ingestor::{ingest, FallbackReason, IngestOutcome};
pub use source::{CsvSource, FileSource};
pub use status::{DataStatus, HealthStatus};
