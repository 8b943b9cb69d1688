//! Fetch + parse with fallback.

use std::fmt;

use chrono::{DateTime, Utc};
use sponsorgrid_core::Sponsor;
use sponsorgrid_io::{parse_register_csv, IngestError, IngestReport, Normalizer};

use crate::client::FetchError;
use crate::fallback::fallback_sponsors;
use crate::source::CsvSource;
use crate::status::{DataStatus, HealthStatus};

#[derive(Debug)]
pub enum FallbackReason {
    Fetch(FetchError),
    Document(IngestError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "fetch failed: {e}"),
            Self::Document(e) => write!(f, "unusable register document: {e}"),
        }
    }
}

/// Live data, or the fallback dataset with the reason it was substituted.
#[derive(Debug)]
pub enum IngestOutcome {
    Live(IngestReport),
    Fallback { reason: FallbackReason, sponsors: Vec<Sponsor> },
}

impl IngestOutcome {
    pub fn sponsors(&self) -> &[Sponsor] {
        match self {
            IngestOutcome::Live(report) => &report.sponsors,
            IngestOutcome::Fallback { sponsors, .. } => sponsors,
        }
    }

    pub fn into_sponsors(self) -> Vec<Sponsor> {
        match self {
            IngestOutcome::Live(report) => report.sponsors,
            IngestOutcome::Fallback { sponsors, .. } => sponsors,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, IngestOutcome::Fallback { .. })
    }

    pub fn skipped_count(&self) -> usize {
        match self {
            IngestOutcome::Live(report) => report.skipped.len(),
            IngestOutcome::Fallback { .. } => 0,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            IngestOutcome::Live(_) => None,
            IngestOutcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> DataStatus {
        match self {
            IngestOutcome::Live(report) => DataStatus {
                last_updated: now,
                total_records: report.sponsors.len(),
                status: HealthStatus::Healthy,
            },
            IngestOutcome::Fallback { .. } => DataStatus {
                last_updated: now,
                total_records: 0,
                status: HealthStatus::Error,
            },
        }
    }
}

/// Fetch and parse the register. Never fails: a fetch error or an
/// unusable document yields [`IngestOutcome::Fallback`].
pub fn ingest(source: &dyn CsvSource, normalizer: &mut Normalizer, now: DateTime<Utc>) -> IngestOutcome {
    tracing::info!(source = %source.describe(), "fetching sponsor register");

    let result = source
        .fetch_csv()
        .map_err(FallbackReason::Fetch)
        .and_then(|text| parse_register_csv(&text, normalizer, now).map_err(FallbackReason::Document));

    match result {
        Ok(report) => {
            tracing::info!(
                records = report.sponsors.len(),
                skipped = report.skipped.len(),
                "register ingested"
            );
            IngestOutcome::Live(report)
        }
        Err(reason) => {
            tracing::warn!(%reason, "register unavailable, serving fallback dataset");
            IngestOutcome::Fallback { reason, sponsors: fallback_sponsors(now) }
        }
    }
}
