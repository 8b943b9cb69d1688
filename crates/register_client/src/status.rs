use chrono::{DateTime, Utc};
use serde::Serialize;
use sponsorgrid_core::dates::iso_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Freshness summary of the most recent ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatus {
    #[serde(with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
    /// Live records only; zero when the fallback was served.
    pub total_records: usize,
    pub status: HealthStatus,
}
