//! Built-in demonstration catalog served by the search endpoints.

use crate::sponsor::Sponsor;

const MOCK_SPONSORS_JSON: &str = include_str!("fixtures/mock_sponsors.json");

/// The 20-record demonstration dataset, in its fixture order.
pub fn mock_sponsors() -> Result<Vec<Sponsor>, serde_json::Error> {
    serde_json::from_str(MOCK_SPONSORS_JSON)
}
