//! Distinct filter values offered to clients.

use std::collections::BTreeSet;

use sponsorgrid_core::{Sponsor, SponsorData};

/// Sorted, de-duplicated non-empty industries.
pub fn unique_industries(sponsors: &[Sponsor]) -> Vec<String> {
    sponsors
        .iter()
        .filter_map(|s| s.industry.as_deref())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated `Town, County` / `Town` labels.
pub fn unique_locations(sponsors: &[Sponsor]) -> Vec<String> {
    sponsors
        .iter()
        .map(Sponsor::location_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct industries of tabular rows, ignoring blank values.
pub fn table_industries(rows: &[SponsorData]) -> Vec<String> {
    rows.iter()
        .map(|r| r.industry.as_str())
        .filter(|i| !i.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
