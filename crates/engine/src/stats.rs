//! Aggregate statistics over a sponsor collection.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sponsorgrid_core::{Sponsor, SponsorRoute, SponsorType};

pub const TOP_N: usize = 10;
pub const RECENT_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryCount {
    pub industry: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}

/// `byType` and `byRoute` contain only keys that occur in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorStats {
    pub total_sponsors: usize,
    pub by_type: BTreeMap<SponsorType, usize>,
    pub by_route: BTreeMap<SponsorRoute, usize>,
    pub top_industries: Vec<IndustryCount>,
    pub top_locations: Vec<LocationCount>,
    pub recently_added: usize,
}

/// Counts in first-encountered order, then stable-sorted by count
/// descending and truncated, so ties keep first-seen order.
fn top_counts<I>(values: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Compute statistics relative to `now`.
///
/// Only records whose date came from the source count as recently added;
/// an ingestion-time placeholder date would otherwise make every
/// undated record look new.
pub fn compute_stats(sponsors: &[Sponsor], now: DateTime<Utc>) -> SponsorStats {
    let mut by_type = BTreeMap::new();
    let mut by_route = BTreeMap::new();
    for s in sponsors {
        *by_type.entry(s.sponsor_type()).or_insert(0) += 1;
        *by_route.entry(s.route).or_insert(0) += 1;
    }

    let top_industries = top_counts(
        sponsors
            .iter()
            .filter_map(|s| s.industry.clone())
            .filter(|i| !i.is_empty()),
        TOP_N,
    )
    .into_iter()
    .map(|(industry, count)| IndustryCount { industry, count })
    .collect();

    let top_locations = top_counts(sponsors.iter().map(Sponsor::location_label), TOP_N)
        .into_iter()
        .map(|(location, count)| LocationCount { location, count })
        .collect();

    let cutoff = now - Duration::days(RECENT_DAYS);
    let recently_added = sponsors
        .iter()
        .filter(|s| s.date_added_known && s.date_added >= cutoff)
        .count();

    SponsorStats {
        total_sponsors: sponsors.len(),
        by_type,
        by_route,
        top_industries,
        top_locations,
        recently_added,
    }
}
