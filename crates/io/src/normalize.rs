//! Mapping of one raw register row to a canonical [`Sponsor`].

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sponsorgrid_core::dates::parse_date_added;
use sponsorgrid_core::{Sponsor, SponsorRoute};

use crate::rules::{infer_industry, infer_route};

/// Candidate head counts for the (purely illustrative) employee estimate.
pub const EMPLOYEE_BANDS: [u32; 7] = [50, 100, 250, 500, 1000, 2500, 5000];

const ID_SLUG_LEN: usize = 20;
const ID_HASH_LEN: usize = 10;
const WEBSITE_SLUG_LEN: usize = 30;

/// Field values picked out of one data row. Required fields are already
/// known to be non-empty.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    pub organisation: &'a str,
    pub town: &'a str,
    pub county: Option<&'a str>,
    pub licence: Option<&'a str>,
    pub route: Option<&'a str>,
    pub date_added: Option<&'a str>,
}

/// Row normaliser. Holds the RNG behind the employee estimate so tests can
/// seed it; every other derived field is deterministic.
pub struct Normalizer {
    rng: StdRng,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Build the sponsor; `now` stands in for a missing or unparsable date.
    pub fn sponsor(&mut self, row: RawRow<'_>, now: DateTime<Utc>) -> Sponsor {
        let route = infer_route(row.route.unwrap_or(""));
        let parsed = row.date_added.and_then(parse_date_added);

        Sponsor {
            id: sponsor_id(row.organisation, row.town, row.licence.unwrap_or("")),
            organisation_name: row.organisation.to_string(),
            town_city: row.town.to_string(),
            county: row.county.map(str::to_string),
            route,
            date_added: parsed.unwrap_or(now),
            date_added_known: parsed.is_some(),
            sponsor_licence_number: row.licence.map(str::to_string),
            website: Some(website_guess(row.organisation)),
            industry: Some(infer_industry(row.organisation).to_string()),
            employees: EMPLOYEE_BANDS.choose(&mut self.rng).copied(),
            description: Some(describe(route, row.town)),
        }
    }
}

/// Content-derived id: a readable slug plus a hash of organisation, town
/// and licence, so the same row always yields the same id.
pub fn sponsor_id(organisation: &str, town: &str, licence: &str) -> String {
    let slug: String = format!("{organisation}{town}")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(ID_SLUG_LEN)
        .collect();

    let hash = blake3::hash(format!("{organisation}|{town}|{licence}").as_bytes());
    let hex = hash.to_hex();
    format!("{slug}-{}", &hex.as_str()[..ID_HASH_LEN])
}

/// Placeholder website built from the organisation name.
pub fn website_guess(organisation: &str) -> String {
    let lowered = organisation.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let mut domain = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                domain.push('-');
            }
            in_space = true;
        } else {
            domain.push(c);
            in_space = false;
        }
    }

    let domain: String = domain.chars().take(WEBSITE_SLUG_LEN).collect();
    format!("https://www.{domain}.co.uk")
}

pub fn describe(route: SponsorRoute, town: &str) -> String {
    format!("Licensed sponsor for {route} visa route in {town}")
}
