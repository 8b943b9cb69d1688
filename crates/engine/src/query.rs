//! Sponsor search: filter, sort, paginate.

use std::cmp::Ordering;
use std::str::FromStr;

use sponsorgrid_core::{Sponsor, SponsorRoute, SponsorType};

use crate::page::{paginate, Page, PageRequest};
use crate::params::{self, Params};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Exact-equality filter value. A value that names no known variant is
/// kept rather than dropped, so it filters everything out instead of
/// silently widening the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExactMatch<T> {
    Value(T),
    Unrecognised(String),
}

impl<T: FromStr + PartialEq> ExactMatch<T> {
    pub fn parse(raw: &str) -> Self {
        match raw.parse() {
            Ok(v) => ExactMatch::Value(v),
            Err(_) => ExactMatch::Unrecognised(raw.to_string()),
        }
    }

    pub fn matches(&self, value: &T) -> bool {
        match self {
            ExactMatch::Value(v) => v == value,
            ExactMatch::Unrecognised(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Location,
    DateAdded,
}

impl SortKey {
    /// Unknown keys sort by name.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "location" => SortKey::Location,
            "dateAdded" => SortKey::DateAdded,
            _ => SortKey::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub(crate) fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub sponsor_type: Option<ExactMatch<SponsorType>>,
    pub route: Option<ExactMatch<SponsorRoute>>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub page: PageRequest,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl SearchFilters {
    /// Build from `query, type, route, location, industry, page, limit,
    /// sortBy, sortOrder`. Never fails: malformed values coerce to defaults.
    pub fn from_params(params: &Params) -> Self {
        Self {
            query: params::text(params, "query").map(str::to_string),
            sponsor_type: params::text(params, "type").map(ExactMatch::parse),
            route: params::text(params, "route").map(ExactMatch::parse),
            location: params::text(params, "location").map(str::to_string),
            industry: params::text(params, "industry").map(str::to_string),
            page: PageRequest::from_params(params),
            sort_by: params::text(params, "sortBy").map(SortKey::parse).unwrap_or_default(),
            sort_order: params::text(params, "sortOrder").map(SortOrder::parse).unwrap_or_default(),
        }
    }

    /// True when `sponsor` satisfies every present filter.
    pub fn matches(&self, sponsor: &Sponsor) -> bool {
        if let Some(q) = &self.query {
            if !contains_folded(&sponsor.search_text(), q) {
                return false;
            }
        }
        if let Some(t) = &self.sponsor_type {
            if !t.matches(&sponsor.sponsor_type()) {
                return false;
            }
        }
        if let Some(r) = &self.route {
            if !r.matches(&sponsor.route) {
                return false;
            }
        }
        if let Some(loc) = &self.location {
            if !contains_folded(&sponsor.location_text(), loc) {
                return false;
            }
        }
        if let Some(ind) = &self.industry {
            if !contains_folded(sponsor.industry.as_deref().unwrap_or(""), ind) {
                return false;
            }
        }
        true
    }
}

pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

fn compare(a: &Sponsor, b: &Sponsor, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a
            .organisation_name
            .to_lowercase()
            .cmp(&b.organisation_name.to_lowercase()),
        SortKey::Location => a.town_city.to_lowercase().cmp(&b.town_city.to_lowercase()),
        SortKey::DateAdded => a.date_added.cmp(&b.date_added),
    }
}

/// Filter, sort and paginate `sponsors`.
///
/// The sort is stable in both directions: records with equal keys keep
/// their collection order.
pub fn search(sponsors: &[Sponsor], filters: &SearchFilters) -> Page<Sponsor> {
    let mut matched: Vec<&Sponsor> = sponsors.iter().filter(|s| filters.matches(s)).collect();

    matched.sort_by(|a, b| filters.sort_order.apply(compare(a, b, filters.sort_by)));

    paginate(matched, filters.page).map(Sponsor::clone)
}
