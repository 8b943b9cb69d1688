//! Queries over the flat `SponsorData` rows of the static datasets.

use std::cmp::Ordering;

use sponsorgrid_core::dates::parse_date_added;
use sponsorgrid_core::SponsorData;

use crate::page::{paginate, Page, PageRequest};
use crate::params::{self, Params};
use crate::query::{contains_folded, SortOrder};

/// Industry filter value meaning "no filter".
pub const ALL_INDUSTRIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSortKey {
    #[default]
    Company,
    Town,
    Industry,
    DateAdded,
}

impl TableSortKey {
    /// Accepts the column names and their camelCase forms; anything else
    /// sorts by company.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Town" | "town" => TableSortKey::Town,
            "Industry" | "industry" => TableSortKey::Industry,
            "Date Added" | "dateAdded" => TableSortKey::DateAdded,
            _ => TableSortKey::Company,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableFilters {
    pub query: Option<String>,
    /// Exact industry; `None` when absent or `all`.
    pub industry: Option<String>,
    pub page: PageRequest,
    pub sort_by: TableSortKey,
    pub sort_order: SortOrder,
}

impl TableFilters {
    pub fn from_params(params: &Params) -> Self {
        Self {
            query: params::text(params, "query").map(str::to_string),
            industry: params::text(params, "industry")
                .filter(|i| *i != ALL_INDUSTRIES)
                .map(str::to_string),
            page: PageRequest::from_params(params),
            sort_by: params::text(params, "sortBy").map(TableSortKey::parse).unwrap_or_default(),
            sort_order: params::text(params, "sortOrder").map(SortOrder::parse).unwrap_or_default(),
        }
    }

    pub fn matches(&self, row: &SponsorData) -> bool {
        if let Some(q) = &self.query {
            let hit = contains_folded(&row.company, q)
                || contains_folded(&row.town, q)
                || contains_folded(&row.industry, q);
            if !hit {
                return false;
            }
        }
        match &self.industry {
            Some(industry) => row.industry == *industry,
            None => true,
        }
    }
}

fn compare(a: &SponsorData, b: &SponsorData, key: TableSortKey) -> Ordering {
    match key {
        TableSortKey::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        TableSortKey::Town => a.town.to_lowercase().cmp(&b.town.to_lowercase()),
        TableSortKey::Industry => a.industry.to_lowercase().cmp(&b.industry.to_lowercase()),
        // Missing or unparsable dates sort as the earliest possible value.
        TableSortKey::DateAdded => {
            let da = a.date_added.as_deref().and_then(parse_date_added);
            let db = b.date_added.as_deref().and_then(parse_date_added);
            da.cmp(&db)
        }
    }
}

/// Filter, sort and paginate tabular rows under the same paging laws as
/// [`crate::search`].
pub fn search_table(rows: &[SponsorData], filters: &TableFilters) -> Page<SponsorData> {
    let mut matched: Vec<&SponsorData> = rows.iter().filter(|r| filters.matches(r)).collect();

    matched.sort_by(|a, b| filters.sort_order.apply(compare(a, b, filters.sort_by)));

    paginate(matched, filters.page).map(SponsorData::clone)
}
