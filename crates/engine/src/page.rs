use serde::Serialize;

use crate::params::{self, Params};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 20;

/// A 1-based page number and page size, both always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    /// Zero is coerced to the default for that field.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn from_params(params: &Params) -> Self {
        Self {
            page: params::positive(params, "page", DEFAULT_PAGE),
            limit: params::positive(params, "limit", DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One page of a filtered, sorted result set.
///
/// `total` counts the full filtered set, not the page. Items serialize
/// under `sponsors` for both record shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "sponsors")]
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Slice `items` to the requested page.
///
/// An out-of-range page yields an empty `items` with the metadata still
/// describing the full set.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(request.limit);
    let start = (request.page - 1).saturating_mul(request.limit);

    let items: Vec<T> = items.into_iter().skip(start).take(request.limit).collect();

    Page {
        items,
        total,
        page: request.page,
        limit: request.limit,
        total_pages,
        has_next: request.page < total_pages,
        has_prev: request.page > 1,
    }
}
