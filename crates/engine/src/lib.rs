//! Query engine over in-memory sponsor collections.
//!
//! Every operation is a pure function of its inputs: the collection is
//! borrowed, never mutated, and identical inputs produce identical output.

pub mod facets;
pub mod page;
pub mod params;
pub mod query;
pub mod stats;
pub mod table;

pub use page::{paginate, Page, PageRequest};
pub use params::Params;
pub use query::{search, SearchFilters, SortKey, SortOrder};
pub use stats::{compute_stats, SponsorStats};
pub use table::{search_table, TableFilters, TableSortKey};
