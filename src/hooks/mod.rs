//! Reactive data hooks for dashboard screens.
//!
//! - `use_query`: paged fetching with value-compared parameter changes
//! - `use_search`: debounced search text
//! - `use_filters`: keyed filter accumulation
//! - `use_pagination`: page arithmetic

mod use_filters;
mod use_pagination;
mod use_query;
mod use_search;

pub use use_filters::{DateRange, FilterSet, FilterValue};
pub use use_pagination::Pagination;
pub use use_query::{Fetch, QueryParams, QueryState, TableQuery, UseQuery};
pub use use_search::{DEFAULT_DELAY, DebouncedSearch};
