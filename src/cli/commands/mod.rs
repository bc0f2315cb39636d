pub mod applications;
pub mod birthdays;
pub mod committees;
pub mod doctors;
pub mod families;
pub mod members;
pub mod stats;

use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::parse_filter;
use crate::hooks::{FilterValue, Pagination, QueryParams, QueryState};
use crate::store::StoreError;

/// Common paging, search and filter arguments for all list commands
#[derive(Debug, Default)]
pub struct PageParams<'a> {
    pub page: usize,
    pub page_size: usize,
    pub search: Option<&'a str>,
    pub filters: &'a [String],
}

impl PageParams<'_> {
    pub fn to_query(&self) -> CliResult<QueryParams> {
        let mut params = QueryParams::new(Pagination::new(self.page, self.page_size));
        if let Some(term) = self.search {
            params.set_search(term);
        }
        for arg in self.filters {
            let (column, value) = parse_filter(arg)?;
            params.filters.apply(column, Some(FilterValue::from(value.as_str())));
        }
        // set_search moves back to page 1
        params.pagination = params.pagination.with_page(self.page);
        Ok(params)
    }
}

/// Data of a settled hook, or the error it settled with.
pub(crate) fn settled_data<T>(state: QueryState<T>) -> CliResult<T> {
    if let Some(source) = state.error {
        return Err(CliError::Fetch { source });
    }
    state.data.ok_or_else(|| {
        CliError::Store(StoreError::InvalidResponse {
            message: "query finished without data".to_string(),
        })
    })
}


#[cfg(test)]
#[path = "applications_test.rs"]
mod applications_test;

#[cfg(test)]
#[path = "listing_test.rs"]
mod listing_test;
