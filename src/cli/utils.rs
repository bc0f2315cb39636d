//! Shared utilities for CLI commands

use tabled::{Table, settings::Style};

use crate::cli::error::{CliError, CliResult};
use crate::hooks::Pagination;

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Display text for an optional column, `-` when missing or blank
pub fn format_optional(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Parse a `--filter column=value` argument
pub fn parse_filter(arg: &str) -> CliResult<(String, String)> {
    match arg.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidArgument {
            message: format!("filter '{arg}' must look like column=value"),
        }),
    }
}

/// Footer line under a paged table
pub fn page_footer(pagination: &Pagination, count: usize) -> String {
    format!(
        "Page {} of {} ({} total)",
        pagination.page(),
        pagination.total_pages(count).max(1),
        count
    )
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}
