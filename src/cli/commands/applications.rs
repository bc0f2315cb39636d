use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::cli::commands::{PageParams, settled_data};
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional, page_footer, truncate_with_ellipsis};
use crate::hooks::Pagination;
use crate::review::{Application, ApplicationKind, ApplicationStatus, ReviewQueue, set_status};
use crate::store::{Paged, Remote};

#[derive(Tabled)]
struct ApplicationDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Submitted")]
    created_at: String,
}

impl ApplicationDisplay {
    fn new(kind: ApplicationKind, app: &Application) -> Self {
        Self {
            id: app.id.clone(),
            title: truncate_with_ellipsis(
                &format_optional(app.field(kind.title_column()).as_deref()),
                40,
            ),
            status: app.status().to_string(),
            created_at: format_optional(app.created_at.as_deref()),
        }
    }
}

/// List one page of applications of a kind, newest first
pub async fn list_applications(
    remote: Arc<dyn Remote>,
    kind: ApplicationKind,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let params = page.to_query()?;
    let pagination = params.pagination;
    let queue = ReviewQueue::new(remote, kind, params);
    let applications = settled_data(queue.settled().await)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&applications)?),
        _ => Ok(format_table(kind, &applications, &pagination)),
    }
}

fn format_table(kind: ApplicationKind, apps: &Paged<Application>, pagination: &Pagination) -> String {
    if apps.rows.is_empty() {
        return format!("No {} applications found.", kind.as_str().replace('_', " "));
    }

    let display: Vec<ApplicationDisplay> = apps
        .rows
        .iter()
        .map(|a| ApplicationDisplay::new(kind, a))
        .collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    format!("{}\n{}", table, page_footer(pagination, apps.count))
}

/// Approve or reject a pending application
pub async fn decide(
    remote: &dyn Remote,
    kind: ApplicationKind,
    id: &str,
    status: ApplicationStatus,
) -> CliResult<String> {
    set_status(remote, kind, id, status).await?;
    let moved = match (status, kind.production_table()) {
        (ApplicationStatus::Approved, Some(table)) => format!(" and moved to {table}"),
        _ => String::new(),
    };
    Ok(format!("✓ {} {} application {}{}", status, kind, id, moved))
}
