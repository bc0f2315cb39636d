use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::cli::commands::{PageParams, settled_data};
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional, page_footer};
use crate::entities::families::{FamiliesQuery, Family};
use crate::hooks::{Pagination, UseQuery};
use crate::store::{Paged, Remote};

#[derive(Tabled)]
struct FamilyDisplay {
    #[tabled(rename = "Family No")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    head: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Members")]
    members: usize,
}

impl From<&Family> for FamilyDisplay {
    fn from(family: &Family) -> Self {
        Self {
            id: family.id.clone(),
            name: family.name.clone(),
            head: family.head_name.clone(),
            city: format_optional(family.city.as_deref()),
            members: family.total_members,
        }
    }
}

/// List one page of families
pub async fn list_families(
    remote: Arc<dyn Remote>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let params = page.to_query()?;
    let pagination = params.pagination;
    let hook = UseQuery::new(remote, FamiliesQuery, params);
    let families = settled_data(hook.settled().await)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&families)?),
        _ => Ok(format_table(&families, &pagination)),
    }
}

fn format_table(families: &Paged<Family>, pagination: &Pagination) -> String {
    if families.rows.is_empty() {
        return "No families found.".to_string();
    }

    let display: Vec<FamilyDisplay> = families.rows.iter().map(|f| f.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    format!("{}\n{}", table, page_footer(pagination, families.count))
}
