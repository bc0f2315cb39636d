use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::cli::commands::{PageParams, settled_data};
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional, page_footer, truncate_with_ellipsis};
use crate::entities::profiles::{Profile, profiles_query};
use crate::hooks::{Pagination, UseQuery};
use crate::store::{Paged, Remote};

#[derive(Tabled)]
struct MemberDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Family")]
    family_no: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Mobile")]
    mobile: String,
    #[tabled(rename = "City")]
    city: String,
}

impl From<&Profile> for MemberDisplay {
    fn from(profile: &Profile) -> Self {
        Self {
            id: format_optional(profile.id.as_deref()),
            family_no: format_optional(profile.family_no.as_deref()),
            name: truncate_with_ellipsis(&profile.full_name(), 40),
            gender: format_optional(profile.gender.as_deref()),
            mobile: format_optional(profile.mobile_no1.as_deref()),
            city: format_optional(profile.residential_address_city.as_deref()),
        }
    }
}

/// List one page of members
pub async fn list_members(
    remote: Arc<dyn Remote>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let params = page.to_query()?;
    let pagination = params.pagination;
    let hook = UseQuery::new(remote, profiles_query(), params);
    let members = settled_data(hook.settled().await)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&members)?),
        _ => Ok(format_table(&members, &pagination)),
    }
}

fn format_table(members: &Paged<Profile>, pagination: &Pagination) -> String {
    if members.rows.is_empty() {
        return "No members found.".to_string();
    }

    let display: Vec<MemberDisplay> = members.rows.iter().map(|p| p.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    format!("{}\n{}", table, page_footer(pagination, members.count))
}
