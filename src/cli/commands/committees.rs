use tabled::{Table, Tabled};

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional};
use crate::entities::committees::{Committee, CommitteesQuery, MemberRole};
use crate::hooks::{Fetch, QueryParams};
use crate::store::Remote;

#[derive(Tabled)]
struct CommitteeDisplay {
    #[tabled(rename = "Committee")]
    name: String,
    #[tabled(rename = "Head")]
    head: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Image")]
    image: String,
}

impl From<&Committee> for CommitteeDisplay {
    fn from(committee: &Committee) -> Self {
        let head = committee
            .members
            .iter()
            .find(|m| m.role == MemberRole::Head)
            .and_then(|m| m.name.as_deref());
        Self {
            name: committee.name.clone(),
            head: format_optional(head),
            members: committee.members.len(),
            image: if committee.image_url.is_some() { "yes" } else { "-" }.to_string(),
        }
    }
}

/// List committees with their members grouped
pub async fn list_committees(remote: &dyn Remote, format: &str) -> CliResult<String> {
    let committees = CommitteesQuery.fetch(remote, &QueryParams::default()).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&committees)?),
        _ => Ok(format_table(&committees)),
    }
}

fn format_table(committees: &[Committee]) -> String {
    if committees.is_empty() {
        return "No committees found.".to_string();
    }

    let display: Vec<CommitteeDisplay> = committees.iter().map(|c| c.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}
