use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::cli::commands::{PageParams, settled_data};
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional, page_footer, truncate_with_ellipsis};
use crate::entities::doctors::{Doctor, doctors_query};
use crate::hooks::{Pagination, UseQuery};
use crate::store::{Paged, Remote};

#[derive(Tabled)]
struct DoctorDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Specialization")]
    specialization: String,
    #[tabled(rename = "Experience")]
    experience: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&Doctor> for DoctorDisplay {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: format_optional(doctor.id.as_deref()),
            name: truncate_with_ellipsis(&format_optional(doctor.name.as_deref()), 30),
            specialization: format_optional(doctor.specialization.as_deref()),
            experience: doctor
                .experience_years
                .map(|y| format!("{y} yrs"))
                .unwrap_or_else(|| "-".to_string()),
            phone: format_optional(doctor.contact_phone.as_deref()),
        }
    }
}

/// List one page of doctors, newest first
pub async fn list_doctors(
    remote: Arc<dyn Remote>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let params = page.to_query()?;
    let pagination = params.pagination;
    let hook = UseQuery::new(remote, doctors_query(), params);
    let doctors = settled_data(hook.settled().await)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&doctors)?),
        _ => Ok(format_table(&doctors, &pagination)),
    }
}

fn format_table(doctors: &Paged<Doctor>, pagination: &Pagination) -> String {
    if doctors.rows.is_empty() {
        return "No doctors found.".to_string();
    }

    let display: Vec<DoctorDisplay> = doctors.rows.iter().map(|d| d.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    format!("{}\n{}", table, page_footer(pagination, doctors.count))
}
